use egui_macroquad::egui;
use flappy_evo::simulation::evolution::{GenerationStats, Population};
use flappy_evo::simulation::session::Session;
use std::collections::VecDeque;

const MAX_HISTORY_POINTS: usize = 500;

pub struct UIState {
    pub stats_panel_width: f32,
    pub best_fitness_history: VecDeque<(f64, f64)>,
    pub mean_fitness_history: VecDeque<(f64, f64)>,
    pub score_history: VecDeque<(f64, f64)>,
    pub save_requested: bool,
    pub status_message: Option<String>,
    pub simulation_speed: f32,
    pub rendering_enabled: bool,
    pub actual_ticks_per_sec: f32,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            stats_panel_width: 300.0,
            best_fitness_history: VecDeque::new(),
            mean_fitness_history: VecDeque::new(),
            score_history: VecDeque::new(),
            save_requested: false,
            status_message: None,
            simulation_speed: 1.0, // Default 1x speed
            rendering_enabled: true,
            actual_ticks_per_sec: 0.0,
        }
    }

    pub fn record_generation(&mut self, stats: &GenerationStats) {
        let generation = stats.generation as f64;
        push_capped(
            &mut self.best_fitness_history,
            (generation, stats.best_fitness as f64),
        );
        push_capped(
            &mut self.mean_fitness_history,
            (generation, stats.mean_fitness as f64),
        );
        push_capped(&mut self.score_history, (generation, stats.score as f64));
    }
}

fn push_capped(history: &mut VecDeque<(f64, f64)>, point: (f64, f64)) {
    history.push_back(point);
    if history.len() > MAX_HISTORY_POINTS {
        history.pop_front();
    }
}

pub fn draw_ui(state: &mut UIState, session: &Session<Population>) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, session);
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
