use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use flappy_evo::simulation::evolution::{Population, Trainer};
use flappy_evo::simulation::session::Session;
use std::collections::VecDeque;

use super::ui::UIState;

const BEST_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 200, 80);
const MEAN_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);
const SCORE_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 220, 120);

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    session: &Session<Population>,
) {
    let world = session.world();
    let population = session.trainer();

    egui::SidePanel::right("stats_panel")
        .default_width(state.stats_panel_width)
        .resizable(false)
        .show(egui_ctx, |ui| {
            ui.heading("Training Stats");
            ui.separator();

            ui.horizontal(|ui| {
                let can_save = population.champion().is_some();
                if ui
                    .add_enabled(can_save, egui::Button::new("💾 Save winner"))
                    .clicked()
                {
                    state.save_requested = true;
                }

                let button_text = if state.rendering_enabled {
                    "🎨 Rendering: ON"
                } else {
                    "🎨 Rendering: OFF"
                };
                if ui.button(button_text).clicked() {
                    state.rendering_enabled = !state.rendering_enabled;
                }
            });

            if let Some(ref msg) = state.status_message {
                ui.label(msg);
            }

            ui.separator();

            ui.label("Simulation Speed");
            ui.add(
                egui::Slider::new(&mut state.simulation_speed, 0.25..=100.0)
                    .text("x")
                    .logarithmic(true),
            );
            ui.label(format!("Ticks/sec: {:.1}", state.actual_ticks_per_sec));

            ui.separator();

            let params = population.params();
            ui.label(format!(
                "Generation: {}/{}",
                session.generation(),
                params.max_generations
            ));
            ui.label(format!(
                "Alive: {}/{}",
                world.alive(),
                params.population_size
            ));
            ui.label(format!("Score: {}", world.score()));
            ui.label(format!("Ticks: {}", world.ticks()));

            let leader = world
                .agents()
                .iter()
                .map(|agent| agent.fitness)
                .fold(f32::NEG_INFINITY, f32::max);
            if leader.is_finite() {
                ui.label(format!("Leading fitness: {:.1}", leader));
            }
            if let Some((_, fitness)) = population.champion() {
                ui.label(format!("Champion fitness: {:.1}", fitness));
            }
            if population.is_finished() {
                ui.label("Training finished");
            }

            ui.separator();

            ui.heading("Fitness Per Generation");
            draw_history_plot(
                ui,
                "fitness_plot",
                "Fitness",
                &[
                    ("Best", BEST_COLOR, &state.best_fitness_history),
                    ("Mean", MEAN_COLOR, &state.mean_fitness_history),
                ],
            );

            ui.separator();

            ui.heading("Score Per Generation");
            draw_history_plot(
                ui,
                "score_plot",
                "Score",
                &[("Score", SCORE_COLOR, &state.score_history)],
            );
        });
}

/// Plots one line per series against the generation number.
fn draw_history_plot(
    ui: &mut egui::Ui,
    id: &str,
    y_label: &str,
    series: &[(&str, egui::Color32, &VecDeque<(f64, f64)>)],
) {
    if series.iter().all(|(_, _, data)| data.is_empty()) {
        ui.label("Waiting for the first generation...");
        return;
    }

    let y_label = y_label.to_owned();
    let mut plot = Plot::new(id)
        .height(170.0)
        .show_axes([true, true])
        .label_formatter(move |name, value| {
            format!("{}\nGeneration: {:.0}\n{}: {:.1}", name, value.x, y_label, value.y)
        });
    if series.len() > 1 {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for &(name, color, data) in series {
            let points: PlotPoints = data.iter().map(|&(x, y)| [x, y]).collect();
            plot_ui.line(Line::new(points).color(color).name(name));
        }
    });
}
