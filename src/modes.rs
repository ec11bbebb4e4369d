use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::controller::Controller;
use flappy_evo::simulation::evolution::Population;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::session::{Session, SessionState};
use flappy_evo::simulation::sprites::SpriteSheet;
use flappy_evo::simulation::world::{TickOutcome, World};
use macroquad::prelude::*;
use ndarray::Array1;
use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};
use tracing::{error, info};

use crate::graphics::{self, Textures};
use crate::ui::{self, UIState};

const MAX_TICKS_PER_FRAME: u32 = 1000;
const UNTHROTTLED_TICKS_PER_FRAME: u32 = 2000;
const DEFAULT_WINNER_PATH: &str = "winner.json";

/// Converts frame time into whole simulation ticks.
struct TickClock {
    tick_seconds: f32,
    accumulator: f32,
}

impl TickClock {
    fn new(ticks_per_second: u32) -> Self {
        Self {
            tick_seconds: 1.0 / ticks_per_second.max(1) as f32,
            accumulator: 0.0,
        }
    }

    fn advance(&mut self, frame_time: f32, speed: f32) -> u32 {
        self.accumulator += frame_time * speed;
        let ticks = (self.accumulator / self.tick_seconds).floor() as u32;
        if ticks > MAX_TICKS_PER_FRAME {
            // Fell too far behind, drop the backlog.
            self.accumulator = 0.0;
            return MAX_TICKS_PER_FRAME;
        }
        self.accumulator -= ticks as f32 * self.tick_seconds;
        ticks
    }
}

fn quit_pressed() -> bool {
    is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q)
}

fn save_champion(population: &Population, path: &Path) -> Option<String> {
    let (brain, fitness) = population.champion()?;
    match brain.save_to_file(path) {
        Ok(()) => {
            info!(path = %path.display(), fitness, "saved winner");
            Some(format!("Saved winner to {}", path.display()))
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to save winner");
            Some(format!("Save failed: {}", e))
        }
    }
}

/// Evolves a population while drawing the current generation.
pub async fn train(mut session: Session<Population>, save_winner: Option<PathBuf>) {
    let params = session.world().params().clone();
    let textures = Textures::new(session.world().sheet());
    let mut ui_state = UIState::new();
    let mut clock = TickClock::new(params.ticks_per_second);

    let mut ticks_since_sample = 0u32;
    let mut time_since_sample = 0.0f32;

    loop {
        if quit_pressed() {
            session.step(true);
            break;
        }

        let frame_time = get_frame_time();
        let ticks = if ui_state.rendering_enabled {
            clock.advance(frame_time, ui_state.simulation_speed)
        } else {
            UNTHROTTLED_TICKS_PER_FRAME
        };

        for _ in 0..ticks {
            if session.state().is_terminal() {
                break;
            }
            match session.step(false) {
                SessionState::GenerationComplete(stats) => ui_state.record_generation(&stats),
                SessionState::Finished(stats) => {
                    ui_state.record_generation(&stats);
                    ui_state.status_message = Some("Training finished".to_owned());
                }
                SessionState::Running | SessionState::UserQuit => {}
            }
            ticks_since_sample += 1;
        }

        time_since_sample += frame_time;
        if time_since_sample >= 0.5 {
            ui_state.actual_ticks_per_sec = ticks_since_sample as f32 / time_since_sample;
            ticks_since_sample = 0;
            time_since_sample = 0.0;
        }

        if ui_state.save_requested {
            ui_state.save_requested = false;
            let path = save_winner
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WINNER_PATH));
            ui_state.status_message = save_champion(session.trainer(), &path);
        }

        if ui_state.rendering_enabled {
            let world = session.world();
            graphics::draw_sky(&params);
            graphics::draw_scene(&world.draw_commands(), &textures);
            graphics::draw_hud(
                &params,
                world.score(),
                &[
                    format!("Gen: {}", session.generation()),
                    format!("Alive: {}", world.alive()),
                ],
            );
        } else {
            clear_background(DARKGRAY);
            graphics::draw_centered_text(&params, "Rendering disabled");
        }

        ui::draw_ui(&mut ui_state, &session);
        ui::process_egui();

        next_frame().await;
    }

    if let Some(path) = save_winner {
        save_champion(session.trainer(), &path);
    }
}

/// Flies a saved brain over and over.
pub async fn replay(brain: Brain, params: Params, seed: u64) {
    let sheet = Rc::new(SpriteSheet::new());
    let textures = Textures::new(&sheet);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut clock = TickClock::new(params.ticks_per_second);

    let new_world = |rng: &mut StdRng| {
        World::new(
            params.clone(),
            Rc::clone(&sheet),
            [brain.clone()],
            StdRng::seed_from_u64(rng.random()),
        )
    };

    let mut attempt = 1u32;
    let mut world = new_world(&mut rng);

    loop {
        if quit_pressed() {
            break;
        }

        for _ in 0..clock.advance(get_frame_time(), 1.0) {
            if world.tick() == TickOutcome::GenerationComplete {
                info!(attempt, score = world.score(), ticks = world.ticks(), "replay ended");
                attempt += 1;
                world = new_world(&mut rng);
            }
        }

        graphics::draw_sky(&params);
        graphics::draw_scene(&world.draw_commands(), &textures);
        graphics::draw_hud(&params, world.score(), &[format!("Run: {}", attempt)]);

        next_frame().await;
    }
}

/// Jumps when the space bar was pressed since the last tick.
struct Keyboard {
    jump: Rc<Cell<bool>>,
}

impl Controller for Keyboard {
    fn activate(&mut self, _sensors: &Array1<f32>) -> Array1<f32> {
        let output = if self.jump.replace(false) { 1.0 } else { 0.0 };
        Array1::from_elem(1, output)
    }
}

/// Lets a human fly the bird.
pub async fn play(params: Params, seed: u64) {
    let sheet = Rc::new(SpriteSheet::new());
    let textures = Textures::new(&sheet);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut clock = TickClock::new(params.ticks_per_second);
    let jump = Rc::new(Cell::new(false));

    let new_world = |rng: &mut StdRng| {
        World::new(
            params.clone(),
            Rc::clone(&sheet),
            [Keyboard {
                jump: Rc::clone(&jump),
            }],
            StdRng::seed_from_u64(rng.random()),
        )
    };

    let mut world = new_world(&mut rng);
    let mut high_score = 0u32;

    loop {
        if quit_pressed() {
            break;
        }

        let space = is_key_pressed(KeyCode::Space);
        if world.is_complete() {
            if space {
                world = new_world(&mut rng);
            }
        } else {
            if space {
                jump.set(true);
            }
            for _ in 0..clock.advance(get_frame_time(), 1.0) {
                if world.tick() == TickOutcome::GenerationComplete {
                    high_score = high_score.max(world.score());
                    info!(score = world.score(), high_score, "game over");
                    break;
                }
            }
        }

        graphics::draw_sky(&params);
        graphics::draw_scene(&world.draw_commands(), &textures);
        graphics::draw_hud(&params, world.score(), &[format!("Best: {}", high_score)]);
        if world.is_complete() {
            graphics::draw_centered_text(&params, "Game over - press Space to retry");
        }

        next_frame().await;
    }
}
