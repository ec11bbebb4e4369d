use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::evolution::{EvolutionParams, Population};
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::session::{Session, SessionState};
use flappy_evo::simulation::sprites::SpriteSheet;
use macroquad::window::Conf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod graphics;
mod modes;
mod ui;

const STATS_PANEL_WIDTH: i32 = 300;

#[derive(Parser, Debug)]
#[command(name = "flappy-evo", version, about = "Flappy Bird flown by evolving neural networks")]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Seed for pipe placement
    #[arg(long, global = true, default_value_t = 0)]
    seed: u64,

    /// End a generation once this many pipes are reached
    #[arg(long, global = true)]
    max_score: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Evolve a population of birds (default)
    Train {
        /// Run without a window and log progress only
        #[arg(long)]
        headless: bool,

        /// Trainer configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the best brain here when training ends
        #[arg(long)]
        save_winner: Option<PathBuf>,
    },
    /// Watch a saved brain fly
    Replay {
        /// Brain file written by `train --save-winner`
        path: PathBuf,
    },
    /// Fly the bird yourself with the space bar
    Play,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn window_conf(params: &Params, side_panel: bool) -> Conf {
    let panel = if side_panel { STATS_PANEL_WIDTH } else { 0 };
    Conf {
        window_title: "Flappy Evo".to_owned(),
        window_width: params.window_width as i32 + panel,
        window_height: params.window_height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn load_evolution_params(config: Option<&PathBuf>) -> Result<EvolutionParams> {
    match config {
        Some(path) => EvolutionParams::load_from_file(path)
            .with_context(|| format!("failed to load trainer config {}", path.display())),
        None => Ok(EvolutionParams::default()),
    }
}

fn train_headless(session: &mut Session<Population>, save_winner: Option<&PathBuf>) -> Result<()> {
    match session.run(|| false) {
        SessionState::Finished(stats) => info!(
            generation = stats.generation,
            best_fitness = stats.best_fitness,
            score = stats.score,
            "training complete"
        ),
        state => warn!(?state, "training stopped early"),
    }

    if let Some(path) = save_winner {
        let Some((brain, fitness)) = session.trainer().champion() else {
            warn!("no generation was evaluated, nothing to save");
            return Ok(());
        };
        brain
            .save_to_file(path)
            .with_context(|| format!("failed to save winner to {}", path.display()))?;
        info!(path = %path.display(), fitness, "saved winner");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let params = Params {
        max_score: cli.max_score,
        ..Params::default()
    };
    let mode = cli.mode.unwrap_or(Mode::Train {
        headless: false,
        config: None,
        save_winner: None,
    });

    match mode {
        Mode::Train {
            headless,
            config,
            save_winner,
        } => {
            let evolution = load_evolution_params(config.as_ref())?;
            info!(
                population = evolution.population_size,
                max_generations = evolution.max_generations,
                fitness_threshold = evolution.fitness_threshold,
                "starting training"
            );
            let sheet = Rc::new(SpriteSheet::new());
            let conf = window_conf(&params, true);
            let population =
                Population::new(evolution).context("invalid trainer configuration")?;
            let mut session = Session::new(population, params, sheet, cli.seed);

            if headless {
                train_headless(&mut session, save_winner.as_ref())?;
            } else {
                macroquad::Window::from_config(conf, modes::train(session, save_winner));
            }
        }
        Mode::Replay { path } => {
            let brain = Brain::load_from_file(&path)
                .with_context(|| format!("failed to load brain {}", path.display()))?;
            info!(path = %path.display(), layers = ?brain.layer_sizes(), "replaying brain");
            let conf = window_conf(&params, false);
            macroquad::Window::from_config(conf, modes::replay(brain, params, cli.seed));
        }
        Mode::Play => {
            let conf = window_conf(&params, false);
            macroquad::Window::from_config(conf, modes::play(params, cli.seed));
        }
    }

    Ok(())
}
