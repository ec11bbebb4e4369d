//! Training session: generations of worlds driven by a trainer.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::evolution::{GenerationStats, Trainer};
use super::params::Params;
use super::sprites::SpriteSheet;
use super::world::{TickOutcome, World};

/// Where the session stands after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    /// The current generation is still flying.
    Running,
    /// A generation just ended; the next one has been spawned.
    GenerationComplete(GenerationStats),
    /// The trainer reached its stop condition.
    Finished(GenerationStats),
    /// The user asked to stop.
    UserQuit,
}

impl SessionState {
    /// Whether no further steps will change anything.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Finished(_) | SessionState::UserQuit)
    }
}

/// Couples a trainer with the world of its current generation.
pub struct Session<T: Trainer> {
    trainer: T,
    world: World<T::Controller>,
    params: Params,
    sheet: Rc<SpriteSheet>,
    rng: StdRng,
    state: SessionState,
    generation: u32,
}

impl<T: Trainer> Session<T> {
    /// Starts the first generation.
    pub fn new(mut trainer: T, params: Params, sheet: Rc<SpriteSheet>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let world = World::new(
            params.clone(),
            Rc::clone(&sheet),
            trainer.spawn_generation(),
            StdRng::seed_from_u64(rng.random()),
        );

        Self {
            trainer,
            world,
            params,
            sheet,
            rng,
            state: SessionState::Running,
            generation: 1,
        }
    }

    /// Advances the session by one tick. `quit` stops it for good.
    pub fn step(&mut self, quit: bool) -> SessionState {
        if self.state.is_terminal() {
            return self.state;
        }
        if quit {
            info!(generation = self.generation(), "training stopped by user");
            self.state = SessionState::UserQuit;
            return self.state;
        }

        self.state = match self.world.tick() {
            TickOutcome::Running => SessionState::Running,
            TickOutcome::GenerationComplete => {
                let stats = self.trainer.evaluate(&self.world.report());
                if self.trainer.is_finished() {
                    info!(generation = stats.generation, "training finished");
                    SessionState::Finished(stats)
                } else {
                    self.world = World::new(
                        self.params.clone(),
                        Rc::clone(&self.sheet),
                        self.trainer.spawn_generation(),
                        StdRng::seed_from_u64(self.rng.random()),
                    );
                    self.generation += 1;
                    SessionState::GenerationComplete(stats)
                }
            }
        };
        self.state
    }

    /// Steps until the trainer is done or `should_quit` returns true.
    pub fn run(&mut self, mut should_quit: impl FnMut() -> bool) -> SessionState {
        loop {
            let state = self.step(should_quit());
            if state.is_terminal() {
                return state;
            }
        }
    }

    /// World of the current generation.
    pub fn world(&self) -> &World<T::Controller> {
        &self.world
    }

    /// The trainer.
    pub fn trainer(&self) -> &T {
        &self.trainer
    }

    /// Last state returned by [`Session::step`].
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of the generation currently flying, starting at 1.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
