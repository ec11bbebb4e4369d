//! # Flappy Evo - Flappy Bird trained by neuro-evolution
//!
//! A Flappy-Bird-style arcade game whose birds are flown by small feed-forward
//! networks. Every generation, each network controls one bird; the fitness the
//! birds earn drives selection of the next generation.
//!
//! ## Features
//!
//! - Tick-driven simulation with pixel-exact collision masks
//! - One agent record per bird (bird, controller, fitness) with stable handles
//! - Deferred, two-phase removal of birds and pipes
//! - MLP brains with tanh activation, mutation and crossover
//! - Elitist generational trainer behind a [`simulation::evolution::Trainer`] trait
//! - Save/load of the champion network
//!
//! ## Core Modules
//!
//! - [`simulation::world`] - The per-tick update loop
//! - [`simulation::bird`] - Bird kinematics and animation
//! - [`simulation::pipe`] - Pipes and collision tests
//! - [`simulation::session`] - Generation state machine
//! - [`simulation::evolution`] - Trainer interface and population

/// Error type for file and configuration handling.
pub mod error;

pub use error::{Error, Result};

/// Core simulation logic and data structures.
pub mod simulation {
    /// Scrolling ground.
    pub mod base;
    /// The player character.
    pub mod bird;
    /// Neural network controllers.
    pub mod brain;
    /// Controller trait and sensor inputs.
    pub mod controller;
    /// Deferred world changes.
    pub mod events;
    /// Trainer interface and elitist population.
    pub mod evolution;
    /// Pixel-exact opacity masks.
    pub mod mask;
    /// Game constants.
    pub mod params;
    /// Pipe pairs.
    pub mod pipe;
    /// Draw commands for the renderer.
    pub mod scene;
    /// Training session state machine.
    pub mod session;
    /// Procedural artwork and masks.
    pub mod sprites;
    /// Per-tick world update.
    pub mod world;
}
