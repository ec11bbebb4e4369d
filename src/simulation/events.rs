//! Deferred world changes.
//!
//! The pipe scan only records what happened; the world applies the queued
//! events afterwards so no collection shrinks while it is being iterated.

use serde::{Deserialize, Serialize};

/// Stable identifier of an agent within one generation.
///
/// Handles are assigned in the order the trainer supplied the controllers and
/// are never reused, so they double as the index into the fitness report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentHandle(pub usize);

/// Why a bird left the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Retirement {
    /// Touched a pipe.
    Collision,
    /// Hit the ground or flew above the screen.
    OutOfBounds,
}

/// Events that modify world state.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// A bird must be removed together with its controller and fitness.
    BirdRetired {
        /// Agent to remove.
        handle: AgentHandle,
        /// What ended its run.
        reason: Retirement,
    },
    /// A bird flew past a pipe for the first time.
    PipePassed {
        /// Index of the pipe in the pipe list.
        pipe_index: usize,
    },
    /// A pipe scrolled off the left edge.
    PipeExpired {
        /// Index of the pipe in the pipe list.
        pipe_index: usize,
    },
}

/// Queue collecting events during a read pass.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<TickEvent>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: TickEvent) {
        self.events.push(event);
    }

    /// Whether `handle` already has a retirement queued.
    pub fn is_retiring(&self, handle: AgentHandle) -> bool {
        self.events.iter().any(
            |event| matches!(event, TickEvent::BirdRetired { handle: h, .. } if *h == handle),
        )
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, TickEvent> {
        self.events.drain(..)
    }
}
