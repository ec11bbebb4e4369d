//! The player character: kinematics, tilt, and wing animation.

use serde::{Deserialize, Serialize};

use super::mask::Mask;
use super::params::Params;
use super::sprites::{BIRD_FRAME_COUNT, SpriteSheet};

/// Tilt below which the bird stops flapping and glides nose down.
const GLIDE_TILT: f32 = -80.0;
/// Lowest tilt a bird can reach.
const MIN_TILT: f32 = -90.0;

/// A bird flying at a fixed horizontal position.
///
/// The vertical motion restarts from the last jump every tick:
/// the displacement is `velocity * t + gravity * t² / 2` where `t` counts ticks
/// since the jump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Horizontal position (never changes during an episode).
    pub x: f32,
    /// Vertical position of the sprite's top edge.
    pub y: f32,
    /// Velocity at the last jump.
    pub velocity: f32,
    /// Rotation in degrees, positive is nose up.
    pub tilt: f32,
    /// Ticks since the last jump.
    pub tick_count: u32,
    /// Vertical position at the last jump.
    pub height: f32,
    /// Ticks into the current flap cycle.
    animation_tick: u32,
    /// Wing-flap frame currently shown.
    frame: usize,
}

impl Bird {
    /// Creates a bird at rest.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tilt: 0.0,
            tick_count: 0,
            height: y,
            animation_tick: 0,
            frame: 0,
        }
    }

    /// Creates a bird at the configured start position.
    pub fn at_start(params: &Params) -> Self {
        Self::new(params.bird_start_x, params.bird_start_y)
    }

    /// Gives the bird an upward impulse.
    pub fn jump(&mut self, params: &Params) {
        self.velocity = params.jump_velocity;
        self.tick_count = 0;
        self.height = self.y;
    }

    /// Advances the bird by one tick and returns the vertical displacement applied.
    pub fn advance_one_tick(&mut self, params: &Params) -> f32 {
        self.tick_count += 1;
        let t = self.tick_count as f32;

        let mut displacement = self.velocity * t + 0.5 * params.gravity * t * t;
        if displacement >= 0.0 {
            displacement += params.fall_bias;
        }
        displacement = displacement.min(params.terminal_displacement);

        self.y += displacement;

        if displacement < 0.0 || self.y < self.height + params.ascent_window {
            self.tilt = self.tilt.max(params.max_rotation);
        } else {
            self.tilt = (self.tilt - params.rotation_velocity).max(MIN_TILT);
        }

        self.animate(params.animation_time.max(1));
        displacement
    }

    /// Steps the flap cycle `0, 1, 2, 1, 0`, each frame held for `hold` ticks.
    fn animate(&mut self, hold: u32) {
        self.animation_tick += 1;
        if self.animation_tick > hold * 4 {
            self.animation_tick = 0;
        }

        self.frame = match self.animation_tick / hold {
            0 => 0,
            1 | 3 => 1,
            2 => 2,
            _ => 0,
        };

        // Nose-diving birds hold their wings still; resume mid-cycle afterwards.
        if self.tilt <= GLIDE_TILT {
            self.frame = 1;
            self.animation_tick = hold * 2;
        }
        debug_assert!(self.frame < BIRD_FRAME_COUNT);
    }

    /// Current wing-flap frame.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Opacity mask of the current animation frame.
    pub fn collision_silhouette<'a>(&self, sheet: &'a SpriteSheet) -> &'a Mask {
        sheet.bird_mask(self.frame)
    }
}
