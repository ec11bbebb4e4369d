//! Scrolling ground.

use serde::{Deserialize, Serialize};

use super::params::Params;

/// Two ground tiles laid side by side. When one leaves the screen on the left
/// it is moved behind the other, so the ground appears endless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    /// Vertical position of the ground's top edge.
    pub y: f32,
    /// Left edge of the first tile.
    pub x1: f32,
    /// Left edge of the second tile.
    pub x2: f32,
    width: f32,
}

impl Base {
    /// Creates the ground at `y` from tiles `width` wide.
    pub fn new(y: f32, width: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: width,
            width,
        }
    }

    /// Width of one tile.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Scrolls both tiles and wraps whichever has left the screen.
    pub fn advance_one_tick(&mut self, params: &Params) {
        self.x1 -= params.base_velocity;
        self.x2 -= params.base_velocity;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}
