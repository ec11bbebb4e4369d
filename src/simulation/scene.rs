//! What the renderer needs to draw a frame.

use serde::{Deserialize, Serialize};

use super::sprites::SpriteId;

/// Draw `sprite` with its top-left corner at `(x, y)`, rotated about its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    /// Artwork to draw.
    pub sprite: SpriteId,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f32,
}

impl DrawCommand {
    /// An unrotated sprite.
    pub fn at(sprite: SpriteId, x: f32, y: f32) -> Self {
        Self {
            sprite,
            x,
            y,
            rotation: 0.0,
        }
    }
}
