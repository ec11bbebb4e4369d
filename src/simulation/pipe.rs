//! Pipe pairs scrolling towards the birds.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::params::Params;
use super::sprites::SpriteSheet;

/// A top and bottom pipe separated by a fixed vertical gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Horizontal position of the left edge.
    pub x: f32,
    /// Set once a bird has flown past this pipe.
    pub passed: bool,
    gap_center: f32,
    gap: f32,
}

impl Pipe {
    /// Creates a pipe at `x` with a random gap height.
    pub fn new<R: Rng + ?Sized>(x: f32, params: &Params, rng: &mut R) -> Self {
        let mut pipe = Self {
            x,
            passed: false,
            gap_center: 0.0,
            gap: params.pipe_gap,
        };
        pipe.regenerate_gap(params, rng);
        pipe
    }

    /// Creates a pipe with a known gap center.
    pub fn with_gap_center(x: f32, gap_center: f32, params: &Params) -> Self {
        Self {
            x,
            passed: false,
            gap_center,
            gap: params.pipe_gap,
        }
    }

    /// Draws a new gap center. The gap size is left untouched.
    pub fn regenerate_gap<R: Rng + ?Sized>(&mut self, params: &Params, rng: &mut R) {
        self.gap_center = rng
            .random_range(params.gap_center_min..params.gap_center_max)
            .floor();
    }

    /// Moves the pipe left by its scroll speed.
    pub fn advance_one_tick(&mut self, params: &Params) {
        self.x -= params.pipe_velocity;
    }

    /// Vertical center of the opening.
    pub fn gap_center(&self) -> f32 {
        self.gap_center
    }

    /// Vertical size of the opening.
    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Upper edge of the opening (bottom of the top pipe).
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap / 2.0
    }

    /// Lower edge of the opening (top of the bottom pipe).
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap / 2.0
    }

    /// Where the top pipe sprite is drawn.
    pub fn top_y(&self, sheet: &SpriteSheet) -> f32 {
        self.gap_top() - sheet.pipe_height()
    }

    /// Where the bottom pipe sprite is drawn.
    pub fn bottom_y(&self) -> f32 {
        self.gap_bottom()
    }

    /// Horizontal position of the right edge.
    pub fn right_edge(&self, sheet: &SpriteSheet) -> f32 {
        self.x + sheet.pipe_width()
    }

    /// Whether the pipe has fully left the play field on the left.
    pub fn is_off_screen(&self, sheet: &SpriteSheet) -> bool {
        self.right_edge(sheet) < 0.0
    }

    /// Pixel-exact test of the bird against both pipes.
    pub fn collides_with(&self, bird: &Bird, sheet: &SpriteSheet) -> bool {
        let silhouette = bird.collision_silhouette(sheet);
        let bird_x = bird.x.round() as i32;
        let bird_y = bird.y.round() as i32;
        let dx = self.x.round() as i32 - bird_x;

        let top = (dx, self.top_y(sheet).round() as i32 - bird_y);
        let bottom = (dx, self.bottom_y().round() as i32 - bird_y);

        silhouette.overlaps(sheet.pipe_top_mask(), top)
            || silhouette.overlaps(sheet.pipe_bottom_mask(), bottom)
    }
}
