//! Procedurally drawn sprites and their collision masks.
//!
//! All artwork is generated at startup into a [`SpriteSheet`] that is shared by
//! the world (for masks and sprite sizes) and the renderer (for textures).

use serde::{Deserialize, Serialize};

use super::mask::Mask;

/// RGBA color.
pub type Rgba = [u8; 4];

const CLEAR: Rgba = [0, 0, 0, 0];
const OUTLINE: Rgba = [48, 32, 36, 255];
const BIRD_BODY: Rgba = [245, 200, 66, 255];
const BIRD_WING: Rgba = [250, 248, 240, 255];
const BIRD_BEAK: Rgba = [225, 75, 35, 255];
const PIPE_DARK: Rgba = [74, 122, 26, 255];
const PIPE_MID: Rgba = [100, 170, 40, 255];
const PIPE_LIGHT: Rgba = [145, 215, 62, 255];
const GRASS: Rgba = [84, 168, 55, 255];
const GRASS_LIGHT: Rgba = [110, 200, 70, 255];
const DIRT: Rgba = [222, 216, 149, 255];
const DIRT_DARK: Rgba = [200, 190, 120, 255];

/// Factor between the native artwork and the play field.
const BIRD_SCALE: usize = 4;
const WORLD_SCALE: usize = 2;

const PIPE_NATIVE_WIDTH: usize = 52;
const PIPE_NATIVE_HEIGHT: usize = 320;
const PIPE_CAP_ROWS: usize = 12;
const PIPE_BODY_INSET: usize = 2;
const BASE_NATIVE_WIDTH: usize = 336;
const BASE_NATIVE_HEIGHT: usize = 112;
const BASE_GRASS_ROWS: usize = 10;

#[rustfmt::skip]
const BIRD_FRAMES: [[&str; 12]; 3] = [
    [
        "......KKKKKK.....",
        "....KKYYYKWWK....",
        "...KYYYYKWWWWK...",
        ".KKKKYYYKWWWKWK..",
        "KWWWWKYYKWWWKWK..",
        "KWWWWWKYYKWWWWK..",
        "KYWWWYKYYYKKKKKK.",
        ".KYYYKYYYKOOOOOOK",
        "..KKKYYYKOKKKKKK.",
        "..KYYYYYYKOOOOOK.",
        "...KKYYYYYKKKKK..",
        ".....KKKKK.......",
    ],
    [
        "......KKKKKK.....",
        "....KKYYYKWWK....",
        "...KYYYYKWWWWK...",
        "..KYYYYYKWWWKWK..",
        ".KKKKKYYKWWWKWK..",
        "KWWWWWKYYKWWWWK..",
        "KYWWWYKYYYKKKKKK.",
        ".KKKKKYYYKOOOOOOK",
        "..KYYYYYKOKKKKKK.",
        "..KYYYYYYKOOOOOK.",
        "...KKYYYYYKKKKK..",
        ".....KKKKK.......",
    ],
    [
        "......KKKKKK.....",
        "....KKYYYKWWK....",
        "...KYYYYKWWWWK...",
        "..KYYYYYKWWWKWK..",
        "..KYYYYYKWWWKWK..",
        ".KKKKKYYYKWWWWK..",
        "KWWWWWKYYYKKKKKK.",
        "KYWWWYKYYKOOOOOOK",
        "KYYYYKYYKOKKKKKK.",
        ".KKKKYYYYKOOOOOK.",
        "...KKYYYYYKKKKK..",
        ".....KKKKK.......",
    ],
];

/// Number of wing-flap frames of the bird.
pub const BIRD_FRAME_COUNT: usize = BIRD_FRAMES.len();

/// Identifies a piece of artwork in the [`SpriteSheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    /// One of the bird's wing-flap frames.
    Bird {
        /// Frame index in `0..BIRD_FRAME_COUNT`.
        frame: usize,
    },
    /// Upper pipe, hanging down from the ceiling.
    PipeTop,
    /// Lower pipe, standing on the ground.
    PipeBottom,
    /// Ground tile.
    Base,
}

/// A bitmap in row-major RGBA order.
#[derive(Debug, Clone)]
pub struct Sprite {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Sprite {
    /// Rasterizes `color(x, y)` at native resolution and upscales it by `scale`.
    pub fn from_fn(
        native_width: usize,
        native_height: usize,
        scale: usize,
        color: impl Fn(usize, usize) -> Rgba,
    ) -> Self {
        let width = native_width * scale;
        let height = native_height * scale;
        let mut rgba = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&color(x / scale, y / scale));
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Builds a sprite from character art, one string per row.
    fn from_art(rows: &[&str], scale: usize) -> Self {
        let native_width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        Self::from_fn(native_width, rows.len(), scale, |x, y| {
            rows[y].as_bytes().get(x).map_or(CLEAR, |&c| art_color(c))
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Color of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let i = (y * self.width + x) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }

    /// Opacity mask: every pixel with non-zero alpha is solid.
    pub fn mask(&self) -> Mask {
        Mask::from_fn(self.width, self.height, |x, y| self.pixel(x, y)[3] > 0)
    }
}

fn art_color(c: u8) -> Rgba {
    match c {
        b'K' => OUTLINE,
        b'Y' => BIRD_BODY,
        b'W' => BIRD_WING,
        b'O' => BIRD_BEAK,
        _ => CLEAR,
    }
}

/// Horizontal shading across a pipe, dark at the rims with a highlight left of center.
fn pipe_shade(x: usize, width: usize) -> Rgba {
    let t = x * 256 / width.max(1);
    match t {
        0..=15 => OUTLINE,
        16..=63 => PIPE_DARK,
        64..=111 => PIPE_LIGHT,
        112..=223 => PIPE_MID,
        224..=239 => PIPE_DARK,
        _ => OUTLINE,
    }
}

fn pipe_color(x: usize, y: usize) -> Rgba {
    if y < PIPE_CAP_ROWS {
        if y == 0 || y == PIPE_CAP_ROWS - 1 {
            OUTLINE
        } else {
            pipe_shade(x, PIPE_NATIVE_WIDTH)
        }
    } else if (PIPE_BODY_INSET..PIPE_NATIVE_WIDTH - PIPE_BODY_INSET).contains(&x) {
        pipe_shade(x - PIPE_BODY_INSET, PIPE_NATIVE_WIDTH - 2 * PIPE_BODY_INSET)
    } else {
        CLEAR
    }
}

fn base_color(x: usize, y: usize) -> Rgba {
    if y == 0 {
        OUTLINE
    } else if y < BASE_GRASS_ROWS {
        if (x + y) / 6 % 2 == 0 { GRASS } else { GRASS_LIGHT }
    } else if y == BASE_GRASS_ROWS {
        GRASS
    } else if (x + (y - BASE_GRASS_ROWS) * 2) % 12 < 6 {
        DIRT
    } else {
        DIRT_DARK
    }
}

/// All artwork of the game plus the collision masks derived from it.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    bird: Vec<Sprite>,
    bird_masks: Vec<Mask>,
    pipe: Sprite,
    pipe_top_mask: Mask,
    pipe_bottom_mask: Mask,
    base: Sprite,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteSheet {
    /// Draws every sprite and computes the masks.
    pub fn new() -> Self {
        let bird: Vec<Sprite> = BIRD_FRAMES
            .iter()
            .map(|rows| Sprite::from_art(rows, BIRD_SCALE))
            .collect();
        let bird_masks = bird.iter().map(Sprite::mask).collect();

        let pipe = Sprite::from_fn(
            PIPE_NATIVE_WIDTH,
            PIPE_NATIVE_HEIGHT,
            WORLD_SCALE,
            pipe_color,
        );
        let pipe_bottom_mask = pipe.mask();
        let pipe_top_mask = pipe_bottom_mask.flipped_vertically();

        let base = Sprite::from_fn(
            BASE_NATIVE_WIDTH,
            BASE_NATIVE_HEIGHT,
            WORLD_SCALE,
            base_color,
        );

        Self {
            bird,
            bird_masks,
            pipe,
            pipe_top_mask,
            pipe_bottom_mask,
            base,
        }
    }

    /// Artwork for `id`. Both pipes share one bitmap; the top one is drawn flipped.
    pub fn sprite(&self, id: SpriteId) -> &Sprite {
        match id {
            SpriteId::Bird { frame } => &self.bird[frame % self.bird.len()],
            SpriteId::PipeTop | SpriteId::PipeBottom => &self.pipe,
            SpriteId::Base => &self.base,
        }
    }

    /// Collision mask of a bird frame.
    pub fn bird_mask(&self, frame: usize) -> &Mask {
        &self.bird_masks[frame % self.bird_masks.len()]
    }

    /// Collision mask of the upper pipe (cap at the bottom).
    pub fn pipe_top_mask(&self) -> &Mask {
        &self.pipe_top_mask
    }

    /// Collision mask of the lower pipe (cap at the top).
    pub fn pipe_bottom_mask(&self) -> &Mask {
        &self.pipe_bottom_mask
    }

    /// Bird sprite width.
    pub fn bird_width(&self) -> f32 {
        self.bird[0].width() as f32
    }

    /// Bird sprite height.
    pub fn bird_height(&self) -> f32 {
        self.bird[0].height() as f32
    }

    /// Pipe sprite width.
    pub fn pipe_width(&self) -> f32 {
        self.pipe.width() as f32
    }

    /// Pipe sprite height.
    pub fn pipe_height(&self) -> f32 {
        self.pipe.height() as f32
    }

    /// Ground tile width.
    pub fn base_width(&self) -> f32 {
        self.base.width() as f32
    }
}
