use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::scene::DrawCommand;
use flappy_evo::simulation::sprites::{BIRD_FRAME_COUNT, Sprite, SpriteId, SpriteSheet};
use macroquad::prelude::*;

const SKY_TOP: Color = Color::new(0.31, 0.75, 0.79, 1.0);
const SKY_BOTTOM: Color = Color::new(0.62, 0.87, 0.85, 1.0);
const SKY_BANDS: usize = 16;

/// GPU copies of every sprite on the sheet.
pub struct Textures {
    bird: Vec<Texture2D>,
    pipe: Texture2D,
    base: Texture2D,
}

impl Textures {
    pub fn new(sheet: &SpriteSheet) -> Self {
        let bird = (0..BIRD_FRAME_COUNT)
            .map(|frame| upload(sheet.sprite(SpriteId::Bird { frame })))
            .collect();

        Self {
            bird,
            // The top pipe is the bottom one drawn upside down.
            pipe: upload(sheet.sprite(SpriteId::PipeBottom)),
            base: upload(sheet.sprite(SpriteId::Base)),
        }
    }

    fn lookup(&self, id: SpriteId) -> (&Texture2D, bool) {
        match id {
            SpriteId::Bird { frame } => (&self.bird[frame % self.bird.len()], false),
            SpriteId::PipeTop => (&self.pipe, true),
            SpriteId::PipeBottom => (&self.pipe, false),
            SpriteId::Base => (&self.base, false),
        }
    }
}

fn upload(sprite: &Sprite) -> Texture2D {
    let texture = Texture2D::from_rgba8(
        sprite.width() as u16,
        sprite.height() as u16,
        sprite.rgba(),
    );
    texture.set_filter(FilterMode::Nearest);
    texture
}

pub fn draw_sky(params: &Params) {
    clear_background(BLACK);
    let band_height = params.window_height / SKY_BANDS as f32;
    for band in 0..SKY_BANDS {
        let t = band as f32 / (SKY_BANDS - 1) as f32;
        let color = Color::new(
            SKY_TOP.r + (SKY_BOTTOM.r - SKY_TOP.r) * t,
            SKY_TOP.g + (SKY_BOTTOM.g - SKY_TOP.g) * t,
            SKY_TOP.b + (SKY_BOTTOM.b - SKY_TOP.b) * t,
            1.0,
        );
        draw_rectangle(
            0.0,
            band as f32 * band_height,
            params.window_width,
            band_height + 1.0,
            color,
        );
    }
}

pub fn draw_scene(commands: &[DrawCommand], textures: &Textures) {
    for command in commands {
        let (texture, flip_y) = textures.lookup(command.sprite);
        draw_texture_ex(
            texture,
            command.x,
            command.y,
            WHITE,
            DrawTextureParams {
                // Tilt is counter-clockwise, macroquad rotates clockwise.
                rotation: -command.rotation.to_radians(),
                flip_y,
                ..Default::default()
            },
        );
    }
}

/// Score in the top-right corner of the play field, status lines on the left.
pub fn draw_hud(params: &Params, score: u32, lines: &[String]) {
    let font_size = 40.0;
    let text = format!("Score: {}", score);
    let size = measure_text(&text, None, font_size as u16, 1.0);
    let x = params.window_width - 10.0 - size.width;
    draw_text(&text, x + 2.0, 52.0, font_size, BLACK);
    draw_text(&text, x, 50.0, font_size, WHITE);

    for (i, line) in lines.iter().enumerate() {
        let y = 50.0 + i as f32 * 30.0;
        draw_text(line, 12.0, y, 30.0, BLACK);
        draw_text(line, 10.0, y - 2.0, 30.0, WHITE);
    }
}

pub fn draw_centered_text(params: &Params, text: &str) {
    let font_size = 30.0;
    let size = measure_text(text, None, font_size as u16, 1.0);
    draw_text(
        text,
        params.window_width / 2.0 - size.width / 2.0,
        params.window_height / 2.0 - size.height / 2.0,
        font_size,
        DARKGRAY,
    );
}
