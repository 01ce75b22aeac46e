//! Rendering
//!
//! Draws a `GameSession` in two passes: the world through the scrolling
//! camera, then the score and game-over overlay through the fixed one.

use std::collections::HashMap;

use macroquad::prelude::*;

use crate::engine::{Bounds, Camera, Scene, Sprite, SpriteImage, Tileset};
use super::session::GameSession;

/// Textures needed to draw a level, loaded once at startup
pub struct Textures {
    player: Texture2D,
    /// Atlas per tileset, keyed by first gid
    tilesets: HashMap<u32, Texture2D>,
}

impl Textures {
    pub async fn load(player_path: &str, tilesets: &[Tileset]) -> Result<Self, macroquad::Error> {
        let player = load_texture(player_path).await?;
        player.set_filter(FilterMode::Nearest);

        let mut atlases = HashMap::new();
        for ts in tilesets {
            let texture = load_texture(&ts.image.to_string_lossy()).await?;
            texture.set_filter(FilterMode::Nearest);
            atlases.insert(ts.first_gid, texture);
        }

        Ok(Self { player, tilesets: atlases })
    }
}

/// Visible world area of a camera
fn view_bounds(camera: &Camera) -> Bounds {
    let (x, y) = camera.position;
    Bounds::new(x, y, x + camera.viewport_width, y + camera.viewport_height)
}

fn draw_sprite(sprite: &Sprite, texture: &Texture2D, source: Option<Rect>, tint: Color) {
    draw_texture_ex(
        texture,
        sprite.left(),
        sprite.bottom(),
        tint,
        DrawTextureParams {
            dest_size: Some(vec2(sprite.width, sprite.height)),
            source,
            // World space is y-up, images are stored top row first
            flip_y: true,
            ..Default::default()
        },
    );
}

fn draw_scene(scene: &Scene, textures: &Textures, view: &Bounds) {
    for layer in scene.layers() {
        if !layer.sprites.visible || layer.sprites.is_empty() {
            continue;
        }
        let tint = Color::new(1.0, 1.0, 1.0, layer.opacity);
        for sprite in layer.sprites.iter() {
            if !sprite.bounds().intersects(view) {
                continue;
            }
            let SpriteImage::Tile { gid } = sprite.image else { continue };
            let Some(tileset) = scene.tileset_for(gid) else { continue };
            let Some(texture) = textures.tilesets.get(&tileset.first_gid) else { continue };
            let source = tileset
                .source_rect(gid)
                .map(|(x, y, w, h)| Rect::new(x, y, w, h));
            draw_sprite(sprite, texture, source, tint);
        }
    }
}

/// Draw text horizontally centered on `center_x`
fn draw_text_centered(text: &str, center_x: f32, baseline_y: f32, font_size: u16, color: Color) {
    let size = measure_text(text, None, font_size, 1.0);
    draw_text(text, center_x - size.width / 2.0, baseline_y, font_size as f32, color);
}

fn draw_game_over(gui: &Camera) {
    let center_x = gui.viewport_width / 2.0;
    let center_y = gui.viewport_height / 2.0;
    draw_text_centered("Game Over", center_x, center_y - 50.0, 30, WHITE);
    draw_text_centered("Press R to Restart", center_x, center_y, 20, WHITE);
}

/// Draw one frame
pub fn draw_session(session: &GameSession, textures: &Textures, background: Color) {
    clear_background(background);

    let world = session.camera_sprites();
    world.use_camera();
    draw_scene(session.scene(), textures, &view_bounds(world));
    draw_sprite(session.player(), &textures.player, None, WHITE);

    let gui = session.camera_gui();
    gui.use_camera();
    let score_text = format!("Score: {}", session.score());
    draw_text(&score_text, 10.0, gui.viewport_height - 10.0, 18.0, WHITE);

    if session.is_game_over() {
        draw_game_over(gui);
    }

    set_default_camera();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_bounds_follow_camera() {
        let mut camera = Camera::world(1000, 650);
        camera.move_to((300.0, 40.0));
        assert_eq!(view_bounds(&camera), Bounds::new(300.0, 40.0, 1300.0, 690.0));
    }
}
