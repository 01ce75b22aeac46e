//! 2D Camera
//!
//! Tracks a viewport origin and size in world pixels and converts to a
//! macroquad `Camera2D` when drawing. Two flavours:
//! - world: y-up, origin at the map's lower-left corner, scrolls
//! - screen: y-down screen space for HUD text, never moves

use macroquad::prelude::{set_camera, vec2, Camera2D};

/// Which way world y runs on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// y grows upward (world / tile map space)
    YUp,
    /// y grows downward (screen space, for text)
    YDown,
}

/// Viewport position and size
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Lower-left (YUp) or top-left (YDown) corner of the view in world pixels
    pub position: (f32, f32),
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub orientation: Orientation,
}

impl Camera {
    /// Scrolling camera for the world
    pub fn world(width: u32, height: u32) -> Self {
        Self {
            position: (0.0, 0.0),
            viewport_width: width as f32,
            viewport_height: height as f32,
            orientation: Orientation::YUp,
        }
    }

    /// Fixed camera for overlay text
    pub fn screen(width: u32, height: u32) -> Self {
        Self {
            orientation: Orientation::YDown,
            ..Self::world(width, height)
        }
    }

    pub fn move_to(&mut self, position: (f32, f32)) {
        self.position = position;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport_width = width as f32;
        self.viewport_height = height as f32;
    }

    /// Build the macroquad camera for the current view
    pub fn to_camera2d(&self) -> Camera2D {
        let w = self.viewport_width.max(1.0);
        let h = self.viewport_height.max(1.0);
        let zoom_y = match self.orientation {
            Orientation::YUp => 2.0 / h,
            Orientation::YDown => -2.0 / h,
        };
        Camera2D {
            target: vec2(self.position.0 + w * 0.5, self.position.1 + h * 0.5),
            zoom: vec2(2.0 / w, zoom_y),
            ..Default::default()
        }
    }

    /// Make this camera current for subsequent draw calls
    pub fn use_camera(&self) {
        set_camera(&self.to_camera2d());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_camera_targets_view_center() {
        let mut cam = Camera::world(1000, 650);
        cam.move_to((200.0, 50.0));
        let c = cam.to_camera2d();
        assert_eq!(c.target, vec2(700.0, 375.0));
        assert!(c.zoom.y > 0.0);
    }

    #[test]
    fn test_screen_camera_is_y_down() {
        let cam = Camera::screen(800, 600);
        let c = cam.to_camera2d();
        assert_eq!(c.target, vec2(400.0, 300.0));
        assert!(c.zoom.y < 0.0);
    }

    #[test]
    fn test_resize_keeps_position() {
        let mut cam = Camera::world(1000, 650);
        cam.move_to((10.0, 20.0));
        cam.resize(1280, 720);
        assert_eq!(cam.viewport_width, 1280.0);
        assert_eq!(cam.viewport_height, 720.0);
        assert_eq!(cam.position, (10.0, 20.0));
    }
}
