//! Keyboard input
//!
//! Maps raw macroquad key codes to game keys and tracks which movement
//! keys are held. Horizontal velocity is derived from the held keys:
//! left and right cancel each other out.

use macroquad::prelude::KeyCode;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Jump,       // Up / W
    MoveLeft,   // Left / A
    MoveRight,  // Right / D
    Restart,    // R (only while game over)
}

impl GameKey {
    pub fn from_keycode(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Up | KeyCode::W => Some(GameKey::Jump),
            KeyCode::Left | KeyCode::A => Some(GameKey::MoveLeft),
            KeyCode::Right | KeyCode::D => Some(GameKey::MoveRight),
            KeyCode::R => Some(GameKey::Restart),
            _ => None,
        }
    }
}

/// Held state of the two movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTracker {
    pub left_down: bool,
    pub right_down: bool,
}

impl InputTracker {
    /// Record a key press. Returns true if movement state changed.
    pub fn press(&mut self, key: GameKey) -> bool {
        self.set(key, true)
    }

    /// Record a key release. Returns true if movement state changed.
    pub fn release(&mut self, key: GameKey) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: GameKey, down: bool) -> bool {
        match key {
            GameKey::MoveLeft => self.left_down = down,
            GameKey::MoveRight => self.right_down = down,
            _ => return false,
        }
        true
    }

    /// Signed horizontal velocity for a given speed
    pub fn horizontal_velocity(&self, speed: f32) -> f32 {
        match (self.left_down, self.right_down) {
            (true, false) => -speed,
            (false, true) => speed,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_table() {
        let cases = [
            (true, false, -10.0),
            (false, true, 10.0),
            (false, false, 0.0),
            (true, true, 0.0),
        ];
        for (left_down, right_down, expected) in cases {
            let tracker = InputTracker { left_down, right_down };
            assert_eq!(
                tracker.horizontal_velocity(10.0), expected,
                "left={} right={}", left_down, right_down
            );
        }
    }

    #[test]
    fn test_press_release_sequence() {
        let mut tracker = InputTracker::default();
        assert!(tracker.press(GameKey::MoveRight));
        assert_eq!(tracker.horizontal_velocity(5.0), 5.0);

        tracker.press(GameKey::MoveLeft);
        assert_eq!(tracker.horizontal_velocity(5.0), 0.0);

        tracker.release(GameKey::MoveRight);
        assert_eq!(tracker.horizontal_velocity(5.0), -5.0);

        assert!(!tracker.press(GameKey::Jump));
        assert!(!tracker.release(GameKey::Restart));
        assert_eq!(tracker, InputTracker { left_down: true, right_down: false });
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(GameKey::from_keycode(KeyCode::Up), Some(GameKey::Jump));
        assert_eq!(GameKey::from_keycode(KeyCode::W), Some(GameKey::Jump));
        assert_eq!(GameKey::from_keycode(KeyCode::A), Some(GameKey::MoveLeft));
        assert_eq!(GameKey::from_keycode(KeyCode::Left), Some(GameKey::MoveLeft));
        assert_eq!(GameKey::from_keycode(KeyCode::D), Some(GameKey::MoveRight));
        assert_eq!(GameKey::from_keycode(KeyCode::Right), Some(GameKey::MoveRight));
        assert_eq!(GameKey::from_keycode(KeyCode::R), Some(GameKey::Restart));
        assert_eq!(GameKey::from_keycode(KeyCode::Space), None);
    }
}
