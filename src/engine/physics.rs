//! Platformer Physics
//!
//! Gravity plus axis-separated box collision for a single controlled sprite
//! against a static wall list. Vertical motion is resolved first, then
//! horizontal, each by snapping flush against the first face hit.
//!
//! Velocities are per update step, so the caller must run `update` at a
//! fixed rate (see `FrameClock`).

use super::sprite::{check_for_collision_with_list, Sprite, SpriteList};

/// How far below the player `can_jump` probes for ground
pub const JUMP_PROBE_DISTANCE: f32 = 5.0;

/// Contacts produced by one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepResult {
    /// Came to rest on top of a wall while falling
    pub landed: bool,
    /// Hit the underside of a wall while rising
    pub hit_ceiling: bool,
    /// Blocked horizontally
    pub hit_wall: bool,
}

/// Physics for one sprite that walks and jumps on platforms
#[derive(Debug, Clone)]
pub struct PhysicsEnginePlatformer {
    /// Downward acceleration in pixels per step per step
    pub gravity_constant: f32,
}

impl PhysicsEnginePlatformer {
    pub fn new(gravity_constant: f32) -> Self {
        Self { gravity_constant }
    }

    /// True if the player is standing on (or within a few pixels above) a wall
    pub fn can_jump(&self, player: &Sprite, walls: &SpriteList) -> bool {
        let probe = player.bounds().offset(0.0, -JUMP_PROBE_DISTANCE);
        !walls.overlapping(&probe).is_empty()
    }

    /// Advance the player by one step
    pub fn update(&self, player: &mut Sprite, walls: &SpriteList) -> StepResult {
        let mut result = StepResult::default();

        player.change_y -= self.gravity_constant;

        // Vertical
        player.center_y += player.change_y;
        let hits = check_for_collision_with_list(player, walls);
        if !hits.is_empty() {
            if player.change_y > 0.0 {
                let lowest = hits
                    .iter()
                    .filter_map(|&i| walls.get(i))
                    .map(|w| w.bottom())
                    .fold(f32::INFINITY, f32::min);
                player.set_top(lowest);
                result.hit_ceiling = true;
            } else if player.change_y < 0.0 {
                let highest = hits
                    .iter()
                    .filter_map(|&i| walls.get(i))
                    .map(|w| w.top())
                    .fold(f32::NEG_INFINITY, f32::max);
                player.set_bottom(highest);
                result.landed = true;
            }
            player.change_y = 0.0;
        }

        // Horizontal
        player.center_x += player.change_x;
        let hits = check_for_collision_with_list(player, walls);
        if !hits.is_empty() {
            if player.change_x > 0.0 {
                let nearest = hits
                    .iter()
                    .filter_map(|&i| walls.get(i))
                    .map(|w| w.left())
                    .fold(f32::INFINITY, f32::min);
                player.set_right(nearest);
                result.hit_wall = true;
            } else if player.change_x < 0.0 {
                let nearest = hits
                    .iter()
                    .filter_map(|&i| walls.get(i))
                    .map(|w| w.right())
                    .fold(f32::NEG_INFINITY, f32::max);
                player.set_left(nearest);
                result.hit_wall = true;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sprite::SpriteImage;

    fn ground(columns: usize) -> SpriteList {
        let mut walls = SpriteList::with_spatial_hash();
        for col in 0..columns {
            walls.push(
                Sprite::new(SpriteImage::Tile { gid: 1 }, 64.0, 64.0)
                    .with_position(32.0 + col as f32 * 64.0, 32.0),
            );
        }
        walls
    }

    fn player_at(x: f32, y: f32) -> Sprite {
        Sprite::new(SpriteImage::Player, 96.0, 128.0).with_position(x, y)
    }

    #[test]
    fn test_falls_and_lands_flush() {
        let walls = ground(10);
        let physics = PhysicsEnginePlatformer::new(1.0);
        let mut player = player_at(200.0, 300.0);

        let mut landed = false;
        for _ in 0..60 {
            landed |= physics.update(&mut player, &walls).landed;
        }
        assert!(landed);
        assert_eq!(player.bottom(), 64.0);
        assert_eq!(player.change_y, 0.0);
        assert!(physics.can_jump(&player, &walls));
    }

    #[test]
    fn test_resting_on_ground_stays_put() {
        let walls = ground(10);
        let physics = PhysicsEnginePlatformer::new(1.0);
        let mut player = player_at(128.0, 128.0);

        for _ in 0..10 {
            physics.update(&mut player, &walls);
            assert_eq!(player.center_y, 128.0);
        }
    }

    #[test]
    fn test_cannot_jump_in_air() {
        let walls = ground(10);
        let physics = PhysicsEnginePlatformer::new(1.0);
        let player = player_at(128.0, 400.0);
        assert!(!physics.can_jump(&player, &walls));

        // Within the probe distance counts as grounded
        let hovering = player_at(128.0, 128.0 + JUMP_PROBE_DISTANCE - 1.0);
        assert!(physics.can_jump(&hovering, &walls));
    }

    #[test]
    fn test_wall_blocks_horizontal_motion() {
        let mut walls = ground(10);
        // Column of tiles at x 320..384 rising above the floor
        for row in 1..4 {
            walls.push(
                Sprite::new(SpriteImage::Tile { gid: 1 }, 64.0, 64.0)
                    .with_position(352.0, 32.0 + row as f32 * 64.0),
            );
        }
        let physics = PhysicsEnginePlatformer::new(1.0);
        let mut player = player_at(128.0, 128.0);
        player.change_x = 10.0;

        let mut blocked = false;
        for _ in 0..30 {
            blocked |= physics.update(&mut player, &walls).hit_wall;
        }
        assert!(blocked);
        assert_eq!(player.right(), 320.0);
        // Velocity survives so the held key keeps pushing
        assert_eq!(player.change_x, 10.0);
    }

    #[test]
    fn test_ceiling_stops_jump() {
        let mut walls = ground(10);
        walls.push(
            Sprite::new(SpriteImage::Tile { gid: 1 }, 64.0, 64.0).with_position(128.0, 288.0),
        );
        let physics = PhysicsEnginePlatformer::new(1.0);
        let mut player = player_at(128.0, 128.0);
        player.change_y = 20.0;

        let mut bonked = false;
        for _ in 0..10 {
            bonked |= physics.update(&mut player, &walls).hit_ceiling;
        }
        assert!(bonked);
        assert!(player.top() <= 256.0);
    }
}
