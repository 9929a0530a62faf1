//! Honey Rush - a casual 3D arcade game core
//!
//! Core modules:
//! - `sim`: Game state, store, per-frame simulation and lifecycle
//! - `audio`: Sound cue dispatch keyed off simulation events
//! - `settings`: Presentation preferences (volumes, music mute)
//!
//! Rendering, camera smoothing, HUD and menus live outside this crate and
//! talk to it through `sim::Store` snapshots and actions.

pub mod audio;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Lives at the start of a session
    pub const INITIAL_LIVES: u8 = 3;
    /// Ladybugs spawned by a restart
    pub const ENEMY_COUNT: usize = 5;
    /// Honey drops alive during a session
    pub const HONEY_DROP_COUNT: usize = 10;
    /// Score awarded per honey drop
    pub const HONEY_REWARD: u64 = 10;

    /// Half-extent of the square play field on X and Z
    pub const ARENA_HALF_EXTENT: f32 = 20.0;

    /// Player spawn point (origin, above ground)
    pub const PLAYER_START: Vec3 = Vec3::new(0.0, 2.0, 0.0);
    /// Player ground speed (units/sec)
    pub const PLAYER_SPEED: f32 = 8.0;
    /// Fraction of the remaining heading difference applied per frame
    pub const PLAYER_TURN_SMOOTHING: f32 = 0.2;
    /// Hover bobbing: y = BASE + AMPLITUDE * sin(time * FREQUENCY)
    pub const PLAYER_HOVER_BASE: f32 = 1.5;
    pub const PLAYER_HOVER_AMPLITUDE: f32 = 0.2;
    pub const PLAYER_HOVER_FREQUENCY: f32 = 3.0;

    /// Invulnerability window after a hit (seconds)
    pub const INVULNERABILITY_SECS: f64 = 2.0;
    /// Flash toggle frequency while invulnerable (rad/sec of the sine)
    pub const FLASH_FREQUENCY: f32 = 20.0;

    /// Player-vs-enemy hit distance (1.2 units, squared)
    pub const ENEMY_HIT_DIST_SQ: f32 = 1.2 * 1.2;
    /// Player-vs-honey pickup distance (1.5 units, squared)
    pub const HONEY_PICKUP_DIST_SQ: f32 = 1.5 * 1.5;

    /// Enemy spawn spread (half-extent on X and Z)
    pub const ENEMY_SPAWN_HALF_EXTENT: f32 = 12.5;
    /// Enemies walk on the ground
    pub const ENEMY_GROUND_Y: f32 = 0.5;
    /// Enemy speed range (units/sec), fixed at spawn
    pub const ENEMY_MIN_SPEED: f32 = 2.0;
    pub const ENEMY_MAX_SPEED: f32 = 4.0;
    /// Starting hit points (reserved for enemy combat)
    pub const ENEMY_BASE_HP: f32 = 100.0;
    /// Seconds between wander redirects
    pub const ENEMY_REDIRECT_SECS: f32 = 2.0;

    /// Honey drop spawn spread (half-extent on X and Z)
    pub const HONEY_SPAWN_HALF_EXTENT: f32 = 15.0;
    /// Honey drops float at this height
    pub const HONEY_Y: f32 = 1.0;

    /// Follow camera offset from the player; fixes the default view basis
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 15.0, 12.0);
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Heading (rotation about +Y) that faces along a ground-plane direction.
///
/// Zero faces +Z, matching `x = sin(heading)`, `z = cos(heading)`.
#[inline]
pub fn ground_heading(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Unit ground-plane direction for a heading
#[inline]
pub fn heading_to_ground(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

/// Clamp X/Z into the play field, leaving Y alone
#[inline]
pub fn clamp_to_arena(pos: Vec3) -> Vec3 {
    let h = consts::ARENA_HALF_EXTENT;
    Vec3::new(pos.x.clamp(-h, h), pos.y, pos.z.clamp(-h, h))
}

/// True if X/Z lie inside the play field (edges inclusive)
#[inline]
pub fn in_arena(pos: Vec3) -> bool {
    let h = consts::ARENA_HALF_EXTENT;
    (-h..=h).contains(&pos.x) && (-h..=h).contains(&pos.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_heading_round_trip() {
        let dir = Vec3::new(1.0, 0.0, 0.0);
        let heading = ground_heading(dir);
        assert!((heading - PI / 2.0).abs() < 1e-6);
        assert!(heading_to_ground(heading).distance(dir) < 1e-5);
    }

    #[test]
    fn test_clamp_to_arena_keeps_height() {
        let p = clamp_to_arena(Vec3::new(25.0, 7.0, -30.0));
        assert_eq!(p, Vec3::new(20.0, 7.0, -20.0));
        assert!(in_arena(p));
        assert!(!in_arena(Vec3::new(20.1, 0.0, 0.0)));
    }
}
