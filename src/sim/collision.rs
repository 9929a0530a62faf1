//! Proximity tests
//!
//! No physics: an overlap is simply a squared distance under a threshold.
//! Distances are full 3D, so hover height matters.

use glam::Vec3;

use super::state::{Enemy, EntityId, HoneyDrop};
use crate::consts::{ENEMY_HIT_DIST_SQ, HONEY_PICKUP_DIST_SQ};

/// True if `a` and `b` are closer than `sqrt(threshold_sq)`
#[inline]
pub fn within(a: Vec3, b: Vec3, threshold_sq: f32) -> bool {
    a.distance_squared(b) < threshold_sq
}

/// First enemy (in list order) touching the player.
///
/// Iteration order decides simultaneous hits, not distance: the earliest
/// spawned overlapping enemy wins.
pub fn first_enemy_hit(player_pos: Vec3, enemies: &[Enemy]) -> Option<EntityId> {
    enemies
        .iter()
        .find(|e| within(player_pos, e.pos, ENEMY_HIT_DIST_SQ))
        .map(|e| e.id)
}

/// Every honey drop within pickup range of the player, in list order
pub fn honey_in_reach(player_pos: Vec3, drops: &[HoneyDrop]) -> Vec<EntityId> {
    drops
        .iter()
        .filter(|h| within(player_pos, h.pos, HONEY_PICKUP_DIST_SQ))
        .map(|h| h.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(id: EntityId, pos: Vec3) -> Enemy {
        Enemy {
            id,
            pos,
            speed: 2.0,
            heading: 0.0,
            redirect_timer: 0.0,
            hp: 100.0,
            is_dead: false,
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let a = Vec3::ZERO;
        assert!(within(a, Vec3::new(1.19, 0.0, 0.0), ENEMY_HIT_DIST_SQ));
        assert!(!within(a, Vec3::new(1.2, 0.0, 0.0), ENEMY_HIT_DIST_SQ));
    }

    #[test]
    fn test_first_hit_uses_list_order() {
        let player = Vec3::new(0.0, 0.5, 0.0);
        // Enemy 2 is closer but enemy 1 comes first
        let enemies = vec![
            enemy(1, Vec3::new(1.0, 0.5, 0.0)),
            enemy(2, Vec3::new(0.1, 0.5, 0.0)),
        ];
        assert_eq!(first_enemy_hit(player, &enemies), Some(1));
    }

    #[test]
    fn test_no_hit_when_far() {
        let enemies = vec![enemy(1, Vec3::new(5.0, 0.5, 5.0))];
        assert_eq!(first_enemy_hit(Vec3::ZERO, &enemies), None);
    }

    #[test]
    fn test_height_counts_toward_distance() {
        // Same ground spot but 1.3 units above
        let enemies = vec![enemy(1, Vec3::new(0.0, 0.5, 0.0))];
        assert_eq!(first_enemy_hit(Vec3::new(0.0, 1.8, 0.0), &enemies), None);
    }

    #[test]
    fn test_honey_in_reach() {
        let drops = vec![
            HoneyDrop {
                id: 3,
                pos: Vec3::new(1.0, 1.0, 0.0),
            },
            HoneyDrop {
                id: 4,
                pos: Vec3::new(4.0, 1.0, 0.0),
            },
            HoneyDrop {
                id: 5,
                pos: Vec3::new(0.0, 1.0, -1.4),
            },
        ];
        assert_eq!(honey_in_reach(Vec3::new(0.0, 1.0, 0.0), &drops), vec![3, 5]);
    }
}
