//! Per-frame simulation step
//!
//! Called once per rendered frame with the real elapsed time. Variable
//! timestep: every rate here is scaled by `dt`, and the invulnerability and
//! wander timers are plain accumulated seconds.

use std::f32::consts::PI;

use glam::Vec3;

use super::collision::{first_enemy_hit, honey_in_reach};
use super::state::{EntityId, GameState, GameStatus};
use super::store::{Action, Store};
use crate::consts::*;
use crate::{clamp_to_arena, ground_heading, heading_to_ground, in_arena, wrap_angle};

/// Ground-plane movement basis derived from the active viewpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for ViewBasis {
    /// The follow camera sits at `CAMERA_OFFSET` looking at the player
    fn default() -> Self {
        Self::from_camera_forward(-CAMERA_OFFSET)
    }
}

impl ViewBasis {
    /// Flatten a camera look direction onto the ground plane.
    ///
    /// A camera looking straight down yields a zero basis (no movement).
    pub fn from_camera_forward(look: Vec3) -> Self {
        let forward = Vec3::new(look.x, 0.0, look.z).normalize_or_zero();
        Self {
            forward,
            right: forward.cross(Vec3::Y),
        }
    }
}

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub view: ViewBasis,
    /// Attract/demo mode - the bee flies itself
    pub autopilot: bool,
}

impl FrameInput {
    /// Normalized ground direction from the held keys (zero if none or cancelling)
    pub fn direction(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.forward {
            dir += self.view.forward;
        }
        if self.back {
            dir -= self.view.forward;
        }
        if self.left {
            dir -= self.view.right;
        }
        if self.right {
            dir += self.view.right;
        }
        dir.normalize_or_zero()
    }
}

/// Something the audio/HUD side should react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A honey drop was picked up
    Collected { id: EntityId, score: u64 },
    /// The player was hit
    Damaged { enemy: EntityId, lives: u8 },
    /// Lives ran out this frame
    GameOver { score: u64 },
}

/// Distance at which the autopilot starts dodging an enemy
const AUTOPILOT_DANGER_RADIUS: f32 = 3.0;

/// Advance the game by one frame
pub fn tick(store: &mut Store, input: &FrameInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Nothing to integrate against (e.g. the frame had no usable clock)
    if !dt.is_finite() || dt <= 0.0 {
        log::trace!("Skipping frame with dt={dt}");
        return events;
    }
    if !store.state().is_playing() {
        return events;
    }

    let time = store.dispatch(Action::AdvanceClock(dt)).time;

    let input = if input.autopilot {
        autopilot_input(store.state(), input)
    } else {
        input.clone()
    };

    update_player(store, &input, dt, time);
    update_enemies(store, dt);
    update_invulnerability(store, time, &mut events);
    collect_honey(store, &mut events);

    events
}

/// Hover height for the bob animation
#[inline]
pub fn hover_height(time: f64) -> f32 {
    let phase = (time * f64::from(PLAYER_HOVER_FREQUENCY)).sin() as f32;
    PLAYER_HOVER_BASE + phase * PLAYER_HOVER_AMPLITUDE
}

fn update_player(store: &mut Store, input: &FrameInput, dt: f32, time: f64) {
    let player = store.state().player.clone();
    let mut pos = player.pos;

    let dir = input.direction();
    if dir != Vec3::ZERO {
        pos += dir * PLAYER_SPEED * dt;

        // Ease toward the travel direction along the shortest arc
        let diff = wrap_angle(ground_heading(dir) - player.heading);
        let heading = wrap_angle(player.heading + diff * PLAYER_TURN_SMOOTHING);
        store.dispatch(Action::SetPlayerHeading(heading));
    }

    pos.y = hover_height(time);
    store.dispatch(Action::SetPlayerPos(clamp_to_arena(pos)));
}

fn update_enemies(store: &mut Store, dt: f32) {
    let snapshot = store.snapshot();

    for enemy in &snapshot.enemies {
        let mut heading = enemy.heading;
        let mut redirect_timer = enemy.redirect_timer + dt;

        if redirect_timer >= ENEMY_REDIRECT_SECS {
            let state = store.dispatch(Action::RedirectEnemy(enemy.id));
            if let Some(e) = state.enemy(enemy.id) {
                heading = e.heading;
            }
            redirect_timer = 0.0;
        }

        let mut pos = enemy.pos;
        let next = pos + heading_to_ground(heading) * enemy.speed * dt;
        if in_arena(next) {
            pos = next;
        } else {
            // Turn around instead of stepping out
            heading = wrap_angle(heading + PI);
        }

        store.dispatch(Action::SetEnemyWander {
            id: enemy.id,
            heading,
            redirect_timer,
        });
        store.dispatch(Action::UpdateEnemyPosition { id: enemy.id, pos });
    }
}

fn update_invulnerability(store: &mut Store, time: f64, events: &mut Vec<GameEvent>) {
    let snapshot = store.snapshot();

    if let Some(until) = snapshot.player.invulnerable_until {
        if time >= until {
            store.dispatch(Action::EndInvulnerability);
        } else {
            let blink = (time * f64::from(FLASH_FREQUENCY)).sin() > 0.0;
            store.dispatch(Action::SetFlash(blink));
        }
        return;
    }

    // At most one hit per frame
    let Some(enemy) = first_enemy_hit(snapshot.player.pos, &snapshot.enemies) else {
        return;
    };

    let state = store.take_damage();
    store.set_is_damaged(true);
    store.dispatch(Action::SetFlash(true));
    store.dispatch(Action::BeginInvulnerability {
        until: time + INVULNERABILITY_SECS,
    });

    log::debug!("Hit by enemy {} ({} lives left)", enemy, state.lives);
    events.push(GameEvent::Damaged {
        enemy,
        lives: state.lives,
    });

    if state.status == GameStatus::GameOver {
        log::info!("Game over with score {}", state.score);
        events.push(GameEvent::GameOver { score: state.score });
    }
}

fn collect_honey(store: &mut Store, events: &mut Vec<GameEvent>) {
    let snapshot = store.snapshot();

    for id in honey_in_reach(snapshot.player.pos, &snapshot.honey_drops) {
        let before = store.state().score;
        let state = store.collect_honey(id);
        if state.score != before {
            log::debug!("Collected honey {} (score {})", id, state.score);
            events.push(GameEvent::Collected {
                id,
                score: state.score,
            });
        }
    }
}

/// Demo-mode steering: dodge close enemies, otherwise chase the nearest honey
fn autopilot_input(state: &GameState, input: &FrameInput) -> FrameInput {
    let player = state.player.pos;
    let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z);

    let threat = state
        .enemies
        .iter()
        .map(|e| flat(e.pos - player))
        .filter(|d| d.length() < AUTOPILOT_DANGER_RADIUS)
        .min_by(|a, b| {
            a.length_squared()
                .partial_cmp(&b.length_squared())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target = state
        .honey_drops
        .iter()
        .map(|h| flat(h.pos - player))
        .min_by(|a, b| {
            a.length_squared()
                .partial_cmp(&b.length_squared())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let desired = match (threat, target) {
        (Some(away), _) => -away,
        (None, Some(toward)) => toward,
        (None, None) => Vec3::ZERO,
    };

    // Map the desired direction back onto the four keys
    let along = desired.dot(input.view.forward);
    let across = desired.dot(input.view.right);
    const DEADZONE: f32 = 0.1;
    FrameInput {
        forward: along > DEADZONE,
        back: along < -DEADZONE,
        right: across > DEADZONE,
        left: across < -DEADZONE,
        view: input.view,
        autopilot: true,
    }
}
