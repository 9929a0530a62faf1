//! Game state and entity types
//!
//! Plain data only. Every mutation goes through `super::store::Store`, which
//! produces a fresh `GameState` snapshot per action.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Entity identifier, unique within its collection
pub type EntityId = u32;

/// Lifecycle status of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen, nothing simulates
    #[default]
    Menu,
    /// Active session
    Playing,
    /// Lives ran out; waiting for restart
    GameOver,
}

impl GameStatus {
    /// Whether a status change along this edge is part of the lifecycle.
    ///
    /// Menu → Playing (play), GameOver → Playing (restart), Playing → Playing
    /// (restart in place) and Playing → GameOver (lives exhausted).
    pub fn can_transition_to(self, next: GameStatus) -> bool {
        matches!(
            (self, next),
            (GameStatus::Menu, GameStatus::Playing)
                | (GameStatus::GameOver, GameStatus::Playing)
                | (GameStatus::Playing, GameStatus::Playing)
                | (GameStatus::Playing, GameStatus::GameOver)
        )
    }
}

/// The bee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Facing, radians about +Y (0 faces +Z)
    pub heading: f32,
    /// Simulation time at which the current invulnerability window ends.
    /// `None` while vulnerable.
    pub invulnerable_until: Option<f64>,
    /// Cosmetic blink while invulnerable
    pub flash: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            heading: 0.0,
            invulnerable_until: None,
            flash: false,
        }
    }
}

impl Player {
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_until.is_some()
    }
}

/// A roaming ladybug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec3,
    /// Ground speed (units/sec), fixed at spawn
    pub speed: f32,
    /// Wander heading, radians about +Y
    pub heading: f32,
    /// Seconds accumulated since the last wander redirect
    #[serde(default)]
    pub redirect_timer: f32,
    pub hp: f32,
    pub is_dead: bool,
}

/// A collectible honey drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoneyDrop {
    pub id: EntityId,
    pub pos: Vec3,
}

/// Complete game snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub player: Player,
    /// Remaining lives, 0..=INITIAL_LIVES
    pub lives: u8,
    pub score: u64,
    /// Set on a hit, cleared when invulnerability ends (HUD overlay / sfx trigger)
    pub is_damaged: bool,
    /// Ladybugs in spawn order
    pub enemies: Vec<Enemy>,
    /// Honey drops; replacements are appended
    pub honey_drops: Vec<HoneyDrop>,
    pub is_music_muted: bool,
    /// Simulation clock (seconds of PLAYING since the last restart)
    pub time: f64,
    /// Next entity ID
    next_id: EntityId,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state sitting on the menu with no entities
    pub fn new() -> Self {
        Self {
            status: GameStatus::Menu,
            player: Player::default(),
            lives: INITIAL_LIVES,
            score: 0,
            is_damaged: false,
            enemies: Vec::new(),
            honey_drops: Vec::new(),
            is_music_muted: false,
            time: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (never reused)
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn honey_drop(&self, id: EntityId) -> Option<&HoneyDrop> {
        self.honey_drops.iter().find(|h| h.id == id)
    }
}
