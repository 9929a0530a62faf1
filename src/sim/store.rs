//! Authoritative game state store
//!
//! Holds the current `GameState` snapshot behind an `Arc`. Every mutation is an
//! `Action` applied to a copy of the snapshot; the copy then replaces the
//! current one and subscribers are notified synchronously. Readers holding an
//! older `Arc` never see a half-applied update.
//!
//! `Store` takes `&mut self` for every mutation, so there is exactly one
//! writer. Subscribers must be `Send`, so the whole store can move behind a
//! `Mutex` when the game loop and the presentation run on different threads.

use std::sync::Arc;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Enemy, EntityId, GameState, GameStatus, HoneyDrop};
use crate::Settings;
use crate::consts::*;

/// A named, atomic state mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the status unconditionally
    SetStatus(GameStatus),
    /// Replace the player position (no bounds check)
    SetPlayerPos(Vec3),
    /// Lose one life if playing; zero lives ends the game
    TakeDamage,
    /// Damage overlay flag, no gameplay effect
    SetIsDamaged(bool),
    /// Subtract hp from one enemy
    DamageEnemy { id: EntityId, amount: f32 },
    /// Replace one enemy's position
    UpdateEnemyPosition { id: EntityId, pos: Vec3 },
    /// Pick up a honey drop and spawn its replacement
    CollectHoney(EntityId),
    /// Full reset into a new session
    RestartGame,
    /// Flip the music mute flag
    ToggleMusic,

    // Simulation-internal bookkeeping, dispatched by `tick`
    /// Advance the simulation clock
    AdvanceClock(f32),
    SetPlayerHeading(f32),
    /// Enter the invulnerability window ending at `until`
    BeginInvulnerability { until: f64 },
    SetFlash(bool),
    /// Leave the invulnerability window, clearing flash and damage flags
    EndInvulnerability,
    /// Perturb an enemy's heading by a random turn and reset its timer
    RedirectEnemy(EntityId),
    /// Persist an enemy's wander state
    SetEnemyWander {
        id: EntityId,
        heading: f32,
        redirect_timer: f32,
    },
}

/// Handle returned by `Store::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&GameState) + Send>;

/// The single source of truth for a running game
pub struct Store {
    state: Arc<GameState>,
    rng: Pcg32,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Store {
    /// Create a store on the menu, seeding spawn randomness
    pub fn new(seed: u64) -> Self {
        Self {
            state: Arc::new(GameState::new()),
            rng: Pcg32::seed_from_u64(seed),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Create a store with presentation preferences applied
    pub fn with_settings(seed: u64, settings: &Settings) -> Self {
        let mut store = Self::new(seed);
        let mut state = GameState::new();
        state.is_music_muted = settings.music_muted;
        store.state = Arc::new(state);
        store
    }

    /// Current snapshot
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current snapshot as a shareable handle
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    /// Register a callback run after every effective mutation
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&GameState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscriber; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Apply an action and return the resulting snapshot.
    ///
    /// Actions that turn out to be no-ops (wrong status, unknown id) return
    /// the current snapshot untouched and notify nobody.
    pub fn dispatch(&mut self, action: Action) -> Arc<GameState> {
        let mut next = GameState::clone(&self.state);
        if !reduce(&mut next, &action, &mut self.rng) {
            return self.snapshot();
        }

        if next.status != self.state.status {
            log::info!("Status {:?} -> {:?}", self.state.status, next.status);
        }

        self.state = Arc::new(next);
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
        self.snapshot()
    }

    pub fn set_status(&mut self, status: GameStatus) -> Arc<GameState> {
        self.dispatch(Action::SetStatus(status))
    }

    pub fn set_player_pos(&mut self, pos: Vec3) -> Arc<GameState> {
        self.dispatch(Action::SetPlayerPos(pos))
    }

    pub fn take_damage(&mut self) -> Arc<GameState> {
        self.dispatch(Action::TakeDamage)
    }

    pub fn set_is_damaged(&mut self, damaged: bool) -> Arc<GameState> {
        self.dispatch(Action::SetIsDamaged(damaged))
    }

    pub fn damage_enemy(&mut self, id: EntityId, amount: f32) -> Arc<GameState> {
        self.dispatch(Action::DamageEnemy { id, amount })
    }

    pub fn update_enemy_position(&mut self, id: EntityId, pos: Vec3) -> Arc<GameState> {
        self.dispatch(Action::UpdateEnemyPosition { id, pos })
    }

    pub fn collect_honey(&mut self, id: EntityId) -> Arc<GameState> {
        self.dispatch(Action::CollectHoney(id))
    }

    pub fn restart_game(&mut self) -> Arc<GameState> {
        self.dispatch(Action::RestartGame)
    }

    pub fn toggle_music(&mut self) -> Arc<GameState> {
        self.dispatch(Action::ToggleMusic)
    }
}

/// Apply `action` to `state` in place. Returns false when nothing changed.
fn reduce(state: &mut GameState, action: &Action, rng: &mut Pcg32) -> bool {
    match *action {
        Action::SetStatus(status) => {
            state.status = status;
        }
        Action::SetPlayerPos(pos) => {
            state.player.pos = pos;
        }
        Action::TakeDamage => {
            if !state.is_playing() {
                return false;
            }
            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 {
                state.status = GameStatus::GameOver;
            }
        }
        Action::SetIsDamaged(damaged) => {
            state.is_damaged = damaged;
        }
        Action::DamageEnemy { id, amount } => {
            let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) else {
                return false;
            };
            enemy.hp -= amount;
            enemy.is_dead = enemy.hp <= 0.0;
        }
        Action::UpdateEnemyPosition { id, pos } => {
            let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) else {
                return false;
            };
            enemy.pos = pos;
        }
        Action::CollectHoney(id) => {
            if !state.is_playing() {
                return false;
            }
            // Only a real pickup scores and spawns a replacement
            let Some(index) = state.honey_drops.iter().position(|h| h.id == id) else {
                return false;
            };
            state.honey_drops.remove(index);
            let drop = spawn_honey_drop(state, rng);
            state.honey_drops.push(drop);
            state.score += HONEY_REWARD;
        }
        Action::RestartGame => restart(state, rng),
        Action::ToggleMusic => {
            state.is_music_muted = !state.is_music_muted;
        }
        Action::AdvanceClock(dt) => {
            state.time += f64::from(dt);
        }
        Action::SetPlayerHeading(heading) => {
            state.player.heading = heading;
        }
        Action::BeginInvulnerability { until } => {
            state.player.invulnerable_until = Some(until);
        }
        Action::SetFlash(flash) => {
            if state.player.flash == flash {
                return false;
            }
            state.player.flash = flash;
        }
        Action::EndInvulnerability => {
            state.player.invulnerable_until = None;
            state.player.flash = false;
            state.is_damaged = false;
        }
        Action::RedirectEnemy(id) => {
            let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) else {
                return false;
            };
            let turn = rng.random_range(-std::f32::consts::PI..=std::f32::consts::PI);
            enemy.heading = crate::wrap_angle(enemy.heading + turn);
            enemy.redirect_timer = 0.0;
        }
        Action::SetEnemyWander {
            id,
            heading,
            redirect_timer,
        } => {
            let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) else {
                return false;
            };
            enemy.heading = heading;
            enemy.redirect_timer = redirect_timer;
        }
    }
    true
}

/// Reset everything for a new session
fn restart(state: &mut GameState, rng: &mut Pcg32) {
    let enemies: Vec<Enemy> = (0..ENEMY_COUNT).map(|_| spawn_enemy(state, rng)).collect();
    let honey_drops: Vec<HoneyDrop> = (0..HONEY_DROP_COUNT)
        .map(|_| spawn_honey_drop(state, rng))
        .collect();

    state.status = GameStatus::Playing;
    state.lives = INITIAL_LIVES;
    state.score = 0;
    state.is_damaged = false;
    state.player = Default::default();
    state.time = 0.0;
    state.enemies = enemies;
    state.honey_drops = honey_drops;

    log::debug!(
        "Restarted: {} enemies, {} honey drops",
        state.enemies.len(),
        state.honey_drops.len()
    );
}

fn spawn_enemy(state: &mut GameState, rng: &mut Pcg32) -> Enemy {
    let h = ENEMY_SPAWN_HALF_EXTENT;
    Enemy {
        id: state.next_entity_id(),
        pos: Vec3::new(
            rng.random_range(-h..=h),
            ENEMY_GROUND_Y,
            rng.random_range(-h..=h),
        ),
        speed: rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED),
        heading: rng.random_range(0.0..std::f32::consts::TAU),
        redirect_timer: 0.0,
        hp: ENEMY_BASE_HP,
        is_dead: false,
    }
}

fn spawn_honey_drop(state: &mut GameState, rng: &mut Pcg32) -> HoneyDrop {
    let h = HONEY_SPAWN_HALF_EXTENT;
    HoneyDrop {
        id: state.next_entity_id(),
        pos: Vec3::new(rng.random_range(-h..=h), HONEY_Y, rng.random_range(-h..=h)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

    fn playing_store() -> Store {
        let mut store = Store::new(12345);
        store.restart_game();
        store
    }

    #[test]
    fn test_restart_populates_session() {
        let store = playing_store();
        let state = store.state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.lives, INITIAL_LIVES);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.pos, PLAYER_START);
        assert_eq!(state.enemies.len(), ENEMY_COUNT);
        assert_eq!(state.honey_drops.len(), HONEY_DROP_COUNT);

        for enemy in &state.enemies {
            assert!(enemy.pos.x.abs() <= ENEMY_SPAWN_HALF_EXTENT);
            assert!(enemy.pos.z.abs() <= ENEMY_SPAWN_HALF_EXTENT);
            assert!((ENEMY_MIN_SPEED..ENEMY_MAX_SPEED).contains(&enemy.speed));
            assert_eq!(enemy.hp, ENEMY_BASE_HP);
        }
        for drop in &state.honey_drops {
            assert!(crate::in_arena(drop.pos));
        }
    }

    #[test]
    fn test_restart_resets_from_any_state() {
        let mut store = playing_store();
        let first_drop = store.state().honey_drops[0].id;
        store.collect_honey(first_drop);
        store.take_damage();
        store.take_damage();
        store.take_damage();
        assert_eq!(store.state().status, GameStatus::GameOver);

        store.restart_game();
        store.restart_game();
        let state = store.state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.lives, INITIAL_LIVES);
        assert_eq!(state.score, 0);
        assert_eq!(state.enemies.len(), ENEMY_COUNT);
        assert_eq!(state.honey_drops.len(), HONEY_DROP_COUNT);
    }

    #[test]
    fn test_take_damage_to_game_over() {
        let mut store = playing_store();
        store.take_damage();
        assert_eq!(store.state().lives, 2);
        store.take_damage();
        assert_eq!(store.state().lives, 1);
        assert_eq!(store.state().status, GameStatus::Playing);
        store.take_damage();
        assert_eq!(store.state().lives, 0);
        assert_eq!(store.state().status, GameStatus::GameOver);

        // Further damage is ignored until restart
        store.take_damage();
        assert_eq!(store.state().lives, 0);
        assert_eq!(store.state().status, GameStatus::GameOver);
    }

    #[test]
    fn test_take_damage_ignored_outside_playing() {
        let mut store = Store::new(1);
        let before = store.snapshot();
        let after = store.take_damage();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(store.state().lives, INITIAL_LIVES);
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut store = playing_store();
        for _ in 0..3 {
            store.take_damage();
        }
        // Force back into play with no lives left
        store.set_status(GameStatus::Playing);
        store.take_damage();
        assert_eq!(store.state().lives, 0);
        assert_eq!(store.state().status, GameStatus::GameOver);
    }

    #[test]
    fn test_collect_honey_replaces_drop() {
        let mut store = playing_store();
        let first_drop = store.state().honey_drops[0].id;
        store.collect_honey(first_drop);

        let state = store.state();
        assert_eq!(state.score, HONEY_REWARD);
        assert_eq!(state.honey_drops.len(), HONEY_DROP_COUNT);
        assert!(state.honey_drop(first_drop).is_none());
    }

    #[test]
    fn test_collect_unknown_honey_is_noop() {
        let mut store = playing_store();
        let before = store.snapshot();
        let after = store.collect_honey(9999);
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.score, 0);
        assert_eq!(after.honey_drops.len(), HONEY_DROP_COUNT);
    }

    #[test]
    fn test_collect_honey_ignored_after_game_over() {
        let mut store = playing_store();
        let drop = store.state().honey_drops[0].id;
        for _ in 0..3 {
            store.take_damage();
        }
        store.collect_honey(drop);
        let state = store.state();
        assert_eq!(state.score, 0);
        assert!(state.honey_drop(drop).is_some());
    }

    #[test]
    fn test_ids_unique_after_many_collections() {
        let mut store = playing_store();
        for _ in 0..50 {
            let id = store.state().honey_drops[0].id;
            store.collect_honey(id);
        }
        let state = store.state();
        let ids: HashSet<_> = state.honey_drops.iter().map(|h| h.id).collect();
        assert_eq!(ids.len(), HONEY_DROP_COUNT);
        assert_eq!(state.score, 50 * HONEY_REWARD);
    }

    #[test]
    fn test_damage_enemy_marks_dead() {
        let mut store = playing_store();
        let id = store.state().enemies[0].id;
        store.damage_enemy(id, 40.0);
        assert_eq!(store.state().enemy(id).unwrap().hp, 60.0);
        assert!(!store.state().enemy(id).unwrap().is_dead);
        store.damage_enemy(id, 60.0);
        assert!(store.state().enemy(id).unwrap().is_dead);

        let before = store.snapshot();
        let after = store.damage_enemy(9999, 10.0);
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_update_enemy_position() {
        let mut store = playing_store();
        let id = store.state().enemies[1].id;
        let pos = Vec3::new(3.0, 0.5, -4.0);
        store.update_enemy_position(id, pos);
        assert_eq!(store.state().enemy(id).unwrap().pos, pos);
    }

    #[test]
    fn test_toggle_music_and_flags() {
        let mut store = Store::new(7);
        store.toggle_music();
        assert!(store.state().is_music_muted);
        store.toggle_music();
        assert!(!store.state().is_music_muted);

        store.set_is_damaged(true);
        assert!(store.state().is_damaged);
    }

    #[test]
    fn test_with_settings_applies_mute() {
        let settings = Settings {
            music_muted: true,
            ..Default::default()
        };
        let store = Store::with_settings(3, &settings);
        assert!(store.state().is_music_muted);
        assert_eq!(store.state().status, GameStatus::Menu);
    }

    #[test]
    fn test_subscribers_see_new_snapshot() {
        let mut store = Store::new(42);
        let seen = Arc::new(AtomicU64::new(0));
        let calls = Arc::new(AtomicU32::new(0));

        let (seen_c, calls_c) = (seen.clone(), calls.clone());
        let id = store.subscribe(move |state| {
            seen_c.store(state.score, Ordering::SeqCst);
            calls_c.fetch_add(1, Ordering::SeqCst);
        });

        store.restart_game();
        let drop = store.state().honey_drops[0].id;
        store.collect_honey(drop);
        assert_eq!(seen.load(Ordering::SeqCst), HONEY_REWARD);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // No-ops don't notify
        store.collect_honey(9999);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.toggle_music();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_store_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Store>();
        assert_send::<Arc<GameState>>();
    }

    #[test]
    fn test_store_behind_mutex_across_threads() {
        let store = Arc::new(Mutex::new(Store::new(8)));
        let notified = Arc::new(AtomicU32::new(0));

        let counter = notified.clone();
        store.lock().unwrap().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let mut store = store.lock().unwrap();
                store.restart_game();
                store.take_damage();
            })
        };
        writer.join().unwrap();

        let snapshot = store.lock().unwrap().snapshot();
        let reader = std::thread::spawn(move || (snapshot.status, snapshot.lives));
        assert_eq!(reader.join().unwrap(), (GameStatus::Playing, INITIAL_LIVES - 1));
        assert_eq!(notified.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_redirect_turns_at_most_half_a_circle() {
        let mut store = playing_store();
        let id = store.state().enemies[0].id;
        let mut turned = false;
        for _ in 0..50 {
            let before = store.state().enemy(id).unwrap().heading;
            let state = store.dispatch(Action::RedirectEnemy(id));
            let enemy = state.enemy(id).unwrap();
            let turn = crate::wrap_angle(enemy.heading - before);
            assert!(turn.abs() <= std::f32::consts::PI + 1e-5);
            assert!(enemy.heading.abs() <= std::f32::consts::PI + 1e-5);
            assert_eq!(enemy.redirect_timer, 0.0);
            turned |= turn.abs() > 1e-3;
        }
        assert!(turned);
    }

    #[test]
    fn test_old_snapshots_are_untouched() {
        let mut store = playing_store();
        let old = store.snapshot();
        store.take_damage();
        assert_eq!(old.lives, INITIAL_LIVES);
        assert_eq!(store.state().lives, INITIAL_LIVES - 1);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = playing_store();
        let b = playing_store();
        assert_eq!(a.state(), b.state());
    }
}
