//! Game simulation core
//!
//! All gameplay logic lives here:
//! - `state`: entity and snapshot types
//! - `store`: the authoritative snapshot store and its actions
//! - `tick`: per-frame movement, collision and invulnerability
//! - `lifecycle`: menu / play / game over transitions
//!
//! No rendering or platform dependencies.

pub mod collision;
pub mod lifecycle;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::{first_enemy_hit, honey_in_reach};
pub use lifecycle::LifecycleCommand;
pub use state::{Enemy, EntityId, GameState, GameStatus, HoneyDrop, Player};
pub use store::{Action, Store, SubscriptionId};
pub use tick::{FrameInput, GameEvent, ViewBasis, tick};
