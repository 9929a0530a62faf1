//! Menu / Playing / GameOver transitions driven by the menu and HUD
//!
//! Entering `Playing` always regenerates the whole session; there is no resume.
//! The Playing → GameOver edge is taken by the store itself when the last life
//! is lost.

use super::state::GameStatus;
use super::store::Store;

/// A user-initiated lifecycle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCommand {
    /// "Play" on the main menu
    Play,
    /// "Play again" on the game over screen
    Restart,
}

impl LifecycleCommand {
    /// Status the command may be issued from
    pub fn source(self) -> GameStatus {
        match self {
            LifecycleCommand::Play => GameStatus::Menu,
            LifecycleCommand::Restart => GameStatus::GameOver,
        }
    }
}

/// Run a lifecycle command against the store.
///
/// Returns false (and leaves the store untouched) when the command does not
/// apply to the current status.
pub fn apply(store: &mut Store, command: LifecycleCommand) -> bool {
    let status = store.state().status;
    if status != command.source() || !status.can_transition_to(GameStatus::Playing) {
        log::debug!("Ignoring {:?} while {:?}", command, status);
        return false;
    }

    store.restart_game();
    log::info!("{:?}: new session started", command);
    true
}
