//! Presentation boundary
//!
//! This module defines the trait through which the controller hands state to
//! whatever renders the board. The renderer is notified after every applied
//! transition and forwards operator intents back as
//! [`Action`](crate::game::Action)s.

use super::SyncMessage;

/// Receiver of state snapshots
///
/// Implementations might redraw a terminal, push JSON over a socket, or
/// record the messages in a test.
pub trait Observer {
    /// Delivers the state produced by the latest transition
    ///
    /// # Arguments
    ///
    /// * `state` - The synchronization message to render
    fn send_state(&self, state: &SyncMessage);
}

impl<O: Observer + ?Sized> Observer for &O {
    fn send_state(&self, state: &SyncMessage) {
        (**self).send_state(state);
    }
}

/// Observer that discards every message
impl Observer for () {
    fn send_state(&self, _state: &SyncMessage) {}
}
