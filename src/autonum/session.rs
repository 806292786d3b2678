//! Explicit ownership of the one live controller.

use crate::controller::NumberingController;
use crate::host::NotificationStream;

/// Holds at most one live [`NumberingController`]. Installing a new one
/// drops the previous one, which in turn tears down its subscription, so no
/// two controllers can ever be listening at once.
///
/// The host's shutdown path calls [`NumberingSession::clear`], which is the
/// process-lifecycle hook: whatever is live gets disabled and released.
pub struct NumberingSession<S: NotificationStream> {
    current: Option<NumberingController<S>>,
}

impl<S: NotificationStream> NumberingSession<S> {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&NumberingController<S>> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut NumberingController<S>> {
        self.current.as_mut()
    }

    /// Replaces any live controller with the given one and returns a handle
    /// to it.
    pub fn install(&mut self, controller: NumberingController<S>) -> &mut NumberingController<S> {
        self.current.insert(controller)
    }

    /// Drops the live controller, if any. Its `Drop` impl releases the
    /// subscription.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl<S: NotificationStream> Default for NumberingSession<S> {
    fn default() -> Self {
        Self::new()
    }
}
