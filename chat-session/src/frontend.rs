//! Conversation front-end interface.
//!
//! The controller never talks to a transport directly; it emits messages and
//! drives short-lived status indicators through this trait. The HTTP layer
//! buffers the effects into a response; tests record them.

use std::{future::Future, pin::Pin};

/// Handle of a displayable status message, for later update/removal.
pub type StatusId = u64;

/// Delivery surface for one chat session.
pub trait ChatFrontend: Send + Sync {
    /// Delivers a regular message to the user.
    fn send<'a>(&'a self, content: &'a str) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

    /// Shows a status indicator and returns its handle.
    fn send_status<'a>(
        &'a self,
        content: &'a str,
    ) -> Pin<Box<dyn Future<Output = StatusId> + Send + 'a>>;

    /// Replaces the content of an existing status indicator.
    fn update_status<'a>(
        &'a self,
        id: StatusId,
        content: &'a str,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

    /// Discards a status indicator.
    fn remove_status<'a>(&'a self, id: StatusId)
    -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}
