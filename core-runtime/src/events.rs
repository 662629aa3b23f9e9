//! # Event Bus System
//!
//! Provides an event-driven channel between core modules using
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The session gate publishes typed [`CoreEvent`]s whenever the
//! authentication state changes; any number of subscribers (UI shells,
//! diagnostics) can listen independently. Events are fire-and-forget: a send
//! with no active subscribers is not an error.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Session(SessionEvent::SignedOut))
//!     .ok();
//! assert!(matches!(
//!     stream.try_recv(),
//!     Ok(CoreEvent::Session(SessionEvent::SignedOut))
//! ));
//! ```
//!
//! ## Error Handling
//!
//! Receivers can observe two error conditions:
//!
//! - `RecvError::Lagged(n)`: the subscriber was too slow and missed `n`
//!   events. Non-fatal; the subscriber keeps receiving new events.
//! - `RecvError::Closed`: all senders are gone, signalling shutdown.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Session lifecycle events published by the session gate.
    Session(SessionEvent),
}

/// Session lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum SessionEvent {
    /// A session was established (login or restored on startup).
    SignedIn { user_id: String, email: String },
    /// The current session ended.
    SignedOut,
    /// The identity provider reported an error.
    SessionError { message: String, recoverable: bool },
}

/// Central broadcast channel for publishing core events.
///
/// Cloning an `EventBus` produces another handle to the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of subscribers the event was delivered to. A bus
    /// with no subscribers returns an error, which callers normally ignore.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new independent subscription to the bus.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Number of currently active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_and_receive() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(CoreEvent::Session(SessionEvent::SignedIn {
            user_id: "user-1".to_string(),
            email: "a@example.com".to_string(),
        }))
        .unwrap();

        match rx.recv().await.unwrap() {
            CoreEvent::Session(SessionEvent::SignedIn { user_id, email }) => {
                assert_eq!(user_id, "user-1");
                assert_eq!(email, "a@example.com");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_emit_without_subscribers_is_an_error() {
        let bus = EventBus::new(8);
        assert!(bus
            .emit(CoreEvent::Session(SessionEvent::SignedOut))
            .is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_independently() {
        let bus = EventBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(CoreEvent::Session(SessionEvent::SignedOut)).unwrap();

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
