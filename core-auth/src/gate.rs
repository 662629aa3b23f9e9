//! # Session Gate
//!
//! Holds the process-wide answer to "who is signed in right now".
//!
//! ## Overview
//!
//! The gate starts in [`SessionStatus::Loading`], resolves once against the
//! provider's restorable session, then stays current by consuming the
//! provider's change stream on a background task. The listener is held by an
//! abort-on-drop guard so [`teardown`](SessionGate::teardown) (or dropping
//! the gate) releases the subscription.
//!
//! `Loading` and `SignedOut` are distinct on purpose: a consumer that routes
//! to a login screen while the gate is still `Loading` would bounce a user
//! whose session was about to restore.

use crate::error::Result;
use crate::provider::IdentityProvider;
use crate::types::{Session, SessionChange};
use core_runtime::config::DEFAULT_COUNTRY;
use core_runtime::events::{CoreEvent, EventBus, RecvError, SessionEvent};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The gate's view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Startup resolution has not finished yet.
    Loading,
    /// Resolution finished and nobody is signed in.
    SignedOut,
    /// A session is established.
    SignedIn(Session),
}

/// Aborts the background listener when dropped.
struct SubscriptionGuard {
    handle: JoinHandle<()>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Session state orchestrator over an [`IdentityProvider`].
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
    event_bus: EventBus,
    status: Arc<RwLock<SessionStatus>>,
    listener: Mutex<Option<SubscriptionGuard>>,
}

impl SessionGate {
    /// Creates a gate in the `Loading` state. Call
    /// [`resolve`](Self::resolve) before reading the status.
    pub fn new(provider: Arc<dyn IdentityProvider>, event_bus: EventBus) -> Self {
        Self {
            provider,
            event_bus,
            status: Arc::new(RwLock::new(SessionStatus::Loading)),
            listener: Mutex::new(None),
        }
    }

    /// Resolves the startup session and starts tracking provider changes.
    ///
    /// The change subscription is taken before the provider is queried, so a
    /// change racing the startup lookup is not lost. A provider failure here
    /// settles the gate to `SignedOut` rather than wedging it in `Loading`.
    pub async fn resolve(&self) {
        let mut changes = self.provider.subscribe();
        let status = Arc::clone(&self.status);
        let event_bus = self.event_bus.clone();

        let handle = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => apply_change(&status, &event_bus, change).await,
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "session change stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        *self.listener.lock().await = Some(SubscriptionGuard { handle });

        match self.provider.restore_session().await {
            Ok(Some(session)) => {
                info!(user_id = %session.user.id, "session restored");
                apply_change(
                    &self.status,
                    &self.event_bus,
                    SessionChange::SignedIn(session),
                )
                .await;
            }
            Ok(None) => {
                debug!("no restorable session");
                apply_change(&self.status, &self.event_bus, SessionChange::SignedOut).await;
            }
            Err(e) => {
                warn!(error = %e, "session restore failed, treating as signed out");
                *self.status.write().await = SessionStatus::SignedOut;
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Session(SessionEvent::SessionError {
                        message: "session restore failed".to_string(),
                        recoverable: true,
                    }));
            }
        }
    }

    /// Current status snapshot.
    pub async fn status(&self) -> SessionStatus {
        self.status.read().await.clone()
    }

    /// The chart country to browse: the session's preference, or
    /// [`DEFAULT_COUNTRY`] while signed out or loading.
    pub async fn country(&self) -> String {
        match &*self.status.read().await {
            SessionStatus::SignedIn(session) => session.country().to_string(),
            _ => DEFAULT_COUNTRY.to_string(),
        }
    }

    /// Signs in through the provider and settles the gate on success.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.provider.sign_in(email, password).await?;
        apply_change(
            &self.status,
            &self.event_bus,
            SessionChange::SignedIn(session.clone()),
        )
        .await;
        Ok(session)
    }

    /// Registers a new account and settles the gate on success.
    pub async fn sign_up(&self, email: &str, password: &str, country: &str) -> Result<Session> {
        let session = self.provider.sign_up(email, password, country).await?;
        apply_change(
            &self.status,
            &self.event_bus,
            SessionChange::SignedIn(session.clone()),
        )
        .await;
        Ok(session)
    }

    /// Signs out through the provider.
    pub async fn sign_out(&self) -> Result<()> {
        self.provider.sign_out().await?;
        apply_change(&self.status, &self.event_bus, SessionChange::SignedOut).await;
        Ok(())
    }

    /// Stops tracking provider changes. The status stays at its last value.
    pub async fn teardown(&self) {
        self.listener.lock().await.take();
    }
}

/// Applies a change to the shared status, emitting an event only when the
/// status actually moved. Gate-initiated changes come back around through
/// the provider's broadcast; the same-state check keeps them from emitting
/// twice.
async fn apply_change(
    status: &RwLock<SessionStatus>,
    event_bus: &EventBus,
    change: SessionChange,
) {
    let next = match change {
        SessionChange::SignedIn(session) => SessionStatus::SignedIn(session),
        SessionChange::SignedOut => SessionStatus::SignedOut,
    };

    {
        let mut current = status.write().await;
        if *current == next {
            return;
        }
        // Startup resolution to SignedOut is a settle, not a sign-out.
        if *current == SessionStatus::Loading && next == SessionStatus::SignedOut {
            *current = next;
            return;
        }
        *current = next.clone();
    }

    let event = match next {
        SessionStatus::SignedIn(session) => SessionEvent::SignedIn {
            user_id: session.user.id,
            email: session.user.email,
        },
        _ => SessionEvent::SignedOut,
    };
    let _ = event_bus.emit(CoreEvent::Session(event));
}
