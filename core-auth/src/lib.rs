//! # Session Gate Module
//!
//! Authentication state for the chart browser: a thin gate over an external
//! identity provider.
//!
//! ## Overview
//!
//! The [`SessionGate`](gate::SessionGate) owns the answer to "who is signed
//! in right now". It starts in a `Loading` state, resolves once against the
//! provider's restorable session, then stays current by consuming the
//! provider's change stream until torn down. Consumers must treat `Loading`
//! and `SignedOut` as distinct states: routing to a login screen is only
//! valid after loading has resolved.
//!
//! The [`IdentityProvider`](provider::IdentityProvider) trait is the seam to
//! the external identity service; [`HttpIdentityProvider`](provider::HttpIdentityProvider)
//! is the production implementation, and tests substitute their own.

pub mod error;
pub mod gate;
pub mod provider;
pub mod types;

pub use error::{AuthError, Result};
pub use gate::{SessionGate, SessionStatus};
pub use provider::{HttpIdentityProvider, IdentityProvider};
pub use types::{Session, SessionChange, UserIdentity, SUPPORTED_COUNTRIES};
