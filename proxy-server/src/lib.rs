//! HTTP proxy in front of the upstream catalog and the identity provider.
//!
//! The browser-facing surface: catalog endpoints that keep the upstream API
//! key server-side, and auth endpoints that front the identity provider.

pub mod routes;
