//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the chart browser core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//! - HTTP client abstraction
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other crates depend on.
//! It establishes the logging conventions, the event broadcasting mechanism
//! used by the session gate, and the `HttpClient` seam through which every
//! network-touching component issues requests (and through which tests inject
//! canned responses).

pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod logging;

pub use error::{Error, Result};
