//! # Disclosure Panel State Machine
//!
//! One panel per expandable row. A panel starts `Unfetched`, loads its
//! children on the first expansion, and from then on only flips visibility.
//!
//! ## State machine
//!
//! ```text
//! Unfetched --toggle--> Loading --ok, non-empty--> Fetched { expanded: true }
//!                          |    --ok, empty------> Empty   { expanded: true }
//!                          '----err--------------> Unfetched (silent)
//! Fetched/Empty --toggle--> same state, expanded flipped
//! ```
//!
//! A load failure collapses back to `Unfetched` with only a warn log; the
//! next toggle retries. Fetch-once is permanent for the lifetime of the
//! panel instance; a freshly constructed panel for the same row fetches
//! again.

use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Supplies a panel's children.
///
/// Implementations wrap a parent identity (an artist, an album, a track)
/// plus the gateway call that lists its children.
#[async_trait]
pub trait ChildSource: Send + Sync {
    type Child: Send;

    /// Short description of what is being loaded, for logs.
    fn describe(&self) -> String;

    /// Loads the children. Called at most once per panel instance.
    async fn load(&self) -> Result<Vec<Self::Child>>;
}

/// Where a panel is in its fetch-and-disclose lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState<T> {
    /// Never expanded, nothing fetched.
    Unfetched,
    /// First expansion in progress.
    Loading,
    /// Children fetched and kept for the panel's lifetime.
    Fetched { children: Vec<T>, expanded: bool },
    /// Fetch succeeded with no children; remembered just like `Fetched`.
    Empty { expanded: bool },
}

/// A lazily-loading expandable row.
pub struct DisclosurePanel<S: ChildSource> {
    source: S,
    state: PanelState<S::Child>,
}

impl<S: ChildSource> DisclosurePanel<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: PanelState::Unfetched,
        }
    }

    /// Handles a click on the row.
    ///
    /// The first toggle fetches; every later toggle only flips visibility.
    /// A toggle while a load is in progress is a no-op.
    pub async fn toggle(&mut self) {
        match &mut self.state {
            PanelState::Unfetched => {
                self.state = PanelState::Loading;
                debug!(source = %self.source.describe(), "loading panel children");

                match self.source.load().await {
                    Ok(children) if children.is_empty() => {
                        self.state = PanelState::Empty { expanded: true };
                    }
                    Ok(children) => {
                        self.state = PanelState::Fetched {
                            children,
                            expanded: true,
                        };
                    }
                    Err(e) => {
                        warn!(source = %self.source.describe(), error = %e, "panel load failed");
                        self.state = PanelState::Unfetched;
                    }
                }
            }
            PanelState::Loading => {}
            PanelState::Fetched { expanded, .. } | PanelState::Empty { expanded } => {
                *expanded = !*expanded;
            }
        }
    }

    pub fn state(&self) -> &PanelState<S::Child> {
        &self.state
    }

    /// Whether the row's children area is currently visible.
    pub fn is_expanded(&self) -> bool {
        matches!(
            self.state,
            PanelState::Fetched { expanded: true, .. } | PanelState::Empty { expanded: true }
        )
    }

    /// The fetched children, if any were fetched and non-empty.
    pub fn children(&self) -> Option<&[S::Child]> {
        match &self.state {
            PanelState::Fetched { children, .. } => Some(children),
            _ => None,
        }
    }
}
