use thiserror::Error;

/// Errors from the upstream catalog client.
///
/// `UpstreamUnavailable` carries only the resource name. The proxy layer
/// must never leak upstream error internals to the browser, so the
/// underlying cause is logged at the failure site and discarded here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("upstream catalog unavailable while fetching {resource}")]
    UpstreamUnavailable { resource: &'static str },
}

impl CatalogError {
    pub fn unavailable(resource: &'static str) -> Self {
        Self::UpstreamUnavailable { resource }
    }

    /// The resource the failed call was fetching ("artists", "lyrics", ...).
    pub fn resource(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable { resource } => resource,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
