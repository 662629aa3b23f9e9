use thiserror::Error;

/// Errors from the identity provider seam.
///
/// The two variants draw the line between what a user may see and what stays
/// in the logs: `Rejected` carries the provider's own user-safe message
/// (wrong password, unconfirmed email) and is shown verbatim, while
/// `ProviderUnavailable` wraps transport or protocol failures whose detail
/// is logged and replaced with a generic message at the surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider refused the request and said why, in user-facing terms.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or answered with an unusable
    /// response.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_provider_message_verbatim() {
        let err = AuthError::Rejected("Invalid login credentials".to_string());
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
