use thiserror::Error;

/// Errors from the proxy-facing gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The proxy could not be reached.
    #[error("gateway transport failure: {0}")]
    Transport(String),

    /// The proxy answered with an error payload.
    #[error("gateway rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The proxy's response did not match the expected shape.
    #[error("gateway response failed to decode: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
