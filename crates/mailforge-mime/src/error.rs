//! Error types for header and message assembly.

/// Result type alias for message assembly operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Header and message assembly error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing required header at serialization time.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// A header field rejected an assigned value.
    #[error("Invalid value for header: {0}")]
    InvalidHeaderValue(String),

    /// Invalid custom header registration.
    #[error("Invalid custom header: {0}")]
    InvalidHeaderField(String),

    /// Invalid email address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
