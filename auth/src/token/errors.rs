use thiserror::Error;

/// Error type for opaque token generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenGenerationError {
    /// The operating system entropy source could not be read.
    #[error("Random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    /// `now + ttl` falls outside the representable date range.
    #[error("Token expiry out of range for ttl of {ttl_seconds} seconds")]
    ExpiryOutOfRange { ttl_seconds: i64 },
}
