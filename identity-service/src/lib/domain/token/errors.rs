use auth::AuthenticationError;
use auth::BearerError;
use auth::TokenGenerationError;
use thiserror::Error;

use crate::user::errors::UserError;

/// Error for token issuance, lookup and authentication.
///
/// Callers facing the outside world must collapse every variant into a
/// single "authentication failed" answer; the variant is for logs and tests.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    // Authentication state machine
    #[error("Missing or malformed Authorization header")]
    MissingOrMalformedHeader,

    #[error("Invalid token length: expected {expected} characters, got {actual}")]
    InvalidTokenLength { expected: usize, actual: usize },

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    // Lookups and validation
    #[error("Token not found: {0}")]
    NotFound(String),

    #[error("No matching user found")]
    NoMatchingUser,

    #[error("No matching token found")]
    NoMatchingToken,

    // Issuance
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Random source error: {0}")]
    RandomSource(String),

    #[error("Token expiry out of range for ttl of {ttl_seconds} seconds")]
    ExpiryOutOfRange { ttl_seconds: i64 },

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Infrastructure errors
    #[error(transparent)]
    User(#[from] UserError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<BearerError> for TokenError {
    fn from(err: BearerError) -> Self {
        match err {
            BearerError::MissingOrMalformedHeader => TokenError::MissingOrMalformedHeader,
            BearerError::InvalidTokenLength { expected, actual } => {
                TokenError::InvalidTokenLength { expected, actual }
            }
        }
    }
}

impl From<TokenGenerationError> for TokenError {
    fn from(err: TokenGenerationError) -> Self {
        match err {
            TokenGenerationError::RandomSourceUnavailable(msg) => TokenError::RandomSource(msg),
            TokenGenerationError::ExpiryOutOfRange { ttl_seconds } => {
                TokenError::ExpiryOutOfRange { ttl_seconds }
            }
        }
    }
}

impl From<AuthenticationError> for TokenError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => TokenError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => TokenError::Password(e),
            AuthenticationError::TokenError(e) => e.into(),
        }
    }
}
