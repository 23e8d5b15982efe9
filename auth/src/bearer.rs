use thiserror::Error;

use crate::token::TOKEN_LENGTH;

/// Authorization scheme accepted for opaque tokens.
pub const BEARER_SCHEME: &str = "Bearer";

/// Error type for `Authorization` header parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("Missing or malformed Authorization header")]
    MissingOrMalformedHeader,

    #[error("Invalid token length: expected {expected} characters, got {actual}")]
    InvalidTokenLength { expected: usize, actual: usize },
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The header must consist of exactly two single-space separated parts with
/// the scheme spelled `Bearer`, and the token must be [`TOKEN_LENGTH`]
/// characters long.
///
/// # Errors
/// * `MissingOrMalformedHeader` - Header absent, empty, wrong scheme or shape
/// * `InvalidTokenLength` - Token is not exactly [`TOKEN_LENGTH`] characters
pub fn parse_bearer(header: Option<&str>) -> Result<&str, BearerError> {
    let header = header
        .filter(|value| !value.is_empty())
        .ok_or(BearerError::MissingOrMalformedHeader)?;

    let mut parts = header.split(' ');
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => token,
        _ => return Err(BearerError::MissingOrMalformedHeader),
    };

    let actual = token.chars().count();
    if actual != TOKEN_LENGTH {
        return Err(BearerError::InvalidTokenLength {
            expected: TOKEN_LENGTH,
            actual,
        });
    }

    Ok(token)
}
