use thiserror::Error;

/// Error type for password operations.
///
/// A password that simply does not match its hash is not represented here;
/// see [`super::PasswordHasher::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Salt generation or the hashing algorithm failed.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash is malformed or could not be processed.
    #[error("Stored password hash is unusable: {0}")]
    VerificationFailed(String),
}
