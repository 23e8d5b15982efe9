use std::sync::OnceLock;

use chrono::Duration;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::GeneratedToken;
use crate::token::TokenGenerationError;
use crate::token::TokenGenerator;

/// Hash verified against when a login names no known account.
static DUMMY_PASSWORD_HASH: OnceLock<Option<String>> = OnceLock::new();

fn dummy_password_hash(hasher: &PasswordHasher) -> Option<&'static str> {
    DUMMY_PASSWORD_HASH
        .get_or_init(|| hasher.hash("no account matched this login").ok())
        .as_deref()
}

/// Authentication coordinator combining password verification and token issuance.
///
/// Stateless: persistence of issued tokens is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_generator: TokenGenerator,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// Newly generated opaque token
    pub token: GeneratedToken,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenGenerationError),
}

impl Authenticator {
    pub fn new() -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_generator: TokenGenerator::new(),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is malformed
    pub fn password_matches(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and generate a token valid for `ttl`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `ttl` - Lifetime of the issued token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `TokenError` - Entropy source failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        ttl: Duration,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let token = self.token_generator.generate(ttl)?;

        Ok(AuthenticationResult { token })
    }

    /// Generate a token without password verification.
    ///
    /// # Errors
    /// * `TokenGenerationError` - Entropy source failed
    pub fn generate_token(&self, ttl: Duration) -> Result<GeneratedToken, TokenGenerationError> {
        self.token_generator.generate(ttl)
    }

    /// Reject a login whose subject does not exist.
    ///
    /// Runs a full password verification against a dummy hash first, so the
    /// response takes as long as a wrong password for a real account.
    pub fn reject_unknown_subject(&self, password: &str) -> AuthenticationError {
        if let Some(hash) = dummy_password_hash(&self.password_hasher) {
            let _ = self.password_hasher.verify(password, hash);
        }

        AuthenticationError::InvalidCredentials
    }
}
