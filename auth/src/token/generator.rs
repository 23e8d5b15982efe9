use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use data_encoding::BASE32_NOPAD;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

use super::errors::TokenGenerationError;

/// Number of random bytes behind every token.
pub const TOKEN_ENTROPY_BYTES: usize = 16;

/// Length of an encoded token (16 bytes, unpadded base-32).
pub const TOKEN_LENGTH: usize = 26;

/// SHA-256 digest of a token plaintext.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenHash([u8; 32]);

impl TokenHash {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build a hash from a stored byte column.
    ///
    /// Returns `None` unless `bytes` is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenHash(")?;
        for byte in &self.0[..4] {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "..)")
    }
}

/// Compute the lookup hash of a token plaintext.
pub fn hash_token(plaintext: &str) -> TokenHash {
    TokenHash(Sha256::digest(plaintext.as_bytes()).into())
}

/// Freshly generated token, not yet bound to a subject or persisted.
#[derive(Clone)]
pub struct GeneratedToken {
    /// Plaintext handed to the caller once, at issuance
    pub plaintext: String,
    pub hash: TokenHash,
    /// Absolute expiry (`now + ttl`)
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for GeneratedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedToken")
            .field("plaintext", &"<REDACTED>")
            .field("hash", &self.hash)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Opaque bearer token generator.
///
/// Draws entropy from the operating system CSPRNG only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new token that expires `ttl` from now.
    ///
    /// A zero or negative `ttl` yields a token that is already expired.
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - The OS entropy source could not be read
    /// * `ExpiryOutOfRange` - `ttl` pushes the expiry past the supported date range
    pub fn generate(&self, ttl: Duration) -> Result<GeneratedToken, TokenGenerationError> {
        generate_from(&mut OsRng, ttl)
    }
}

fn generate_from<R: RngCore>(
    rng: &mut R,
    ttl: Duration,
) -> Result<GeneratedToken, TokenGenerationError> {
    let expires_at = Utc::now().checked_add_signed(ttl).ok_or(
        TokenGenerationError::ExpiryOutOfRange {
            ttl_seconds: ttl.num_seconds(),
        },
    )?;

    let mut random_bytes = [0u8; TOKEN_ENTROPY_BYTES];
    rng.try_fill_bytes(&mut random_bytes)
        .map_err(|e| TokenGenerationError::RandomSourceUnavailable(e.to_string()))?;

    let plaintext = BASE32_NOPAD.encode(&random_bytes);

    Ok(GeneratedToken {
        hash: hash_token(&plaintext),
        plaintext,
        expires_at,
    })
}
