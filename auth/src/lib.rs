//! Authentication utilities library
//!
//! Provides the credential primitives used by the identity service:
//! - Password hashing (Argon2id)
//! - Opaque bearer token generation (16 random bytes, base-32, SHA-256 lookup hash)
//! - `Authorization: Bearer` header parsing
//! - Authentication coordination
//!
//! Nothing here touches storage; services decide how tokens are persisted.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("other_password", &hash).unwrap());
//! ```
//!
//! ## Opaque Tokens
//! ```
//! use auth::{hash_token, TokenGenerator, TOKEN_LENGTH};
//! use chrono::Duration;
//!
//! let token = TokenGenerator::new().generate(Duration::hours(24)).unwrap();
//! assert_eq!(token.plaintext.len(), TOKEN_LENGTH);
//! assert_eq!(token.hash, hash_token(&token.plaintext));
//! ```
//!
//! ## Bearer Headers
//! ```
//! use auth::{parse_bearer, BearerError};
//!
//! let token = parse_bearer(Some("Bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ")).unwrap();
//! assert_eq!(token, "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
//! assert_eq!(parse_bearer(Some("abc")), Err(BearerError::MissingOrMalformedHeader));
//! ```

pub mod authenticator;
pub mod bearer;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use bearer::parse_bearer;
pub use bearer::BearerError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::hash_token;
pub use token::GeneratedToken;
pub use token::TokenGenerationError;
pub use token::TokenGenerator;
pub use token::TokenHash;
pub use token::TOKEN_LENGTH;
