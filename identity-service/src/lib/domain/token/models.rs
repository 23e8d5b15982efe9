use std::fmt;

use auth::GeneratedToken;
use auth::TokenHash;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;

/// Persisted bearer token.
///
/// `first_name` and `email` are copies of the owner's fields taken at
/// issuance and are not kept in sync afterwards.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub id: TokenId,
    pub user_id: UserId,
    pub first_name: String,
    pub email: String,
    pub plaintext: String,
    pub hash: TokenHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Expiry is absolute; a token expiring exactly at `now` is still valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("first_name", &self.first_name)
            .field("email", &self.email)
            .field("plaintext", &"<REDACTED>")
            .field("hash", &self.hash)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub i64);

impl From<i32> for TokenId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

impl From<i64> for TokenId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Token generated in memory and not yet persisted.
///
/// Owner name/email and timestamps are stamped by the token service at
/// insert time, never taken from the caller.
#[derive(Clone)]
pub struct NewToken {
    pub user_id: UserId,
    pub first_name: String,
    pub email: String,
    pub plaintext: String,
    pub hash: TokenHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewToken {
    pub fn for_user(user_id: UserId, generated: GeneratedToken) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            first_name: String::new(),
            email: String::new(),
            plaintext: generated.plaintext,
            hash: generated.hash,
            created_at: now,
            updated_at: now,
            expires_at: generated.expires_at,
        }
    }
}

impl fmt::Debug for NewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewToken")
            .field("user_id", &self.user_id)
            .field("plaintext", &"<REDACTED>")
            .field("hash", &self.hash)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
