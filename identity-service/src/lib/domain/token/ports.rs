use async_trait::async_trait;
use auth::TokenHash;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::NewToken;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenId;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for token issuance, lookup and bearer authentication.
#[async_trait]
pub trait TokenServicePort: Send + Sync + 'static {
    /// Generate an unpersisted token for `user_id` expiring `ttl` from now.
    ///
    /// # Errors
    /// * `RandomSource` - Entropy source could not be read
    fn generate_token(&self, user_id: UserId, ttl: Duration) -> Result<NewToken, TokenError>;

    /// Persist `token` for `user`, deleting every token the user held before.
    ///
    /// Owner name/email and timestamps are taken from `user` and the clock.
    ///
    /// # Errors
    /// * `NoMatchingUser` - User no longer exists
    /// * `DatabaseError` - Database operation failed (nothing was changed)
    async fn insert(&self, token: NewToken, user: &User) -> Result<Token, TokenError>;

    /// # Errors
    /// * `NotFound` - No token with this identifier
    async fn get(&self, id: &TokenId) -> Result<Token, TokenError>;

    /// # Errors
    /// * `NotFound` - No token with this plaintext
    async fn get_by_token(&self, plaintext: &str) -> Result<Token, TokenError>;

    /// All tokens owned by a user, oldest first.
    async fn get_tokens_for_user(&self, user_id: &UserId) -> Result<Vec<Token>, TokenError>;

    /// Resolve a token plaintext to its owner, with the token attached.
    ///
    /// # Errors
    /// * `NotFound` - Token or owner does not exist
    async fn get_user_for_token(&self, plaintext: &str) -> Result<User, TokenError>;

    /// Delete a token by identifier. Missing tokens are not an error.
    async fn delete(&self, id: &TokenId) -> Result<(), TokenError>;

    /// Delete a token by plaintext. Missing tokens are not an error.
    async fn delete_by_token(&self, plaintext: &str) -> Result<(), TokenError>;

    /// Check that a token resolves to a user and has not expired.
    ///
    /// # Returns
    /// `true` when every check passes
    ///
    /// # Errors
    /// * `NoMatchingUser` - Token or owner could not be resolved
    /// * `NoMatchingToken` - Resolved user carries no token data
    /// * `TokenExpired` - Token expiry is in the past
    async fn validate_token(&self, plaintext: &str) -> Result<bool, TokenError>;

    /// Authenticate a request from its `Authorization` header value.
    ///
    /// # Returns
    /// The token owner with the presented token attached
    ///
    /// # Errors
    /// * `MissingOrMalformedHeader` - Header absent or not `Bearer <token>`
    /// * `InvalidTokenLength` - Token is not 26 characters (no store access)
    /// * `InvalidToken` - Token or its owner is unknown
    /// * `TokenExpired` - Token expiry is in the past
    async fn authenticate(&self, authorization: Option<&str>) -> Result<User, TokenError>;

    /// Verify email and password, then issue a fresh token with the configured lifetime.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Password` - Stored hash is malformed
    /// * `RandomSource` - Entropy source could not be read
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<(User, Token), TokenError>;
}

/// Persistence operations for tokens.
#[async_trait]
pub trait TokenRepository: Send + Sync + 'static {
    /// Delete every token owned by `token.user_id`, then insert `token`.
    ///
    /// Must run as one unit of work serialised per user: when any step fails
    /// nothing is changed, and concurrent calls for the same user leave
    /// exactly one token behind.
    ///
    /// # Errors
    /// * `NoMatchingUser` - Owner does not exist
    /// * `DatabaseError` - Database operation failed
    async fn replace_for_user(&self, token: NewToken) -> Result<Token, TokenError>;

    async fn find_by_id(&self, id: &TokenId) -> Result<Option<Token>, TokenError>;

    async fn find_by_hash(&self, hash: &TokenHash) -> Result<Option<Token>, TokenError>;

    /// Tokens owned by a user ordered by creation time.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Token>, TokenError>;

    /// Most recently created token of a user that has not expired at `now`.
    async fn find_live_for_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Token>, TokenError>;

    /// Returns success when no row matched.
    async fn delete_by_id(&self, id: &TokenId) -> Result<(), TokenError>;

    /// Returns success when no row matched.
    async fn delete_by_hash(&self, hash: &TokenHash) -> Result<(), TokenError>;
}
