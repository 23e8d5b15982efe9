use std::sync::Arc;

use async_trait::async_trait;
use auth::hash_token;
use auth::parse_bearer;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::NewToken;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenId;
use crate::domain::token::ports::TokenRepository;
use crate::domain::token::ports::TokenServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Domain service implementation for token operations.
///
/// Issues opaque bearer tokens, keeps at most one per user, and resolves
/// `Authorization` headers back to users.
pub struct TokenService<TR, UR>
where
    TR: TokenRepository,
    UR: UserRepository,
{
    token_repository: Arc<TR>,
    user_repository: Arc<UR>,
    authenticator: Authenticator,
    token_ttl: Duration,
}

impl<TR, UR> TokenService<TR, UR>
where
    TR: TokenRepository,
    UR: UserRepository,
{
    /// Create a new token service with injected dependencies.
    ///
    /// # Arguments
    /// * `token_repository` - Token persistence implementation
    /// * `user_repository` - User persistence, used to resolve token owners
    /// * `token_ttl` - Lifetime of tokens issued by `login`
    pub fn new(token_repository: Arc<TR>, user_repository: Arc<UR>, token_ttl: Duration) -> Self {
        Self {
            token_repository,
            user_repository,
            authenticator: Authenticator::new(),
            token_ttl,
        }
    }

    async fn find_owner(&self, token: &Token) -> Result<Option<User>, TokenError> {
        Ok(self.user_repository.find_by_id(&token.user_id).await?)
    }
}

#[async_trait]
impl<TR, UR> TokenServicePort for TokenService<TR, UR>
where
    TR: TokenRepository,
    UR: UserRepository,
{
    fn generate_token(&self, user_id: UserId, ttl: Duration) -> Result<NewToken, TokenError> {
        let generated = self.authenticator.generate_token(ttl)?;
        Ok(NewToken::for_user(user_id, generated))
    }

    async fn insert(&self, mut token: NewToken, user: &User) -> Result<Token, TokenError> {
        let now = Utc::now();
        token.user_id = user.id;
        token.first_name = user.first_name.as_str().to_string();
        token.email = user.email.as_str().to_string();
        token.created_at = now;
        token.updated_at = now;

        let stored = self.token_repository.replace_for_user(token).await?;
        tracing::info!(user_id = %user.id, token_id = %stored.id, "Token issued");

        Ok(stored)
    }

    async fn get(&self, id: &TokenId) -> Result<Token, TokenError> {
        self.token_repository
            .find_by_id(id)
            .await?
            .ok_or(TokenError::NotFound(id.to_string()))
    }

    async fn get_by_token(&self, plaintext: &str) -> Result<Token, TokenError> {
        self.token_repository
            .find_by_hash(&hash_token(plaintext))
            .await?
            .ok_or(TokenError::NotFound("no token with this value".to_string()))
    }

    async fn get_tokens_for_user(&self, user_id: &UserId) -> Result<Vec<Token>, TokenError> {
        self.token_repository.find_by_user(user_id).await
    }

    async fn get_user_for_token(&self, plaintext: &str) -> Result<User, TokenError> {
        let token = self.get_by_token(plaintext).await?;

        let user = self
            .find_owner(&token)
            .await?
            .ok_or(TokenError::NotFound(format!("owner of token {}", token.id)))?;

        Ok(user.with_token(token))
    }

    async fn delete(&self, id: &TokenId) -> Result<(), TokenError> {
        self.token_repository.delete_by_id(id).await
    }

    async fn delete_by_token(&self, plaintext: &str) -> Result<(), TokenError> {
        self.token_repository
            .delete_by_hash(&hash_token(plaintext))
            .await
    }

    async fn validate_token(&self, plaintext: &str) -> Result<bool, TokenError> {
        let user = match self.get_user_for_token(plaintext).await {
            Ok(user) => user,
            Err(TokenError::NotFound(_)) => return Err(TokenError::NoMatchingUser),
            Err(e) => return Err(e),
        };

        let token = user.token.ok_or(TokenError::NoMatchingToken)?;

        if token.is_expired(Utc::now()) {
            return Err(TokenError::TokenExpired);
        }

        Ok(true)
    }

    async fn authenticate(&self, authorization: Option<&str>) -> Result<User, TokenError> {
        let plaintext = parse_bearer(authorization)?;

        let token = self
            .token_repository
            .find_by_hash(&hash_token(plaintext))
            .await?
            .ok_or(TokenError::InvalidToken)?;

        if token.is_expired(Utc::now()) {
            return Err(TokenError::TokenExpired);
        }

        let user = self
            .find_owner(&token)
            .await?
            .ok_or(TokenError::InvalidToken)?;

        Ok(user.with_token(token))
    }

    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<(User, Token), TokenError> {
        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::debug!(%email, "Login for unknown email");
                return Err(self.authenticator.reject_unknown_subject(password).into());
            }
        };

        let result =
            self.authenticator
                .authenticate(password, &user.password_hash, self.token_ttl)?;

        let token = self
            .insert(NewToken::for_user(user.id, result.token), &user)
            .await?;

        Ok((user.with_token(token.clone()), token))
    }
}
