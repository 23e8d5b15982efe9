//! Shared fixtures for domain service tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use auth::TokenGenerator;
use auth::TokenHash;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use mockall::mock;
use tokio::sync::RwLock;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::NewToken;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenId;
use crate::domain::token::ports::TokenRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

mock! {
    pub TestUserRepository {}

    #[async_trait]
    impl UserRepository for TestUserRepository {
        async fn create(&self, user: NewUser) -> Result<User, UserError>;
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
        async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
        async fn list_all(&self) -> Result<Vec<User>, UserError>;
        async fn update(&self, user: User) -> Result<User, UserError>;
        async fn delete(&self, id: &UserId) -> Result<(), UserError>;
    }
}

mock! {
    pub TestTokenRepository {}

    #[async_trait]
    impl TokenRepository for TestTokenRepository {
        async fn replace_for_user(&self, token: NewToken) -> Result<Token, TokenError>;
        async fn find_by_id(&self, id: &TokenId) -> Result<Option<Token>, TokenError>;
        async fn find_by_hash(&self, hash: &TokenHash) -> Result<Option<Token>, TokenError>;
        async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Token>, TokenError>;
        async fn find_live_for_user(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<Option<Token>, TokenError>;
        async fn delete_by_id(&self, id: &TokenId) -> Result<(), TokenError>;
        async fn delete_by_hash(&self, hash: &TokenHash) -> Result<(), TokenError>;
    }
}

pub fn sample_user(id: i64, email: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId(id),
        first_name: PersonName::new("Some".to_string()).unwrap(),
        last_name: PersonName::new("Guy".to_string()).unwrap(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        password_hash: "not-a-hash".to_string(),
        active: true,
        created_at: now,
        updated_at: now,
        token: None,
    }
}

/// Unpersisted token owned by `user`, expiring `ttl` from now (negative for the past).
pub fn sample_new_token(user: &User, ttl: Duration) -> NewToken {
    let generated = TokenGenerator::new().generate(ttl).unwrap();
    let mut token = NewToken::for_user(user.id, generated);
    token.first_name = user.first_name.as_str().to_string();
    token.email = user.email.as_str().to_string();
    token
}

pub fn sample_token(id: i64, user: &User, ttl: Duration) -> Token {
    let token = sample_new_token(user, ttl);
    Token {
        id: TokenId(id),
        user_id: token.user_id,
        first_name: token.first_name,
        email: token.email,
        plaintext: token.plaintext,
        hash: token.hash,
        created_at: token.created_at,
        updated_at: token.updated_at,
        expires_at: token.expires_at,
    }
}

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, User>,
    tokens: Vec<Token>,
    next_user_id: i64,
    next_token_id: i64,
}

/// In-memory implementation of both repositories sharing one lock.
///
/// Deleting a user drops its tokens, like the foreign key cascade in Postgres.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens across all users.
    pub async fn token_count(&self) -> usize {
        self.state.read().await.tokens.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        state.next_user_id += 1;
        let created = User {
            id: UserId(state.next_user_id),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
            token: None,
        };
        state.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.last_name.as_str().cmp(b.last_name.as_str()));
        Ok(users)
    }

    async fn update(&self, mut user: User) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if state
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        user.token = None;
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut state = self.state.write().await;

        if state.users.remove(id).is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }
        state.tokens.retain(|t| t.user_id != *id);

        Ok(())
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn replace_for_user(&self, token: NewToken) -> Result<Token, TokenError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&token.user_id) {
            return Err(TokenError::NoMatchingUser);
        }

        state.tokens.retain(|t| t.user_id != token.user_id);
        state.next_token_id += 1;
        let stored = Token {
            id: TokenId(state.next_token_id),
            user_id: token.user_id,
            first_name: token.first_name,
            email: token.email,
            plaintext: token.plaintext,
            hash: token.hash,
            created_at: token.created_at,
            updated_at: token.updated_at,
            expires_at: token.expires_at,
        };
        state.tokens.push(stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: &TokenId) -> Result<Option<Token>, TokenError> {
        let state = self.state.read().await;
        Ok(state.tokens.iter().find(|t| t.id == *id).cloned())
    }

    async fn find_by_hash(&self, hash: &TokenHash) -> Result<Option<Token>, TokenError> {
        let state = self.state.read().await;
        Ok(state.tokens.iter().find(|t| t.hash == *hash).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Token>, TokenError> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .iter()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn find_live_for_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Token>, TokenError> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .iter()
            .filter(|t| t.user_id == *user_id && t.expires_at > now)
            .max_by_key(|t| (t.created_at, t.id))
            .cloned())
    }

    async fn delete_by_id(&self, id: &TokenId) -> Result<(), TokenError> {
        self.state.write().await.tokens.retain(|t| t.id != *id);
        Ok(())
    }

    async fn delete_by_hash(&self, hash: &TokenHash) -> Result<(), TokenError> {
        self.state.write().await.tokens.retain(|t| t.hash != *hash);
        Ok(())
    }
}
