use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::token::ports::TokenRepository;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    repository: Arc<UR>,
    token_repository: Arc<TR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, TR> UserService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_repository` - Token persistence, used to attach live tokens
    pub fn new(repository: Arc<UR>, token_repository: Arc<TR>) -> Self {
        Self {
            repository,
            token_repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    async fn with_live_token(&self, user: User) -> Result<User, UserError> {
        let token = self
            .token_repository
            .find_live_for_user(&user.id, Utc::now())
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(match token {
            Some(token) => user.with_token(token),
            None => user,
        })
    }
}

#[async_trait]
impl<UR, TR> UserServicePort for UserService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let now = Utc::now();
        let user = NewUser {
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            password_hash,
            active: command.active,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User created");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        self.with_live_token(user).await
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))?;

        self.with_live_token(user).await
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(first_name) = command.first_name {
            user.first_name = first_name;
        }

        if let Some(last_name) = command.last_name {
            user.last_name = last_name;
        }

        if let Some(email) = command.email {
            user.email = email;
        }

        if let Some(active) = command.active {
            user.active = active;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.password_hasher.hash(&new_password)?;
        }

        user.updated_at = Utc::now();

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }

    async fn reset_password(&self, id: &UserId, password: &str) -> Result<(), UserError> {
        let password_hash = self.password_hasher.hash(password)?;

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        user.password_hash = password_hash;
        user.updated_at = Utc::now();
        self.repository.update(user).await?;
        tracing::info!(user_id = %id, "Password reset");

        Ok(())
    }

    fn password_matches(&self, user: &User, password: &str) -> Result<bool, UserError> {
        Ok(self.password_hasher.verify(password, &user.password_hash)?)
    }
}
