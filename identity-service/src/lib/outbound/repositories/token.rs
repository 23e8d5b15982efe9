use async_trait::async_trait;
use auth::TokenHash;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::NewToken;
use crate::domain::token::models::Token;
use crate::domain::token::models::TokenId;
use crate::domain::token::ports::TokenRepository;
use crate::domain::user::models::UserId;

const TOKEN_COLUMNS: &str =
    "id, user_id, first_name, email, token, token_hash, created_at, updated_at, expiry";

#[derive(sqlx::FromRow)]
struct TokenRow {
    id: i64,
    user_id: i64,
    first_name: String,
    email: String,
    token: String,
    token_hash: Vec<u8>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expiry: DateTime<Utc>,
}

impl TryFrom<TokenRow> for Token {
    type Error = TokenError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        let hash = TokenHash::from_slice(&row.token_hash).ok_or_else(|| {
            TokenError::DatabaseError(format!(
                "token {} has a {}-byte hash",
                row.id,
                row.token_hash.len()
            ))
        })?;

        Ok(Token {
            id: TokenId(row.id),
            user_id: UserId(row.user_id),
            first_name: row.first_name,
            email: row.email,
            plaintext: row.token,
            hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
            expires_at: row.expiry,
        })
    }
}

fn database_error(e: sqlx::Error) -> TokenError {
    TokenError::DatabaseError(e.to_string())
}

pub struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn replace_for_user(&self, token: NewToken) -> Result<Token, TokenError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // Locking the owner row serialises replacements for the same user.
        let owner: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(token.user_id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?;

        if owner.is_none() {
            return Err(TokenError::NoMatchingUser);
        }

        sqlx::query("DELETE FROM tokens WHERE user_id = $1")
            .bind(token.user_id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        let row: TokenRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tokens (user_id, first_name, email, token, token_hash, created_at, updated_at, expiry)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(token.user_id.0)
        .bind(&token.first_name)
        .bind(&token.email)
        .bind(&token.plaintext)
        .bind(token.hash.as_bytes().as_slice())
        .bind(token.created_at)
        .bind(token.updated_at)
        .bind(token.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(database_error)?;

        tx.commit().await.map_err(database_error)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &TokenId) -> Result<Option<Token>, TokenError> {
        let row: Option<TokenRow> =
            sqlx::query_as(&format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;

        row.map(Token::try_from).transpose()
    }

    async fn find_by_hash(&self, hash: &TokenHash) -> Result<Option<Token>, TokenError> {
        let row: Option<TokenRow> = sqlx::query_as(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE token_hash = $1"
        ))
        .bind(hash.as_bytes().as_slice())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Token::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Token>, TokenError> {
        let rows: Vec<TokenRow> = sqlx::query_as(&format!(
            "SELECT {TOKEN_COLUMNS} FROM tokens WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Token::try_from).collect()
    }

    async fn find_live_for_user(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Token>, TokenError> {
        let row: Option<TokenRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TOKEN_COLUMNS}
            FROM tokens
            WHERE user_id = $1 AND expiry > $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(user_id.0)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Token::try_from).transpose()
    }

    async fn delete_by_id(&self, id: &TokenId) -> Result<(), TokenError> {
        sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(())
    }

    async fn delete_by_hash(&self, hash: &TokenHash) -> Result<(), TokenError> {
        sqlx::query("DELETE FROM tokens WHERE token_hash = $1")
            .bind(hash.as_bytes().as_slice())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(())
    }
}
