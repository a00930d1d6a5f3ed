/// User service - registration, login and profile edits
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::metrics::record_write;
use crate::models::User;
use crate::security::{hash_password, verify_password, JwtKeys, TokenResponse};
use sqlx::PgPool;
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        if user_repo::username_exists(&self.pool, username).await? {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(password)?;

        // A concurrent registration can still win the race to the unique index
        let user = user_repo::create_user(&self.pool, username, email, &password_hash)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                    AppError::Conflict("Username already taken".to_string())
                }
                _ => AppError::Database(err),
            })?;

        record_write("user", "create");
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token pair. Unknown usernames and wrong
    /// passwords produce the same error.
    pub async fn login(&self, keys: &JwtKeys, username: &str, password: &str) -> Result<TokenResponse> {
        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let user = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "login rejected");
            return Err(invalid());
        }

        let tokens = keys.generate_token_pair(user.id, &user.username)?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(tokens)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User> {
        let user = user_repo::update_profile(&self.pool, user_id, first_name, last_name, email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        record_write("user", "update");
        Ok(user)
    }
}
