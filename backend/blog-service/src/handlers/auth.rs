/// Registration and login
use crate::error::Result;
use crate::security::JwtKeys;
use crate::services::UserService;
use actix_web::{web, HttpResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Letters, digits and @ . + - _
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150), regex(path = *USERNAME_RE))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
}

/// POST /api/v1/auth/registration
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let user = UserService::new((**pool).clone())
        .register(
            &req.username,
            req.email.as_deref().unwrap_or_default(),
            &req.password,
        )
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        id: user.id,
        username: user.username,
    }))
}

/// POST /api/v1/auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let tokens = UserService::new((**pool).clone())
        .login(&keys, &req.username, &req.password)
        .await?;

    Ok(HttpResponse::Ok().json(tokens))
}
