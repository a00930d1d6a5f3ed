/// Profile handlers - public profile page and editing your own
use super::PageQuery;
use crate::config::PaginationConfig;
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{Page, PostDetail, User};
use crate::policy::Viewer;
use crate::services::{PostService, UserService};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Only shown to the profile owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn for_viewer(user: User, viewer: &Viewer) -> Self {
        let email = viewer.is(user.id).then(|| user.email.clone());
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email,
            date_joined: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub profile: ProfileResponse,
    pub posts: Page<PostDetail>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// GET /api/v1/profile/{username}
pub async fn get_profile(
    pool: web::Data<PgPool>,
    pagination: web::Data<PaginationConfig>,
    viewer: Viewer,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.to_request(&pagination)?;
    let user = UserService::new((**pool).clone())
        .get_by_username(&username)
        .await?;
    let posts = PostService::new((**pool).clone())
        .list_for_author(user.id, &viewer, page)
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePage {
        profile: ProfileResponse::for_viewer(user, &viewer),
        posts,
    }))
}

/// PATCH /api/v1/auth/profile
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let user = UserService::new((**pool).clone())
        .update_profile(
            user_id.0,
            req.first_name.as_deref(),
            req.last_name.as_deref(),
            req.email.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse::for_viewer(user, &Viewer::User(user_id.0))))
}
