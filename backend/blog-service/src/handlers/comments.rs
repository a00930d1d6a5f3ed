/// Comment handlers - nested under /posts/{post_id}/comments
use crate::error::Result;
use crate::middleware::UserId;
use crate::policy::Viewer;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

/// GET /api/v1/posts/{post_id}/comments
pub async fn list_comments(
    pool: web::Data<PgPool>,
    viewer: Viewer,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = CommentService::new((**pool).clone())
        .list_for_post(post_id.into_inner(), &viewer)
        .await?;

    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/v1/posts/{post_id}/comments
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment = CommentService::new((**pool).clone())
        .create(post_id.into_inner(), user_id.0, &req.text)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// PATCH /api/v1/posts/{post_id}/comments/{comment_id}
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let (post_id, comment_id) = path.into_inner();

    let comment = CommentService::new((**pool).clone())
        .update(post_id, comment_id, &Viewer::User(user_id.0), &req.text)
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// DELETE /api/v1/posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    CommentService::new((**pool).clone())
        .delete(post_id, comment_id, &Viewer::User(user_id.0))
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
