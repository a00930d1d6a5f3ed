/// Post handlers - HTTP endpoints for post operations
use super::{double_option, PageQuery};
use crate::config::PaginationConfig;
use crate::db::post_repo::PostFields;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{CommentDetail, PostDetail};
use crate::policy::Viewer;
use crate::services::{CommentService, MediaStore, PostPatch, PostService};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    /// Defaults to now; a future date schedules the post.
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_published: Option<bool>,
}

impl CreatePostRequest {
    fn into_fields(self) -> PostFields {
        PostFields {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date.unwrap_or_else(Utc::now),
            location_id: self.location_id,
            category_id: self.category_id,
            is_published: self.is_published.unwrap_or(true),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location_id: Option<Option<Uuid>>,
    pub is_published: Option<bool>,
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        PostPatch {
            title: req.title,
            text: req.text,
            pub_date: req.pub_date,
            category_id: req.category_id,
            location_id: req.location_id,
            is_published: req.is_published,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostWithComments {
    #[serde(flatten)]
    pub post: PostDetail,
    pub comments: Vec<CommentDetail>,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: Uuid,
    pub image: String,
}

/// Index page
/// GET /api/v1/posts
pub async fn list_posts(
    pool: web::Data<PgPool>,
    pagination: web::Data<PaginationConfig>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.to_request(&pagination)?;
    let posts = PostService::new((**pool).clone())
        .list_published(page)
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/v1/posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let post = PostService::new((**pool).clone())
        .create(user_id.0, req.into_fields())
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Post detail with its comments, oldest first
/// GET /api/v1/posts/{post_id}
pub async fn get_post(
    pool: web::Data<PgPool>,
    viewer: Viewer,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let post = PostService::new((**pool).clone())
        .get_visible(post_id, &viewer)
        .await?;
    let comments = CommentService::new((**pool).clone())
        .comments_of(post_id)
        .await?;

    Ok(HttpResponse::Ok().json(PostWithComments { post, comments }))
}

/// PATCH /api/v1/posts/{post_id}
pub async fn update_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let post = PostService::new((**pool).clone())
        .update(post_id.into_inner(), &Viewer::User(user_id.0), req.into())
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/v1/posts/{post_id}
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    PostService::new((**pool).clone())
        .delete(post_id.into_inner(), &Viewer::User(user_id.0))
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Replace the image of a post. Multipart field `image`.
/// POST /api/v1/posts/{post_id}/image
pub async fn upload_post_image(
    pool: web::Data<PgPool>,
    media: web::Data<MediaStore>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let service = PostService::new((**pool).clone());

    // Ownership first so strangers never get to upload anything
    service.get_owned(post_id, &Viewer::User(user_id.0)).await?;

    let limit = media.max_upload_bytes();
    let mut image_data: Option<Vec<u8>> = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        if field.name() != Some("image") {
            continue;
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Image read error: {}", e)))?;
            if data.len() + chunk.len() > limit {
                return Err(AppError::BadRequest(format!(
                    "Image exceeds maximum size of {} bytes",
                    limit
                )));
            }
            data.extend_from_slice(&chunk);
        }
        image_data = Some(data);
    }

    let image_data =
        image_data.ok_or_else(|| AppError::BadRequest("Missing multipart field: image".into()))?;

    let key = media.store_image(&image_data).await?;
    let previous = match service.replace_image(post_id, &key).await {
        Ok(previous) => previous,
        Err(err) => {
            media.remove(&key).await;
            return Err(err);
        }
    };
    if let Some(previous) = previous {
        media.remove(&previous).await;
    }

    tracing::info!(%post_id, image = %key, "post image replaced");
    Ok(HttpResponse::Ok().json(ImageResponse { id: post_id, image: key }))
}
