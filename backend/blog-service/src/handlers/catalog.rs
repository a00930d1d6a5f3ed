/// Category and location handlers
use super::PageQuery;
use crate::config::PaginationConfig;
use crate::error::Result;
use crate::models::{Category, Page, PostDetail};
use crate::services::{CatalogService, PostService};
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: Category,
    pub posts: Page<PostDetail>,
}

/// GET /api/v1/categories
pub async fn list_categories(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let categories = CatalogService::new((**pool).clone())
        .list_categories()
        .await?;

    Ok(HttpResponse::Ok().json(categories))
}

/// Category and its publicly visible posts
/// GET /api/v1/categories/{slug}
pub async fn get_category(
    pool: web::Data<PgPool>,
    pagination: web::Data<PaginationConfig>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = query.to_request(&pagination)?;
    let category = CatalogService::new((**pool).clone())
        .get_category(&slug)
        .await?;
    let posts = PostService::new((**pool).clone())
        .list_for_category(category.id, page)
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPage { category, posts }))
}

/// GET /api/v1/locations
pub async fn list_locations(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let locations = CatalogService::new((**pool).clone())
        .list_locations()
        .await?;

    Ok(HttpResponse::Ok().json(locations))
}
