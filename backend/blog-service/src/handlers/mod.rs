/// HTTP handlers for blog-service
///
/// - Posts: index, detail, author-only edit/delete, image upload
/// - Comments: listing and author-only edit/delete under a post
/// - Catalog: categories with their posts, locations
/// - Users: registration, login, profiles
/// - Health: liveness and readiness probes
pub mod auth;
pub mod catalog;
pub mod comments;
pub mod health;
pub mod posts;
pub mod profile;

use crate::config::PaginationConfig;
use crate::error::{AppError, Result};
use crate::models::PageRequest;
use serde::{Deserialize, Deserializer};

pub use auth::{login, register};
pub use catalog::{get_category, list_categories, list_locations};
pub use comments::{create_comment, delete_comment, list_comments, update_comment};
pub use health::{health_summary, liveness_check, readiness_check};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post, upload_post_image};
pub use profile::{get_profile, update_profile};

/// `?page=N` query string, 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn to_request(&self, pagination: &PaginationConfig) -> Result<PageRequest> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::BadRequest("page must be 1 or greater".to_string()));
        }
        if (page - 1).checked_mul(pagination.page_size).is_none() {
            return Err(AppError::BadRequest("page is out of range".to_string()));
        }
        Ok(PageRequest {
            page,
            page_size: pagination.page_size,
        })
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
