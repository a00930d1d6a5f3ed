/// Post service - listings, detail view and author-only writes
use crate::db::post_repo::{self, PostFields, PostScope};
use crate::db::{category_repo, location_repo};
use crate::error::{AppError, Result};
use crate::metrics::record_write;
use crate::middleware::{check_post_modify, check_post_visible};
use crate::models::{Page, PageRequest, Post, PostDetail};
use crate::policy::{self, Viewer};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Partial edit of a post. For `category_id` and `location_id` the outer
/// `None` keeps the stored value and `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub text: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Option<Uuid>>,
    pub location_id: Option<Option<Uuid>>,
    pub is_published: Option<bool>,
}

impl PostPatch {
    pub fn apply(self, post: &Post) -> PostFields {
        PostFields {
            title: self.title.unwrap_or_else(|| post.title.clone()),
            text: self.text.unwrap_or_else(|| post.text.clone()),
            pub_date: self.pub_date.unwrap_or(post.pub_date),
            location_id: self.location_id.unwrap_or(post.location_id),
            category_id: self.category_id.unwrap_or(post.category_id),
            is_published: self.is_published.unwrap_or(post.is_published),
        }
    }
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Index page: publicly visible posts, newest first.
    pub async fn list_published(&self, page: PageRequest) -> Result<Page<PostDetail>> {
        self.list(PostScope::Published, page).await
    }

    /// Publicly visible posts of one category.
    pub async fn list_for_category(
        &self,
        category_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostDetail>> {
        self.list(PostScope::PublishedInCategory(category_id), page)
            .await
    }

    /// Profile listing: the author sees every post of their own, including
    /// drafts and scheduled ones; everybody else sees the public ones.
    pub async fn list_for_author(
        &self,
        author_id: Uuid,
        viewer: &Viewer,
        page: PageRequest,
    ) -> Result<Page<PostDetail>> {
        let scope = if viewer.is(author_id) {
            PostScope::AllByAuthor(author_id)
        } else {
            PostScope::PublishedByAuthor(author_id)
        };
        self.list(scope, page).await
    }

    async fn list(&self, scope: PostScope, page: PageRequest) -> Result<Page<PostDetail>> {
        let now = Utc::now();
        let rows =
            post_repo::list_posts(&self.pool, scope, now, page.limit(), page.offset()).await?;
        let total = post_repo::count_posts(&self.pool, scope, now).await?;

        // The query already filters; the policy pass keeps the two in lockstep.
        let items = match scope {
            PostScope::AllByAuthor(_) => rows,
            _ => policy::retain_published(rows, now),
        };

        Ok(Page::new(items, page.page, page.page_size, total))
    }

    /// A single post, if `viewer` may see it. Hidden posts are reported
    /// exactly like missing ones.
    pub async fn get_visible(&self, post_id: Uuid, viewer: &Viewer) -> Result<PostDetail> {
        let post = post_repo::find_post_detail(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        check_post_visible(&post, viewer, Utc::now())?;
        Ok(post)
    }

    /// A post the actor is allowed to modify.
    pub async fn get_owned(&self, post_id: Uuid, actor: &Viewer) -> Result<Post> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        check_post_modify(&post, actor)?;
        Ok(post)
    }

    pub async fn create(&self, author_id: Uuid, fields: PostFields) -> Result<Post> {
        self.ensure_references(&fields).await?;

        let post = post_repo::create_post(&self.pool, author_id, &fields).await?;
        record_write("post", "create");
        tracing::info!(post_id = %post.id, %author_id, "post created");
        Ok(post)
    }

    pub async fn update(&self, post_id: Uuid, actor: &Viewer, patch: PostPatch) -> Result<Post> {
        let current = self.get_owned(post_id, actor).await?;
        let fields = patch.apply(&current);
        self.ensure_references(&fields).await?;

        let post = post_repo::update_post(&self.pool, post_id, &fields)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
        record_write("post", "update");
        tracing::info!(%post_id, "post updated");
        Ok(post)
    }

    /// Delete a post together with its comments.
    pub async fn delete(&self, post_id: Uuid, actor: &Viewer) -> Result<()> {
        self.get_owned(post_id, actor).await?;

        if !post_repo::delete_post(&self.pool, post_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }
        record_write("post", "delete");
        tracing::info!(%post_id, "post deleted");
        Ok(())
    }

    /// Point the post at a newly stored image. Returns the previous key so
    /// the caller can remove the old file. A post deleted since the
    /// ownership check is 404 and the new key is not recorded.
    pub async fn replace_image(&self, post_id: Uuid, image_key: &str) -> Result<Option<String>> {
        let previous = post_repo::set_post_image(&self.pool, post_id, image_key)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
        record_write("post", "image");
        Ok(previous)
    }

    async fn ensure_references(&self, fields: &PostFields) -> Result<()> {
        if let Some(category_id) = fields.category_id {
            if !category_repo::exists(&self.pool, category_id).await? {
                return Err(AppError::BadRequest(format!(
                    "Unknown category: {}",
                    category_id
                )));
            }
        }
        if let Some(location_id) = fields.location_id {
            if !location_repo::exists(&self.pool, location_id).await? {
                return Err(AppError::BadRequest(format!(
                    "Unknown location: {}",
                    location_id
                )));
            }
        }
        Ok(())
    }
}
