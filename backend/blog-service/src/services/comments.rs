/// Comment service - comments hang off posts the viewer can see
use crate::db::comment_repo;
use crate::error::{AppError, Result};
use crate::metrics::record_write;
use crate::middleware::check_comment_modify;
use crate::models::{Comment, CommentDetail};
use crate::policy::Viewer;
use crate::services::PostService;
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comments of a post the viewer may see, oldest first.
    pub async fn list_for_post(&self, post_id: Uuid, viewer: &Viewer) -> Result<Vec<CommentDetail>> {
        PostService::new(self.pool.clone())
            .get_visible(post_id, viewer)
            .await?;

        self.comments_of(post_id).await
    }

    /// Comments of a post whose visibility the caller has already checked.
    pub async fn comments_of(&self, post_id: Uuid) -> Result<Vec<CommentDetail>> {
        let comments = comment_repo::list_comments_for_post(&self.pool, post_id).await?;
        Ok(comments)
    }

    /// Comment on a post. A post the author cannot see cannot be commented
    /// on either.
    pub async fn create(&self, post_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment> {
        PostService::new(self.pool.clone())
            .get_visible(post_id, &Viewer::User(author_id))
            .await?;

        let comment = comment_repo::create_comment(&self.pool, post_id, author_id, text).await?;
        record_write("comment", "create");
        tracing::info!(comment_id = %comment.id, %post_id, "comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        actor: &Viewer,
        text: &str,
    ) -> Result<Comment> {
        self.get_owned(post_id, comment_id, actor).await?;

        let comment = comment_repo::update_comment(&self.pool, comment_id, text)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
        record_write("comment", "update");
        Ok(comment)
    }

    pub async fn delete(&self, post_id: Uuid, comment_id: Uuid, actor: &Viewer) -> Result<()> {
        self.get_owned(post_id, comment_id, actor).await?;

        if !comment_repo::delete_comment(&self.pool, comment_id).await? {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }
        record_write("comment", "delete");
        tracing::info!(%comment_id, %post_id, "comment deleted");
        Ok(())
    }

    /// The comment must sit under `post_id` (else 404) and belong to the
    /// actor (else a redirect to the post).
    async fn get_owned(&self, post_id: Uuid, comment_id: Uuid, actor: &Viewer) -> Result<Comment> {
        let comment = comment_repo::find_comment_on_post(&self.pool, post_id, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        check_comment_modify(&comment, actor)?;
        Ok(comment)
    }
}
