use crate::models::{Post, PostDetail};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Posts joined with author, category, location and comment count.
const POST_DETAIL_SELECT: &str = r#"
    SELECT p.id, p.title, p.text, p.pub_date, p.author_id, u.username AS author_username,
           p.category_id, c.title AS category_title, c.slug AS category_slug,
           c.is_published AS category_is_published,
           p.location_id, l.name AS location_name, l.is_published AS location_is_published,
           p.image, p.is_published,
           (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count,
           p.created_at, p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
"#;

/// SQL form of `policy::is_publicly_visible`; `$1` is the current time.
/// A post without a category has a NULL `c.is_published` and is excluded.
const PUBLICLY_VISIBLE: &str =
    "p.is_published AND c.is_published IS TRUE AND p.pub_date <= $1";

const POST_COLUMNS: &str = "id, title, text, pub_date, author_id, location_id, category_id, \
                            image, is_published, created_at, updated_at";

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    /// Index page
    Published,
    /// Category page
    PublishedInCategory(Uuid),
    /// Someone else's profile
    PublishedByAuthor(Uuid),
    /// Own profile, drafts and scheduled posts included
    AllByAuthor(Uuid),
}

impl PostScope {
    fn where_clause(&self) -> String {
        match self {
            PostScope::Published => PUBLICLY_VISIBLE.to_string(),
            PostScope::PublishedInCategory(_) => format!("{PUBLICLY_VISIBLE} AND p.category_id = $2"),
            PostScope::PublishedByAuthor(_) => format!("{PUBLICLY_VISIBLE} AND p.author_id = $2"),
            PostScope::AllByAuthor(_) => "p.author_id = $1".to_string(),
        }
    }
}

/// Fields written on insert and update.
#[derive(Debug, Clone)]
pub struct PostFields {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
}

pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    fields: &PostFields,
) -> Result<Post, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO posts (title, text, pub_date, author_id, location_id, category_id, is_published)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {POST_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(&fields.title)
        .bind(&fields.text)
        .bind(fields.pub_date)
        .bind(author_id)
        .bind(fields.location_id)
        .bind(fields.category_id)
        .bind(fields.is_published)
        .fetch_one(pool)
        .await
}

pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");

    sqlx::query_as::<_, Post>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_post_detail(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostDetail>, sqlx::Error> {
    let sql = format!("{POST_DETAIL_SELECT} WHERE p.id = $1");

    sqlx::query_as::<_, PostDetail>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// One page of posts in `scope`, newest `pub_date` first.
pub async fn list_posts(
    pool: &PgPool,
    scope: PostScope,
    now: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let sql = format!(
        "{POST_DETAIL_SELECT} WHERE {} ORDER BY p.pub_date DESC, p.id DESC LIMIT {} OFFSET {}",
        scope.where_clause(),
        limit.max(0),
        offset.max(0)
    );

    let query = sqlx::query_as::<_, PostDetail>(&sql);
    let query = match scope {
        PostScope::Published => query.bind(now),
        PostScope::PublishedInCategory(id) | PostScope::PublishedByAuthor(id) => {
            query.bind(now).bind(id)
        }
        PostScope::AllByAuthor(author_id) => query.bind(author_id),
    };

    query.fetch_all(pool).await
}

pub async fn count_posts(
    pool: &PgPool,
    scope: PostScope,
    now: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let sql = format!(
        "SELECT COUNT(*) AS count FROM posts p \
         LEFT JOIN categories c ON c.id = p.category_id WHERE {}",
        scope.where_clause()
    );

    let query = sqlx::query(&sql);
    let query = match scope {
        PostScope::Published => query.bind(now),
        PostScope::PublishedInCategory(id) | PostScope::PublishedByAuthor(id) => {
            query.bind(now).bind(id)
        }
        PostScope::AllByAuthor(author_id) => query.bind(author_id),
    };

    let row = query.fetch_one(pool).await?;
    Ok(row.get::<i64, _>("count"))
}

/// Overwrite the editable fields of a post.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    fields: &PostFields,
) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE posts
        SET title = $1, text = $2, pub_date = $3, location_id = $4, category_id = $5,
            is_published = $6, updated_at = NOW()
        WHERE id = $7
        RETURNING {POST_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Post>(&sql)
        .bind(&fields.title)
        .bind(&fields.text)
        .bind(fields.pub_date)
        .bind(fields.location_id)
        .bind(fields.category_id)
        .bind(fields.is_published)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Store a new image key. `Ok(None)` when the post no longer exists,
/// otherwise `Ok(Some(previous_key))`.
pub async fn set_post_image(
    pool: &PgPool,
    post_id: Uuid,
    image: &str,
) -> Result<Option<Option<String>>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT image FROM posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(previous) = previous else {
        return Ok(None);
    };

    let result = sqlx::query("UPDATE posts SET image = $1, updated_at = NOW() WHERE id = $2")
        .bind(image)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    tx.commit().await?;
    Ok(Some(previous))
}

/// Delete a post; its comments go with it.
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
