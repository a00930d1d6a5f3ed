use crate::models::Category;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_published(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, title, description, slug, is_published, created_at
        FROM categories
        WHERE is_published
        ORDER BY title ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Published category by slug; unpublished ones are reported as missing.
pub async fn find_published_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, title, description, slug, is_published, created_at
        FROM categories
        WHERE slug = $1 AND is_published
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, category_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(category_id)
        .fetch_one(pool)
        .await
}

/// Insert a published category unless the slug is taken. Returns whether a
/// row was created.
pub async fn insert_if_missing(
    pool: &PgPool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO categories (title, slug, description, is_published)
        VALUES ($1, $2, $3, TRUE)
        ON CONFLICT (slug) DO NOTHING
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
