use crate::models::Location;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_published(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
    sqlx::query_as::<_, Location>(
        r#"
        SELECT id, name, is_published, created_at
        FROM locations
        WHERE is_published
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn exists(pool: &PgPool, location_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1)")
        .bind(location_id)
        .fetch_one(pool)
        .await
}

pub async fn insert_if_missing(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO locations (name, is_published) VALUES ($1, TRUE) ON CONFLICT (name) DO NOTHING",
    )
    .bind(name)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
