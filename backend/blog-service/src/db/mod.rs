/// Database access layer: free functions over a `PgPool`, one module per table.
pub mod category_repo;
pub mod comment_repo;
pub mod location_repo;
pub mod post_repo;
pub mod user_repo;
