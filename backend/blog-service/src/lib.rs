/// Blog Service Library
///
/// A blogging backend: posts with categories, locations and images,
/// comments, public profiles, and the visibility and ownership policy that
/// decides who sees and who edits what.
///
/// # Modules
///
/// - `policy`: Pure visibility and ownership rules
/// - `handlers`: HTTP request handlers
/// - `services`: Business logic layer
/// - `db`: Database access layer
/// - `middleware`: Optional authentication, request metrics, policy guards
/// - `models`: Row types and pagination
/// - `security`: JWT and password hashing
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
