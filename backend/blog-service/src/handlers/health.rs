/// Liveness and readiness probes
use actix_web::{web, HttpResponse};
use chrono::Utc;
use db_pool::PoolSnapshot;
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

const SERVICE_NAME: &str = "blog-service";

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    latency_ms: u64,
}

#[derive(Serialize)]
struct PoolStats {
    size: u32,
    idle: u32,
    active: u32,
    max: u32,
    saturated: bool,
}

impl From<PoolSnapshot> for PoolStats {
    fn from(snapshot: PoolSnapshot) -> Self {
        Self {
            size: snapshot.size,
            idle: snapshot.idle,
            active: snapshot.active(),
            max: snapshot.max,
            saturated: snapshot.is_saturated(),
        }
    }
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    postgresql: ComponentCheck,
    pool: PoolStats,
    timestamp: String,
}

const POSTGRES_DOWN: &str = "PostgreSQL connection failed";

async fn ping_postgres(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut conn = db_pool::acquire_with_metrics(pool, SERVICE_NAME).await?;
    sqlx::query("SELECT 1").execute(&mut *conn).await.map(|_| ())
}

/// Driver errors are logged here and never echoed to the caller.
async fn check_postgres(pool: &PgPool) -> Result<(), sqlx::Error> {
    let result = ping_postgres(pool).await;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "PostgreSQL health check failed");
    }
    result
}

/// GET /api/v1/health
pub async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match check_postgres(&pool).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": POSTGRES_DOWN,
            "service": SERVICE_NAME
        })),
    }
}

/// GET /api/v1/health/ready
pub async fn readiness_check(pool: web::Data<PgPool>) -> HttpResponse {
    let start = Instant::now();
    let result = check_postgres(&pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let postgresql = match &result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms,
        },
        Err(_) => ComponentCheck {
            status: ComponentStatus::Unhealthy,
            message: POSTGRES_DOWN.to_string(),
            latency_ms,
        },
    };

    let response = ReadinessResponse {
        ready: result.is_ok(),
        postgresql,
        pool: PoolSnapshot::of(&pool).into(),
        timestamp: Utc::now().to_rfc3339(),
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// GET /api/v1/health/live
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
