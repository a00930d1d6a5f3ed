//! Prometheus metrics for the database connection pool
//!
//! Pool occupancy is sampled into a [`PoolSnapshot`] and exported as
//! gauges; connection acquisition is timed and failures are counted by
//! cause.

use prometheus::{
    register_gauge_vec, register_histogram_vec, register_int_counter_vec,
    register_int_gauge_vec, GaugeVec, HistogramVec, IntCounterVec, IntGaugeVec,
};
use sqlx::{pool::PoolConnection, PgPool, Postgres};
use std::time::Instant;

lazy_static::lazy_static! {
    /// Connections by state (idle/active/max)
    static ref DB_POOL_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_connections",
        "Database pool connection count by state",
        &["service", "state"]
    ).expect("Prometheus metrics registration should succeed at startup");

    /// Active connections over the configured maximum, 0.0..=1.0
    static ref DB_POOL_UTILIZATION: GaugeVec = register_gauge_vec!(
        "db_pool_utilization_ratio",
        "Share of the maximum pool size currently checked out",
        &["service"]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref DB_POOL_ACQUIRE_DURATION: HistogramVec = register_histogram_vec!(
        "db_pool_acquire_duration_seconds",
        "Time to acquire connection from pool",
        &["service"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref DB_POOL_ACQUIRE_ERRORS: IntCounterVec = register_int_counter_vec!(
        "db_pool_acquire_errors_total",
        "Connection acquisition errors by cause",
        &["service", "error_type"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Point-in-time occupancy of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Open connections, idle or checked out
    pub size: u32,
    pub idle: u32,
    /// Configured `max_connections`
    pub max: u32,
}

impl PoolSnapshot {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            size: pool.size(),
            idle: u32::try_from(pool.num_idle()).unwrap_or(u32::MAX),
            max: pool.options().get_max_connections(),
        }
    }

    pub fn active(&self) -> u32 {
        self.size.saturating_sub(self.idle)
    }

    pub fn utilization(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        (f64::from(self.active()) / f64::from(self.max)).min(1.0)
    }

    /// True when every allowed connection is checked out; the next
    /// `acquire` waits for a release or the acquire timeout.
    pub fn is_saturated(&self) -> bool {
        self.max > 0 && self.active() >= self.max
    }
}

/// Sample the pool and publish its gauges (called periodically)
pub(crate) fn update_pool_metrics(pool: &PgPool, service: &str) {
    record_snapshot(&PoolSnapshot::of(pool), service);
}

fn record_snapshot(snapshot: &PoolSnapshot, service: &str) {
    for (state, value) in [
        ("idle", snapshot.idle),
        ("active", snapshot.active()),
        ("max", snapshot.max),
    ] {
        DB_POOL_CONNECTIONS
            .with_label_values(&[service, state])
            .set(i64::from(value));
    }
    DB_POOL_UTILIZATION
        .with_label_values(&[service])
        .set(snapshot.utilization());
}

/// Label for an acquisition failure.
fn acquire_error_type(error: &sqlx::Error) -> &'static str {
    match error {
        sqlx::Error::PoolTimedOut => "timeout",
        sqlx::Error::PoolClosed => "closed",
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) => "network",
        sqlx::Error::Database(_) => "database",
        _ => "other",
    }
}

/// `pool.acquire()` that records latency and failures. Readiness probes go
/// through here so a struggling pool shows up in the histogram before
/// requests start failing.
pub async fn acquire_with_metrics(
    pool: &PgPool,
    service: &str,
) -> Result<PoolConnection<Postgres>, sqlx::Error> {
    let start = Instant::now();
    let result = pool.acquire().await;

    DB_POOL_ACQUIRE_DURATION
        .with_label_values(&[service])
        .observe(start.elapsed().as_secs_f64());

    if let Err(e) = &result {
        DB_POOL_ACQUIRE_ERRORS
            .with_label_values(&[service, acquire_error_type(e)])
            .inc();
    }

    result
}
