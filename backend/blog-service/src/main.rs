use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use blog_service::security::JwtKeys;
use blog_service::services::{CatalogService, MediaStore};
use blog_service::{routes, Config, MIGRATOR};
use db_pool::{create_pool as create_pg_pool, DbConfig as DbPoolConfig};
use sqlx::PgPool;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "blog-service";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Container healthcheck: probe the local health endpoint.
async fn run_healthcheck() -> io::Result<()> {
    let port = std::env::var("BLOG_SERVICE_PORT").unwrap_or_else(|_| "8080".to_string());
    let url = format!("http://127.0.0.1:{}/api/v1/health", port);

    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

async fn connect_database(config: &Config) -> io::Result<PgPool> {
    let mut db_cfg = DbPoolConfig::from_env(SERVICE_NAME).unwrap_or_else(|_| DbPoolConfig {
        service_name: SERVICE_NAME.to_string(),
        database_url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..DbPoolConfig::default()
    });
    if db_cfg.database_url.is_empty() {
        db_cfg.database_url = config.database.url.clone();
    }

    db_cfg.log_config();
    let pool = create_pg_pool(db_cfg).await.map_err(|e| {
        tracing::error!("Database pool creation failed: {:#}", e);
        io::Error::new(io::ErrorKind::Other, format!("Failed to create database pool: {e}"))
    })?;

    MIGRATOR.run(&pool).await.map_err(|e| {
        tracing::error!("Database migration failed: {:#}", e);
        io::Error::new(io::ErrorKind::Other, format!("Failed to run migrations: {e}"))
    })?;

    tracing::info!("Connected to database via db-pool crate");
    Ok(pool)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable, waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Blog Service
///
/// # Commands
///
/// - (none): run the HTTP server
/// - `healthcheck`: exit 0 when the local server reports healthy
/// - `seed-defaults`: create the default categories and locations
#[actix_web::main]
async fn main() -> io::Result<()> {
    let command = std::env::args().nth(1);

    if command.as_deref() == Some("healthcheck") {
        return run_healthcheck().await;
    }

    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = connect_database(&config).await?;

    match command.as_deref() {
        None => {}
        Some("seed-defaults") => {
            let report = CatalogService::new(db_pool.clone())
                .seed_defaults()
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            println!(
                "Categories added: {}, locations added: {}",
                report.categories_created, report.locations_created
            );
            db_pool.close().await;
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown command: {other}. Expected healthcheck or seed-defaults");
            std::process::exit(2);
        }
    }

    let keys = match JwtKeys::from_config(&config.auth) {
        Ok(keys) => Arc::new(keys),
        Err(e) => {
            tracing::error!("JWT key loading failed: {:#}", e);
            eprintln!("ERROR: Failed to initialize JWT keys: {}", e);
            std::process::exit(1);
        }
    };

    let keys_data = web::Data::from(keys.clone());
    let media_data = web::Data::new(MediaStore::new(&config.media));
    let pagination_data = web::Data::new(config.pagination.clone());
    let pool_data = web::Data::new(db_pool.clone());
    let allowed_origins = config.cors.allowed_origins.clone();

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let keys = keys.clone();
        App::new()
            .app_data(pool_data.clone())
            .app_data(keys_data.clone())
            .app_data(media_data.clone())
            .app_data(pagination_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(move |cfg| routes::configure_routes(cfg, keys))
    })
    .bind(&http_bind_address)?
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let result = tokio::select! {
        joined = &mut server_task => match joined {
            Ok(result) => result,
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        },
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            let _ = server_task.await;
            Ok(())
        }
    };

    db_pool.close().await;
    tracing::info!("{} shut down", SERVICE_NAME);
    result
}
