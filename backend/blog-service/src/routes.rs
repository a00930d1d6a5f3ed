//! Route configuration
//!
//! Everything under `/api/v1` passes through the optional-auth middleware;
//! handlers decide whether a login is required by taking `UserId`.

use crate::handlers;
use crate::metrics::serve_metrics;
use crate::middleware::{MetricsMiddleware, OptionalAuthMiddleware};
use crate::security::JwtKeys;
use actix_web::web;
use std::sync::Arc;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig, keys: Arc<JwtKeys>) {
    cfg.route("/metrics", web::get().to(serve_metrics)).service(
        web::scope("/api/v1")
            .wrap(OptionalAuthMiddleware::new(keys))
            .wrap(MetricsMiddleware)
            .route("/health", web::get().to(handlers::health_summary))
            .route("/health/ready", web::get().to(handlers::readiness_check))
            .route("/health/live", web::get().to(handlers::liveness_check))
            .configure(configure_posts)
            .configure(configure_catalog)
            .configure(configure_users),
    );
}

fn configure_posts(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .service(
                web::resource("")
                    .route(web::get().to(handlers::list_posts))
                    .route(web::post().to(handlers::create_post)),
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(handlers::get_post))
                    .route(web::patch().to(handlers::update_post))
                    .route(web::delete().to(handlers::delete_post)),
            )
            .route(
                "/{post_id}/image",
                web::post().to(handlers::upload_post_image),
            )
            .service(
                web::resource("/{post_id}/comments")
                    .route(web::get().to(handlers::list_comments))
                    .route(web::post().to(handlers::create_comment)),
            )
            .service(
                web::resource("/{post_id}/comments/{comment_id}")
                    .route(web::patch().to(handlers::update_comment))
                    .route(web::delete().to(handlers::delete_comment)),
            ),
    );
}

fn configure_catalog(cfg: &mut web::ServiceConfig) {
    cfg.route("/categories", web::get().to(handlers::list_categories))
        .route("/categories/{slug}", web::get().to(handlers::get_category))
        .route("/locations", web::get().to(handlers::list_locations));
}

fn configure_users(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile/{username}", web::get().to(handlers::get_profile))
        .service(
            web::scope("/auth")
                .route("/registration", web::post().to(handlers::register))
                .route("/login", web::post().to(handlers::login))
                .route("/profile", web::patch().to(handlers::update_profile)),
        );
}
