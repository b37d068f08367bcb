pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod storage;

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    http::{Method, Uri},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::error::ApiError;
use crate::middleware::{rate_limit, require_admin, RateLimiter};

/// Build the full application router.
///
/// Liveness endpoints and static uploads sit outside the rate limiter; the
/// whole `/api` surface sits behind it, with a stricter second window on
/// login attempts.
pub fn app() -> Router {
    let cfg = config::config();

    let api_limiter = RateLimiter::new(
        cfg.api.rate_limit_requests,
        cfg.api.rate_limit_window_secs,
        "Too many requests from this IP, please try again later",
    );
    let login_limiter = RateLimiter::new(
        cfg.api.login_limit_requests,
        cfg.api.login_limit_window_secs,
        "Too many login attempts, please try again later",
    );

    let api = Router::new()
        .merge(admin_routes(login_limiter))
        .merge(project_routes())
        .merge(testimonial_routes())
        .merge(cv_routes())
        .merge(blog_routes())
        .merge(settings_routes())
        .merge(newsletter_routes())
        .merge(analytics_routes())
        .layer(axum_middleware::from_fn_with_state(api_limiter, rate_limit));

    Router::new()
        .route("/", get(handlers::health::index))
        .route("/api/health", get(handlers::health::health))
        .route("/api/test", get(handlers::health::test))
        .merge(api)
        .nest_service("/uploads", ServeDir::new(&cfg.uploads.root_dir))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(cfg.api.max_request_size_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn admin_routes(login_limiter: RateLimiter) -> Router {
    use handlers::admin;

    let protected = Router::new()
        .route("/api/admin/me", get(admin::me).put(admin::update_me))
        .route("/api/admin/password", put(admin::update_password))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route(
            "/api/admin/login",
            post(admin::login)
                .layer(axum_middleware::from_fn_with_state(login_limiter, rate_limit)),
        )
        .route("/api/admin/verify-token", post(admin::verify_token))
        .merge(protected)
}

fn project_routes() -> Router {
    use handlers::projects;

    let protected = Router::new()
        .route("/api/projects", post(projects::create))
        .route(
            "/api/projects/:id",
            put(projects::update).delete(projects::delete),
        )
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/api/projects", get(projects::list))
        .route("/api/projects/featured", get(projects::featured))
        .route("/api/projects/categories", get(projects::categories))
        .route(
            "/api/projects/category/:category",
            get(projects::by_category),
        )
        .route("/api/projects/:id", get(projects::get))
        .merge(protected)
}

fn testimonial_routes() -> Router {
    use handlers::testimonials;

    let protected = Router::new()
        .route("/api/testimonials", post(testimonials::create))
        .route(
            "/api/testimonials/:id",
            put(testimonials::update).delete(testimonials::delete),
        )
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/api/testimonials", get(testimonials::list))
        .route("/api/testimonials/featured", get(testimonials::featured))
        .route("/api/testimonials/:id", get(testimonials::get))
        .merge(protected)
}

fn cv_routes() -> Router {
    use handlers::cv;

    let protected = Router::new()
        .route("/api/cv", post(cv::create))
        .route("/api/cv/:id", put(cv::update).delete(cv::delete))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/api/cv", get(cv::list))
        .route("/api/cv/:id", get(cv::get))
        .merge(protected)
}

fn blog_routes() -> Router {
    use handlers::blogs;

    let protected = Router::new()
        .route("/api/blogs", post(blogs::create))
        .route("/api/blogs/:id", put(blogs::update).delete(blogs::delete))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/api/blogs", get(blogs::list))
        .route("/api/blogs/:id", get(blogs::get))
        .route("/api/blogs/:id/like", post(blogs::like))
        .merge(protected)
}

fn settings_routes() -> Router {
    use handlers::settings;

    let protected = Router::new()
        .route("/api/settings", put(settings::update_all))
        .route("/api/settings/:key", put(settings::update))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/api/settings", get(settings::get_all))
        .route("/api/settings/:key", get(settings::get))
        .merge(protected)
}

fn newsletter_routes() -> Router {
    use handlers::newsletter;

    let protected = Router::new()
        .route("/api/newsletter/subscribers", get(newsletter::subscribers))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .merge(protected)
}

fn analytics_routes() -> Router {
    use handlers::analytics;

    let protected = Router::new()
        .route("/api/analytics", get(analytics::stats))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/api/analytics/track", post(analytics::track))
        .merge(protected)
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!("Cannot {} {}", method, uri.path()))
}

/// Full startup sequence: env, logging, upload tree, database, listener.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Pin the uptime baseline before anything slow happens.
    once_cell::sync::Lazy::force(&handlers::health::STARTED_AT);

    let cfg = config::config();
    info!("starting atelier-api in {} mode", cfg.environment.as_str());

    storage::ensure_upload_dirs().await?;
    database::init_pool().await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);

    axum::serve(
        listener,
        app().into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
