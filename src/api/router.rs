use axum::http::{header, Method};
use axum::routing::{delete, get, patch};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{blogs, users};
use crate::state::AppState;

/// Root endpoint; doubles as a liveness check.
async fn greeting() -> &'static str {
    "let's build great things!"
}

/// Build the complete route table.
///
/// Every route is registered exactly once, here. axum panics on duplicate
/// path/method registrations, so an ambiguous route fails at startup
/// instead of silently shadowing an earlier handler.
pub fn build_router(state: AppState) -> Router {
    // The browser clients send credentialed requests from arbitrary
    // origins, so the requesting origin is mirrored back rather than
    // using a wildcard (which credentials forbid).
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/", get(greeting))
        .route("/blogs", get(blogs::paginated).post(blogs::create))
        .route("/blogs/home", get(blogs::home_feed))
        .route("/blogs/manage", get(blogs::manage_listing))
        .route("/blogs/count", get(blogs::approved_count))
        .route("/blogs/popular", get(blogs::popular_feed))
        .route("/blogs/author/{email}", get(blogs::by_author))
        .route("/blog/{id}", get(blogs::get_by_id).delete(blogs::remove))
        .route("/blog/{id}/approve", patch(blogs::approve))
        .route("/blog/{id}/deny", patch(blogs::deny))
        .route("/users", get(users::list).put(users::upsert_profile))
        .route("/users/{email}", delete(users::remove))
        .route("/users/{email}/author", patch(users::promote_author))
        .route("/users/{email}/admin", patch(users::promote_admin))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
