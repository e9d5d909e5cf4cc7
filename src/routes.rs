use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    BoxError, Json, Router,
};
use serde_json::json;
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{api, AppState};

pub fn generate_routes(state: AppState) -> Router {
    Router::new()
        // ==== FEEDS ==== //
        .route("/", get(api::posts::index))
        .route("/group/:slug/", get(api::groups::group_posts))
        .route("/follow/", get(api::profiles::follow_index))
        // ==== POSTS ==== //
        .route("/posts/:id/", get(api::posts::post_detail))
        .route(
            "/create/",
            get(api::posts::create_post_form).post(api::posts::create_post),
        )
        .route(
            "/posts/:id/edit/",
            get(api::posts::edit_post_form).post(api::posts::edit_post),
        )
        .route("/posts/:id/comment/", post(api::comments::add_comment))
        // ==== PROFILES ==== //
        .route("/profile/:username/", get(api::profiles::profile))
        .route(
            "/profile/:username/follow/",
            post(api::profiles::profile_follow),
        )
        .route(
            "/profile/:username/unfollow/",
            post(api::profiles::profile_unfollow),
        )
        .fallback(handler_404)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Unhandled error: {}", err),
                    )
                }))
                .layer(BufferLayer::new(1024))
                .layer(RateLimitLayer::new(64, Duration::from_secs(1))),
        )
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}
