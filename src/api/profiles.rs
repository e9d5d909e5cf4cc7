use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use serde_json::json;

use crate::{
    auth::{RequireViewer, Viewer},
    db::BlogStore,
    error::AppResult,
    feed,
};

use super::PageQuery;

// GET /profile/:username/
pub async fn profile(
    State(store): State<Arc<dyn BlogStore>>,
    Viewer(viewer): Viewer,
    Path(username): Path<String>,
    Query(params): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let feed = feed::profile(store.as_ref(), &username, viewer, params.page()).await?;
    Ok(Json(json!({
        "author": feed.author,
        "following": feed.following,
        "page": feed.page,
    })))
}

// GET /follow/
pub async fn follow_index(
    State(store): State<Arc<dyn BlogStore>>,
    RequireViewer(viewer): RequireViewer,
    Query(params): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let page = feed::follow_index(store.as_ref(), viewer, params.page()).await?;
    Ok(Json(json!({ "page": page })))
}

// POST /profile/:username/follow/
pub async fn profile_follow(
    State(store): State<Arc<dyn BlogStore>>,
    RequireViewer(viewer): RequireViewer,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let author = store.user_by_username(&username).await?;
    store.follow(viewer, author.id).await?;
    Ok(Redirect::to("/follow/"))
}

// POST /profile/:username/unfollow/
pub async fn profile_unfollow(
    State(store): State<Arc<dyn BlogStore>>,
    RequireViewer(viewer): RequireViewer,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let author = store.user_by_username(&username).await?;
    store.unfollow(viewer, author.id).await?;
    Ok(Redirect::to("/follow/"))
}
