use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{db::BlogStore, error::AppResult, feed};

use super::PageQuery;

// GET /group/:slug/
pub async fn group_posts(
    State(store): State<Arc<dyn BlogStore>>,
    Path(slug): Path<String>,
    Query(params): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let feed = feed::group_posts(store.as_ref(), &slug, params.page()).await?;
    Ok(Json(json!({
        "group": feed.group,
        "page": feed.page,
    })))
}
