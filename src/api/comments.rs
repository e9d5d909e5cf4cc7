use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;

use crate::{
    auth::RequireViewer,
    db::{BlogStore, PostId},
    error::AppResult,
};

/// Unlike posts, a comment may be empty.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    text: String,
}

// POST /posts/:id/comment/
pub async fn add_comment(
    State(store): State<Arc<dyn BlogStore>>,
    RequireViewer(viewer): RequireViewer,
    Path(id): Path<PostId>,
    Json(form): Json<CommentForm>,
) -> AppResult<impl IntoResponse> {
    store.create_comment(id, viewer, form.text).await?;
    Ok(Redirect::to(&format!("/posts/{id}/")))
}
