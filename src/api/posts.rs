use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    auth::RequireViewer,
    db::{BlogStore, GroupId, NewPost, PostId, StoreError},
    error::{AppError, AppResult},
    feed,
};

use super::PageQuery;

#[derive(Debug, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "text can't be blank"))]
    text: String,
    #[serde(default)]
    group: Option<GroupId>,
    #[serde(default)]
    image: Option<String>,
}

impl PostForm {
    fn into_new_post(self) -> NewPost {
        NewPost {
            text: self.text,
            group_id: self.group,
            image: self.image,
        }
    }
}

/// A group id that points nowhere is a form error, not a server fault.
async fn ensure_group_exists(store: &dyn BlogStore, group: Option<GroupId>) -> AppResult<()> {
    let Some(id) = group else {
        return Ok(());
    };
    match store.group_by_id(id).await {
        Ok(_) => Ok(()),
        Err(StoreError::NotFound) => {
            let mut field_error = ValidationError::new("exists");
            field_error.message = Some("group does not exist".into());
            let mut errors = ValidationErrors::new();
            errors.add("group", field_error);
            Err(AppError::Validation(errors))
        }
        Err(other) => Err(other.into()),
    }
}

// GET /
pub async fn index(
    State(store): State<Arc<dyn BlogStore>>,
    Query(params): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let page = feed::index(store.as_ref(), params.page()).await?;
    Ok(Json(json!({ "page": page })))
}

// GET /posts/:id/
pub async fn post_detail(
    State(store): State<Arc<dyn BlogStore>>,
    Path(id): Path<PostId>,
) -> AppResult<impl IntoResponse> {
    let post = store.post(id).await?;
    let comments = store.comments_for_post(id).await?;
    Ok(Json(json!({
        "post": post,
        "comments": comments,
        "form": { "text": "" },
    })))
}

// GET /create/
pub async fn create_post_form(RequireViewer(_viewer): RequireViewer) -> impl IntoResponse {
    Json(json!({
        "form": { "text": "", "group": null, "image": null },
    }))
}

// POST /create/
pub async fn create_post(
    State(store): State<Arc<dyn BlogStore>>,
    RequireViewer(viewer): RequireViewer,
    Json(form): Json<PostForm>,
) -> AppResult<impl IntoResponse> {
    form.validate()?;
    ensure_group_exists(store.as_ref(), form.group).await?;

    let post = store.create_post(viewer, form.into_new_post()).await?;
    Ok(Redirect::to(&format!("/profile/{}/", post.author)))
}

// GET /posts/:id/edit/
pub async fn edit_post_form(
    State(store): State<Arc<dyn BlogStore>>,
    RequireViewer(viewer): RequireViewer,
    Path(id): Path<PostId>,
) -> AppResult<Response> {
    let post = store.post(id).await?;
    if post.author_id != viewer {
        return Ok(Redirect::to(&format!("/posts/{id}/")).into_response());
    }

    Ok(Json(json!({
        "form": { "text": post.text, "group": post.group_id, "image": post.image },
        "is_edit": true,
    }))
    .into_response())
}

// POST /posts/:id/edit/
pub async fn edit_post(
    State(store): State<Arc<dyn BlogStore>>,
    RequireViewer(viewer): RequireViewer,
    Path(id): Path<PostId>,
    Json(form): Json<PostForm>,
) -> AppResult<Response> {
    let post = store.post(id).await?;
    // non-authors bounce to the read view, before any validation runs
    if post.author_id != viewer {
        return Ok(Redirect::to(&format!("/posts/{id}/")).into_response());
    }

    form.validate()?;
    ensure_group_exists(store.as_ref(), form.group).await?;

    store.update_post(id, form.into_new_post()).await?;
    Ok(Redirect::to(&format!("/posts/{id}/")).into_response())
}
