//! Viewer identification. Guards run as extractors ahead of the handler and
//! hand it an explicit current-user value; login itself lives in the
//! external identity service.

pub mod token;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    headers::Authorization,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    TypedHeader,
};
use jsonwebtoken::DecodingKey;

use crate::db::UserId;
use token::{verify_token, AuthToken};

/// The optional viewer: `None` when the request carries no usable token.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<UserId>);

/// The required viewer. Rejects anonymous requests with a redirect to the
/// login page, carrying the original path as the return target.
#[derive(Debug, Clone, Copy)]
pub struct RequireViewer(pub UserId);

pub struct LoginRedirect {
    next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&format!("/auth/login/?next={}", self.next)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
    DecodingKey: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let key = DecodingKey::from_ref(state);
        let viewer = TypedHeader::<Authorization<AuthToken>>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|TypedHeader(Authorization(token))| verify_token(&token.0, &key).ok());
        Ok(Viewer(viewer))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireViewer
where
    S: Send + Sync,
    DecodingKey: FromRef<S>,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Viewer(viewer) = Viewer::from_request_parts(parts, state)
            .await
            .unwrap_or(Viewer(None));

        match viewer {
            Some(user_id) => Ok(RequireViewer(user_id)),
            None => Err(LoginRedirect {
                next: parts.uri.path().to_owned(),
            }),
        }
    }
}
