pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod routes;

use std::sync::Arc;

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};

use db::BlogStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>, jwt_secret: &str) -> Self {
        Self {
            store,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}

impl FromRef<AppState> for Arc<dyn BlogStore> {
    fn from_ref(app_state: &AppState) -> Arc<dyn BlogStore> {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for EncodingKey {
    fn from_ref(app_state: &AppState) -> EncodingKey {
        app_state.encoding_key.clone()
    }
}

impl FromRef<AppState> for DecodingKey {
    fn from_ref(app_state: &AppState) -> DecodingKey {
        app_state.decoding_key.clone()
    }
}
