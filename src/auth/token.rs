use axum::headers::authorization::Credentials;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::UserId;
use crate::error::AppResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: i64,
    pub user_id: UserId,
}

/// The `Authorization: Token <jwt>` credential carried by signed-in viewers.
#[derive(Debug)]
pub struct AuthToken(pub String);

impl Credentials for AuthToken {
    const SCHEME: &'static str = "Token";

    fn decode(value: &axum::http::HeaderValue) -> Option<Self> {
        let mut it = value.to_str().ok()?.split_whitespace();
        let scheme = it.next()?;
        let token = it.next()?;

        if scheme != Self::SCHEME || it.next().is_some() {
            None?
        }

        Some(Self(token.to_string()))
    }

    fn encode(&self) -> axum::http::HeaderValue {
        unreachable!()
    }
}

/// Signs a 30-day token for `user_id`. Token issuance belongs to the
/// external identity service; this helper exists for it and for tests.
pub fn issue_token(user_id: UserId, key: &EncodingKey) -> AppResult<String> {
    let exp = (Utc::now() + Duration::days(30)).timestamp();
    let claims = Claims { exp, user_id };
    let token = jsonwebtoken::encode(&Header::default(), &claims, key)?;
    Ok(token)
}

pub fn verify_token(token: &str, key: &DecodingKey) -> Result<UserId, jsonwebtoken::errors::Error> {
    let data =
        jsonwebtoken::decode::<Claims>(token, key, &Validation::new(Algorithm::HS256))?;
    Ok(data.claims.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_back_to_the_user() {
        let encoding = EncodingKey::from_secret(b"test secret");
        let decoding = DecodingKey::from_secret(b"test secret");

        let token = issue_token(42, &encoding).unwrap();
        assert_eq!(verify_token(&token, &decoding).unwrap(), 42);
    }

    #[test]
    fn tokens_signed_with_another_secret_fail() {
        let encoding = EncodingKey::from_secret(b"one secret");
        let decoding = DecodingKey::from_secret(b"another secret");

        let token = issue_token(42, &encoding).unwrap();
        assert!(verify_token(&token, &decoding).is_err());
    }

    #[test]
    fn header_credential_requires_the_token_scheme() {
        use axum::http::HeaderValue;

        let ok = AuthToken::decode(&HeaderValue::from_static("Token abc.def.ghi"));
        assert_eq!(ok.map(|t| t.0), Some("abc.def.ghi".to_string()));

        assert!(AuthToken::decode(&HeaderValue::from_static("Bearer abc")).is_none());
        assert!(AuthToken::decode(&HeaderValue::from_static("Token a b")).is_none());
    }
}
