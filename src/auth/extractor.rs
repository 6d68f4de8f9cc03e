//! Actix-web extractor for session authentication.
//!
//! The token is read from the session cookie first, then from an
//! `Authorization: Bearer` header. Token values are never logged.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use std::future::{Ready, ready};
use uuid::Uuid;

use super::verify_session_token;
use crate::config::{Config, SESSION_COOKIE};
use crate::error::ErrorResponse;
use crate::models::SessionClaims;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a valid session.
///
/// ```ignore
/// async fn protected_handler(auth: SessionAuth) -> impl Responder {
///     // auth.user_id is the id of the signed-in user
/// }
/// ```
///
/// Only the token is checked here; handlers that need the user row look it
/// up themselves so a deleted user surfaces as 404.
#[derive(Debug)]
pub struct SessionAuth {
    pub user_id: Uuid,
    pub claims: SessionClaims,
}

fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

impl FromRequest for SessionAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let config = match req.app_data::<web::Data<Config>>() {
            Some(config) => config,
            None => return ready(Err(AuthError::new("Internal configuration error"))),
        };

        let token = match extract_token(req) {
            Some(token) => token,
            None => return ready(Err(AuthError::new("Not authenticated"))),
        };

        let claims = match verify_session_token(&token, &config.session.secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                return ready(Err(AuthError::new("Invalid or expired session")));
            }
        };

        match Uuid::parse_str(&claims.user_id) {
            Ok(user_id) => ready(Ok(SessionAuth { user_id, claims })),
            Err(_) => ready(Err(AuthError::new("Invalid or expired session"))),
        }
    }
}
