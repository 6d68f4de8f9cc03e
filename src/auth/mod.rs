//! Authentication: password hashing and session tokens.
//!
//! Sessions are stateless HS256 JWTs carried either in the `inv_session`
//! HttpOnly cookie or an `Authorization: Bearer` header.

mod extractor;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use crate::config::{SESSION_COOKIE, SessionSettings};
use crate::error::{AppError, AppResult};
use crate::models::{SessionClaims, User};

pub use extractor::{AuthError, SessionAuth};

/// Session JWT issuer.
pub const SESSION_ISSUER: &str = "parts-inventory";

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InvalidInput(format!("Failed to hash password: {}", e)))
}

/// Verify a password against its stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

/// Create a session JWT for a user.
pub fn create_session_token(user: &User, settings: &SessionSettings) -> AppResult<String> {
    let now = chrono::Utc::now();
    let exp = now + chrono::Duration::seconds(settings.ttl_secs as i64);

    let claims = SessionClaims {
        sub: user.id.to_string(),
        iss: SESSION_ISSUER.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
        user_id: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
    };

    let key = EncodingKey::from_secret(settings.secret.expose_secret().as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::InvalidInput(format!("Failed to create session token: {}", e)))
}

/// Verify a session JWT and return its claims.
pub fn verify_session_token(token: &str, secret: &SecretString) -> Result<SessionClaims, String> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_aud = false;

    let token_data = decode::<SessionClaims>(token, &key, &validation)
        .map_err(|e| format!("Invalid session token: {}", e))?;

    Ok(token_data.claims)
}

/// Session cookie carrying `token`.
pub fn session_cookie(token: String, ttl_secs: u64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.set_max_age(CookieDuration::seconds(ttl_secs as i64));
    cookie
}

/// Expired session cookie that clears the browser's copy.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.set_max_age(CookieDuration::ZERO);
    cookie
}
