//! Registration and session endpoints.
//!
//! 1. POST /auth/register — create a user
//! 2. POST /auth/login — verify credentials, set the session cookie, return the token
//! 3. POST /auth/logout — clear the session cookie
//! 4. GET /auth/me — the signed-in user

use actix_web::{HttpResponse, get, post, web};
use tracing::{info, warn};

use crate::auth::{
    SessionAuth, clear_session_cookie, create_session_token, hash_password, session_cookie,
    verify_password,
};
use crate::config::Config;
use crate::db::DbPool;
use crate::db::users::NewUser;
use crate::error::{AppError, AppResult};
use crate::models::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse, Role,
    UserResponse,
};
use crate::services::EntityResolver;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(get_current_user);
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Invalid registration", body = crate::error::ErrorResponse),
    )
)]
#[post("/auth/register")]
pub async fn register(
    pool: web::Data<DbPool>,
    resolver: web::Data<EntityResolver>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let name = non_empty(req.name.as_deref());
    let email = non_empty(req.email.as_deref());
    let password = req.password.as_deref().filter(|p| !p.is_empty());
    let role = non_empty(req.role.as_deref());
    let area = non_empty(req.area.as_deref());

    let (Some(name), Some(email), Some(password), Some(role)) = (name, email, password, role) else {
        return Err(required_fields_error());
    };
    if Role::parse(role) == Some(Role::User) && area.is_none() {
        return Err(required_fields_error());
    }

    if !is_valid_email(email) {
        return Err(AppError::InvalidInput("Invalid email format".to_string()));
    }

    let role = Role::parse(role).ok_or_else(|| {
        AppError::InvalidInput("Invalid role. Allowed roles: admin, user".to_string())
    })?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    let area_id = match (role, area) {
        (Role::User, Some(area)) => {
            let found = resolver.find_area(area).await?.ok_or_else(|| {
                AppError::InvalidInput("Invalid area. Please select a valid area.".to_string())
            })?;
            Some(found.id)
        }
        _ => None,
    };

    if pool.find_user_by_email(email).await?.is_some() {
        return Err(AppError::InvalidInput("Email already registered".to_string()));
    }

    let password_hash = hash_password(password)?;
    let user = pool
        .insert_user(NewUser {
            name,
            email,
            password_hash: &password_hash,
            role,
            area_id,
        })
        .await?;

    info!(user_id = %user.id, role = role.as_str(), "User registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user_id: user.id,
    }))
}

/// Sign in with email and password.
///
/// Sets the `inv_session` cookie and also returns the token for API clients.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
    )
)]
#[post("/auth/login")]
pub async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let (Some(email), Some(password)) = (
        non_empty(body.email.as_deref()),
        body.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    };

    let user = match pool.find_user_by_email(email).await? {
        Some(user) if verify_password(password, &user.password_hash) => user,
        _ => {
            warn!("Login failed for {}", email.to_lowercase());
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }
    };

    let token = create_session_token(&user, &config.session)?;
    let cookie = session_cookie(
        token.clone(),
        config.session.ttl_secs,
        config.environment.is_production(),
    );

    info!(user_id = %user.id, "User signed in");

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(user),
    }))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse)
    )
)]
#[post("/auth/logout")]
pub async fn logout(config: web::Data<Config>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(clear_session_cookie(config.environment.is_production()))
        .json(MessageResponse::new("Logged out"))
}

/// Get the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
#[get("/auth/me")]
pub async fn get_current_user(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let user = pool.session_user(auth.user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

fn required_fields_error() -> AppError {
    AppError::InvalidInput(
        "Name, email, password, role, and area (for users) are required".to_string(),
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `local@domain.tld` with no whitespace and a single `@`.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
