// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, quiz::Presentation};

/// Audience of dashboard tokens.
pub const ADMIN_AUDIENCE: &str = "enrollment-admin";

/// Audience of quiz session tokens.
pub const QUIZ_AUDIENCE: &str = "enrollment-quiz";

/// JWT Claims structure for the admin dashboard.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the admin username.
    pub sub: String,
    /// Role, always 'admin' for now.
    pub role: String,
    pub aud: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Claims of a quiz session token.
///
/// The layout is signed, so a submission can only be scored against a quiz
/// this server actually handed out.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuizClaims {
    pub aud: String,
    /// Issued at, Unix timestamp.
    pub iat: usize,
    pub exp: usize,
    pub layout: Presentation,
}

fn now_secs() -> Result<usize, AppError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize)
}

fn validation_for(audience: &str, leeway: u64) -> Validation {
    let mut validation = Validation::default();
    validation.set_audience(&[audience]);
    validation.leeway = leeway;
    validation
}

/// Signs a new admin JWT valid for `expiration_seconds`.
pub fn sign_jwt(
    username: &str,
    role: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: username.to_owned(),
        role: role.to_owned(),
        aud: ADMIN_AUDIENCE.to_owned(),
        exp: now_secs()? + expiration_seconds as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes an admin JWT.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation_for(ADMIN_AUDIENCE, 60),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Signs the layout of a freshly generated quiz.
pub fn sign_quiz_token(
    layout: &Presentation,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let iat = now_secs()?;
    let claims = QuizClaims {
        aud: QUIZ_AUDIENCE.to_owned(),
        iat,
        exp: iat + expiration_seconds as usize,
        layout: layout.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies a quiz token. The grace period is already part of `exp`, so no
/// extra leeway is granted here.
pub fn verify_quiz_token(token: &str, secret: &str) -> Result<QuizClaims, AppError> {
    decode::<QuizClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation_for(QUIZ_AUDIENCE, 0),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::BadRequest("Quiz session expired".to_string()),
        _ => AppError::BadRequest("Invalid quiz token".to_string()),
    })
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header.
/// If valid, injects `Claims` into the request extensions for handlers to use.
/// If invalid, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match verify_jwt(token, &config.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Axum Middleware: Admin Authorization.
///
/// Must be used AFTER `auth_middleware`. Checks if the injected `Claims` has 'admin' role.
/// If not, returns 403 Forbidden.
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if claims.role != "admin" {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}
