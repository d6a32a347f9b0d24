//! Registration, login and session endpoints

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use super::{error_reply, AppState};
use crate::auth::token::extract_bearer_token;
use crate::auth::user::UserRole;
use crate::error::ShineStoreError;

/// Body of `POST /api/v1/register`. Missing fields read as empty and fail validation.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /api/v1/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// Verified identity of the caller
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn register_handler(
    state: Arc<AppState>,
    request: RegisterRequest,
) -> Result<Response, Rejection> {
    match state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await
    {
        Ok(_) => {
            let body = RegisterResponse {
                success: true,
                message: "User registered successfully!".to_string(),
            };
            Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::CREATED).into_response())
        }
        Err(e) => Ok(error_reply(&e)),
    }
}

pub async fn login_handler(
    state: Arc<AppState>,
    remote: Option<SocketAddr>,
    request: LoginRequest,
) -> Result<Response, Rejection> {
    let ip = remote.map(|addr| addr.ip());
    match state
        .auth
        .login_from(&request.email, &request.password, ip)
        .await
    {
        Ok(outcome) => {
            let body = LoginResponse {
                success: true,
                message: "Login successful".to_string(),
                token: outcome.token,
            };
            Ok(warp::reply::json(&body).into_response())
        }
        Err(e) => Ok(error_reply(&e)),
    }
}

/// `GET /api/v1/me`: echo the claims of a valid bearer token
pub async fn me_handler(
    state: Arc<AppState>,
    authorization: Option<String>,
    remote: Option<SocketAddr>,
) -> Result<Response, Rejection> {
    let token = match authorization.as_deref().and_then(extract_bearer_token) {
        Some(token) => token,
        None => {
            return Ok(error_reply(&ShineStoreError::TokenInvalid(
                "Missing bearer token".to_string(),
            )))
        }
    };

    match state.auth.authenticate(&token, remote.map(|addr| addr.ip())).await {
        Ok(claims) => {
            let body = SessionResponse {
                success: true,
                expires_at: chrono::DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
                email: claims.email,
                name: claims.name,
                role: claims.role,
            };
            Ok(warp::reply::json(&body).into_response())
        }
        Err(e) => Ok(error_reply(&e)),
    }
}
