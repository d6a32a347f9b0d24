//! Request handlers for the HTTP API
//!
//! Every failure leaves through [`error_reply`], which turns a
//! `ShineStoreError` into `{success: false, kind, message}` with the
//! matching status code. Internal detail is logged, never returned.

pub mod auth;
pub mod product;
pub mod status;

use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::auth::AuthService;
use crate::catalog::CatalogService;
use crate::config::ServerConfig;
use crate::constants::{API_PATH, API_VERSION};
use crate::error::{Result, ShineStoreError};
use crate::security_logger::SecurityLogger;
use crate::storage::{MemoryProductStorage, MemoryUserStorage, ProductStorage, UserStorage};

/// Maximum accepted JSON body size
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Shared services handed to every handler
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, catalog: CatalogService) -> Arc<Self> {
        Arc::new(Self { auth, catalog })
    }

    /// Construct the stores named by the configuration and wire the services
    pub async fn from_config(
        config: &ServerConfig,
        security: Arc<SecurityLogger>,
    ) -> Result<Arc<Self>> {
        let (users, products): (Arc<dyn UserStorage>, Arc<dyn ProductStorage>) =
            match config.database_url.split_once("://") {
                Some(("memory", _)) => {
                    let products = match &config.products_file {
                        Some(path) => {
                            let storage = MemoryProductStorage::from_json_file(path).await?;
                            log::info!("Seeded product catalog from {}", path);
                            storage
                        }
                        None => MemoryProductStorage::new(),
                    };
                    (Arc::new(MemoryUserStorage::new()), Arc::new(products))
                }
                Some((scheme, _)) => {
                    return Err(ShineStoreError::ConfigError(format!(
                        "No store backend for scheme '{}'",
                        scheme
                    )))
                }
                None => {
                    return Err(ShineStoreError::ConfigError(
                        "Store URL is missing a scheme".to_string(),
                    ))
                }
            };

        let auth = AuthService::from_config(config, users, security)?;

        Ok(Self::new(Arc::new(auth), CatalogService::new(products)))
    }
}

/// Error body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub kind: &'static str,
    pub message: String,
}

/// Convert a service error into a JSON response
pub fn error_reply(err: &ShineStoreError) -> Response {
    if err.is_internal() {
        log::error!("Request failed: {}", err);
    } else {
        log::debug!("Request rejected: {}", err);
    }

    json_error(err.status_code(), err.kind(), err.public_message())
}

fn json_error(status: u16, kind: &'static str, message: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse {
        success: false,
        kind,
        message,
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

/// Helper filter to include the shared state in a request
pub fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Matches the `/api/v1` prefix
fn api() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path(API_PATH).and(warp::path(API_VERSION))
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Assemble all routes
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let register = api()
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(json_body())
        .and_then(auth::register_handler);

    let login = api()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::addr::remote())
        .and(json_body())
        .and_then(auth::login_handler);

    let me = api()
        .and(warp::path("me"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::addr::remote())
        .and_then(auth::me_handler);

    let list_products = api()
        .and(warp::path("product"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(product::list_products_handler);

    let get_product = api()
        .and(warp::path("product"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(product::get_product_handler);

    let status = warp::path::end()
        .and(warp::get())
        .and_then(status::status_handler);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| "OK");

    register
        .or(login)
        .or(me)
        .or(list_products)
        .or(get_product)
        .or(status)
        .or(health)
        .recover(handle_rejection)
        .with(warp::log("shine_store::http"))
}

/// Map warp rejections (unknown route, bad body, wrong method) to JSON errors
pub async fn handle_rejection(err: Rejection) -> std::result::Result<Response, Infallible> {
    let reply = if err.is_not_found() {
        json_error(404, "not_found", "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        log::debug!("Malformed request body: {}", e);
        json_error(400, "validation_error", "Malformed request body".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        json_error(413, "validation_error", "Request body too large".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        json_error(415, "validation_error", "Expected a JSON body".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        json_error(411, "validation_error", "Content-Length required".to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidHeader>() {
        log::debug!("Unreadable request header: {}", e);
        error_reply(&ShineStoreError::TokenInvalid(e.to_string()))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        json_error(405, "method_not_allowed", "Method not allowed".to_string())
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        json_error(500, "internal_error", "Internal server error".to_string())
    };

    Ok(reply)
}
