use serde::Serialize;
use warp::reply::Response;
use warp::{Rejection, Reply};

#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// `GET /`: liveness message with the server clock
pub async fn status_handler() -> Result<Response, Rejection> {
    let status = ServerStatus {
        message: "Server is running smoothly".to_string(),
        timestamp: chrono::Utc::now(),
    };
    Ok(warp::reply::json(&status).into_response())
}
