//! Product catalog endpoints

use std::sync::Arc;
use warp::reply::Response;
use warp::{Rejection, Reply};

use super::{error_reply, AppState};

pub async fn list_products_handler(state: Arc<AppState>) -> Result<Response, Rejection> {
    match state.catalog.list_products().await {
        Ok(products) => Ok(warp::reply::json(&products).into_response()),
        Err(e) => Ok(error_reply(&e)),
    }
}

pub async fn get_product_handler(id: String, state: Arc<AppState>) -> Result<Response, Rejection> {
    match state.catalog.get_product(&id).await {
        Ok(product) => Ok(warp::reply::json(&product).into_response()),
        Err(e) => Ok(error_reply(&e)),
    }
}
