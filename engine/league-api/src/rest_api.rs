//! REST API endpoints for the League API
//!
//! `/` and `/health` report liveness; `/league/data` serves the week snapshot
//! or a 500 with a `detail` message. Unknown routes get a JSON 404.

use crate::aggregator::LeagueService;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Service banner returned from `/`
pub const SERVICE_MESSAGE: &str = "Fantasy Football Matrix API";

/// Root endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
}

/// Health endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn error_reply(status: StatusCode, detail: impl Into<String>) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&ErrorResponse { detail: detail.into() }), status)
        .into_response()
}

/// Get the current week's matchups
pub async fn get_league_data(service: LeagueService) -> Result<warp::reply::Response, Infallible> {
    match service.league_data().await {
        Ok(snapshot) => Ok(warp::reply::json(&snapshot).into_response()),
        Err(e) => Ok(error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error fetching league data: {e}"),
        )),
    }
}

/// Map unmatched routes and other rejections to JSON errors
pub async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    if err.is_not_found() {
        return Ok(error_reply(StatusCode::NOT_FOUND, "Not Found"));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"));
    }
    if err.find::<warp::cors::CorsForbidden>().is_some() {
        return Ok(error_reply(StatusCode::FORBIDDEN, "CORS request forbidden"));
    }

    tracing::error!("Unhandled rejection: {:?}", err);
    Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
}

/// Create REST API routes
pub fn create_routes(
    service: LeagueService,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let service_filter = warp::any().map(move || service.clone());

    let root = warp::path::end().and(warp::get()).map(|| {
        warp::reply::json(&RootResponse {
            message: SERVICE_MESSAGE.to_string(),
            status: "running".to_string(),
        })
    });

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&HealthResponse { status: "healthy".to_string() }));

    let league_data = warp::path!("league" / "data")
        .and(warp::get())
        .and(service_filter)
        .and_then(get_league_data);

    // The matrix panel calls in from the LAN
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "OPTIONS"]);

    root.or(health)
        .or(league_data)
        .with(cors)
        .with(warp::trace::request())
        .recover(handle_rejection)
}
