use std::convert::Infallible;

use warp::{
    http::StatusCode,
    reject::{InvalidQuery, LengthRequired, MethodNotAllowed, PayloadTooLarge, UnsupportedMediaType},
    reply::Response,
    Rejection, Reply,
};

use crate::error::{ApiError, Error, ErrorResponse};

/// Renders an error as `{"error": ...}` with its status. Server errors are
/// logged with their full message, which is also returned to the client.
pub fn error_reply(error: &Error) -> Response {
    let status = error.status();
    if status.is_server_error() {
        log::error!("Request failed: {error}");
    }

    warp::reply::with_status(warp::reply::json(&ErrorResponse::from(error)), status)
        .into_response()
}

fn status_error(status: StatusCode, info: &str) -> Error {
    Error {
        code: status.as_u16(),
        info: Some(info.to_owned()),
    }
}

/// Maps warp's own rejections (unknown route, wrong method, bad query or
/// body) onto the same JSON error shape. Handlers never reject, so only
/// filter rejections arrive here.
///
/// A rejection from `or` carries every branch that failed, so a bad POST body
/// also carries the `MethodNotAllowed` of the GET route on the same path.
/// Body problems are checked first for that reason.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let error = if err.is_not_found() {
        ApiError::NotFound.new("Not found")
    } else if err.find::<LengthRequired>().is_some() {
        status_error(StatusCode::LENGTH_REQUIRED, "Content-Length header is required")
    } else if err.find::<PayloadTooLarge>().is_some() {
        status_error(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
    } else if err.find::<UnsupportedMediaType>().is_some() {
        status_error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Request body must be application/json",
        )
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        ApiError::InvalidRequest.new(&format!("Invalid request body: {e}"))
    } else if let Some(e) = err.find::<InvalidQuery>() {
        ApiError::InvalidRequest.new(&format!("{e}"))
    } else if err.find::<MethodNotAllowed>().is_some() {
        status_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        ApiError::Internal.new(&format!("Unhandled rejection: {err:?}"))
    };

    Ok(error_reply(&error))
}
