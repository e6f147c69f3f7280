use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    http::StatusCode,
};
use tracing::debug;

use crate::models::common::response::error_response;

/// JSON 请求体解析失败时返回 `{ error }`
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid JSON body for {}: {}", req.path(), err);
    let status = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    let message = format!("Invalid request body: {err}");
    InternalError::from_response(err, error_response(status, message)).into()
}

/// 查询参数解析失败时返回 `{ error }`
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid query string for {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    let response: HttpResponse = error_response(StatusCode::BAD_REQUEST, message);
    InternalError::from_response(err, response).into()
}
