pub mod rate_limit;
pub mod require_session;

use actix_web::{
    HttpResponse,
    http::{StatusCode, header::CONTENT_TYPE},
};

use crate::models::ErrorResponse;

pub use rate_limit::RateLimit;
pub use require_session::RequireSession;

// 辅助函数：创建中间件错误响应
pub(crate) fn create_error_response(status: StatusCode, message: &str) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status).finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ErrorResponse::new(message)),
    }
}
