use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::DateTime;

use crate::models::auth::responses::SessionResponse;
use crate::models::common::response::error_response;
use crate::utils::jwt::SessionTokens;

/// 返回会话中的用户信息，不包含访问令牌
pub async fn handle_get_session(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let claims = match SessionTokens::extract_from_request(request)
        .and_then(|token| SessionTokens::verify(&token).ok())
    {
        Some(claims) => claims,
        None => return Ok(error_response(StatusCode::UNAUTHORIZED, "Unauthorized")),
    };

    let expires = DateTime::from_timestamp(claims.exp as i64, 0).unwrap_or_default();
    Ok(HttpResponse::Ok().json(SessionResponse {
        user: claims.into_session().user,
        expires,
    }))
}
