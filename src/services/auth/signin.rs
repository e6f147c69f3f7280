use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, http::header};

use super::AuthService;
use crate::models::common::response::error_response;
use crate::utils::jwt::SessionTokens;

/// 生成 state 写入 cookie，然后重定向到 Google 授权页
pub async fn handle_sign_in(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = service.get_identity(request);
    let state = SessionTokens::generate_state();

    match identity.authorization_url(&state) {
        Ok(url) => Ok(HttpResponse::Found()
            .cookie(SessionTokens::state_cookie(&state))
            .insert_header((header::LOCATION, url))
            .finish()),
        Err(e) => {
            tracing::error!("Failed to build authorization url: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to start sign in",
            ))
        }
    }
}
