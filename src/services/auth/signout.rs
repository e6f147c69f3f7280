use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::auth::responses::SignOutResponse;
use crate::utils::jwt::SessionTokens;

/// 清除会话 cookie（max_age=0 会让浏览器删除该 cookie）
pub async fn handle_sign_out() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(SessionTokens::empty_cookie())
        .json(SignOutResponse {
            url: "/".to_string(),
        }))
}
