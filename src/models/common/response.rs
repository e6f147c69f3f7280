use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::utils::jwt::SessionTokens;

pub const FORCE_LOGOUT_HEADER: &str = "X-Force-Logout";
pub const REDIRECT_TO_HEADER: &str = "X-Redirect-To";

// 统一的错误响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_logout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl ErrorResponse {
    /// 仅包含错误信息
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            force_logout: None,
            redirect_to: None,
        }
    }

    /// 携带登出指示的错误
    pub fn with_logout(message: impl Into<String>, force_logout: bool) -> Self {
        Self {
            error: message.into(),
            force_logout: Some(force_logout),
            redirect_to: force_logout.then(|| "/".to_string()),
        }
    }
}

/// 简单错误：`{ error }`
pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(message))
}

/// 处理器级错误：`{ error, forceLogout, redirectTo }`
///
/// 强制登出时同时清除会话 cookie，并通过响应头通知客户端跳转。
pub fn handler_error_response(
    status: StatusCode,
    message: impl Into<String>,
    force_logout: bool,
) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    if force_logout {
        builder
            .insert_header((FORCE_LOGOUT_HEADER, "true"))
            .insert_header((REDIRECT_TO_HEADER, "/"))
            .cookie(SessionTokens::empty_cookie());
    }
    builder.json(ErrorResponse::with_logout(message, force_logout))
}
