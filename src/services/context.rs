//! 服务层共用的请求上下文

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use futures_util::{StreamExt, stream};
use std::future::Future;
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::DashboardError;
use crate::google::GoogleApiFactory;
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Session;
use crate::models::common::response::{error_response, handler_error_response};

pub const MISSING_TOKEN_MESSAGE: &str = "Missing Google access token in session";

/// 已认证且携带 Google 访问令牌的会话
#[derive(Debug, Clone)]
pub struct GoogleSession {
    pub session: Session,
    pub access_token: String,
}

impl GoogleSession {
    pub fn user_id(&self) -> &str {
        &self.session.user.id
    }
}

/// 读取会话并检查访问令牌
pub(crate) fn require_google_session(request: &HttpRequest) -> Result<GoogleSession, HttpResponse> {
    let session = RequireSession::extract_session(request)
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Unauthorized"))?;
    let access_token = session
        .google_token()
        .map(str::to_string)
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, MISSING_TOKEN_MESSAGE))?;
    Ok(GoogleSession {
        session,
        access_token,
    })
}

pub(crate) fn google_factory(request: &HttpRequest) -> Arc<dyn GoogleApiFactory> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn GoogleApiFactory>>>()
        .expect("Google API factory not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn object_cache(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|cache| cache.get_ref().clone())
}

/// 顶层失败：记录日志并返回 500
///
/// Google 返回 401 时令牌已失效，总是要求重新登录
pub(crate) fn failure_response(
    context: &str,
    err: &DashboardError,
    force_logout: bool,
) -> HttpResponse {
    error!("{} error: {}", context, err);
    handler_error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        err.message(),
        force_logout || err.is_auth_failure(),
    )
}

/// 有界并发映射，结果顺序与输入一致
pub async fn map_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, f: F) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(f)
        .buffered(limit.max(1))
        .collect()
        .await
}
