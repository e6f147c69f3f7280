/*!
 * 会话认证中间件
 *
 * 校验 `session_token` cookie 中的会话 JWT，
 * 通过后将 [`Session`] 放入请求扩展，处理器通过 [`RequireSession::extract_session`] 读取。
 *
 * ```rust,ignore
 * web::scope("/api/metrics")
 *     .wrap(RequireSession)
 *     .route("", web::get().to(get_metrics))
 * ```
 *
 * 未登录或令牌无效时返回 401 `{ "error": "Unauthorized" }`。
 * 会话中是否携带 Google 访问令牌由各处理器自行检查。
 */

use crate::models::auth::entities::Session;
use crate::utils::jwt::SessionTokens;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireSession;

// 辅助函数：提取并验证会话令牌
fn extract_and_validate_session(req: &ServiceRequest) -> Result<Session, String> {
    let token = SessionTokens::extract_from_request(req.request())
        .ok_or_else(|| "Missing session token".to_string())?;

    let claims = SessionTokens::verify(&token).map_err(|err| {
        info!("Session token validation failed: {}", err);
        "Invalid session token".to_string()
    })?;

    Ok(claims.into_session())
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, "").map_into_right_body(),
                ));
            }

            match extract_and_validate_session(&req) {
                Ok(session) => {
                    debug!("Session authenticated for user: {}", session.user.id);
                    req.extensions_mut().insert(session);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "Session authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireSession {
    /// 从请求扩展中提取会话
    /// 此函数应该在应用了 RequireSession 中间件的路由处理程序中使用
    pub fn extract_session(req: &actix_web::HttpRequest) -> Option<Session> {
        req.extensions().get::<Session>().cloned()
    }

    /// 从请求扩展中提取用户 ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<String> {
        req.extensions()
            .get::<Session>()
            .map(|session| session.user.id.clone())
    }
}
