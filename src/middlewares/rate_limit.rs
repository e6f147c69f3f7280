/*!
 * 速率限制中间件
 *
 * 用于限制发送提醒邮件的频率，避免短时间内大量调用 Gmail。
 *
 * ```rust,ignore
 * web::scope("/api/send-reminder")
 *     .wrap(RateLimit::reminders())
 *     .wrap(RequireSession)   // 最后 wrap 的最先执行
 *     .route("", web::post().to(send_reminder))
 * ```
 *
 * - 已登录时按会话用户限制，否则按客户端 IP
 * - 超过限制返回 429 `{ "error": ... }`
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::AppConfig;
use crate::models::{ErrorResponse, auth::entities::Session};

/// 全局计数缓存
/// 键: 前缀:标识，值: (窗口开始时间, 请求计数)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (Instant, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 提醒邮件端点，阈值来自 `rate_limit` 配置
    pub fn reminders() -> Self {
        let config = &AppConfig::get().rate_limit;
        Self::new(config.reminder_max_requests, config.reminder_window_secs)
            .with_prefix("reminder")
    }
}

/// 从请求中提取客户端 IP
///
/// 部署在反向代理之后时需要代理正确设置 X-Forwarded-For / X-Real-IP
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

fn extract_user_id(req: &ServiceRequest) -> Option<String> {
    req.extensions()
        .get::<Session>()
        .map(|session| session.user.id.clone())
}

/// 计算新的窗口状态，返回 (状态, 是否放行)
fn next_window(
    previous: Option<(Instant, u32)>,
    now: Instant,
    max_requests: u32,
    window: Duration,
) -> ((Instant, u32), bool) {
    match previous {
        Some((started, count)) if now.duration_since(started) < window => {
            if count >= max_requests {
                ((started, count), false)
            } else {
                ((started, count + 1), true)
            }
        }
        _ => ((now, 1), max_requests > 0),
    }
}

/// 原子地更新窗口计数，返回是否放行
async fn acquire(key: &str, max_requests: u32, window: Duration) -> bool {
    let mut allowed = false;
    RATE_LIMIT_CACHE
        .entry(key.to_string())
        .and_upsert_with(|previous| {
            let (state, ok) = next_window(
                previous.map(|entry| entry.into_value()),
                Instant::now(),
                max_requests,
                window,
            );
            allowed = ok;
            ready(state)
        })
        .await;
    allowed
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ErrorResponse::new("Too many requests, please try again later"))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if limit.key_prefix.is_empty() {
                identifier
            } else {
                format!("{}:{}", limit.key_prefix, identifier)
            };

            let allowed = acquire(
                &cache_key,
                limit.max_requests,
                Duration::from_secs(limit.window_secs),
            )
            .await;

            if !allowed {
                warn!(
                    "Rate limit exceeded for key: {} (limit: {}/{}s)",
                    cache_key, limit.max_requests, limit.window_secs
                );
                return Ok(req.into_response(
                    create_rate_limit_response(limit.window_secs).map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}
