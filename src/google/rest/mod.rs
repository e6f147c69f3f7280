pub mod classroom;
pub mod gmail;
pub mod oauth;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{DashboardError, Result};

use super::{ClassroomApi, GoogleApiFactory, MailSender};
use classroom::RestClassroomClient;
use gmail::RestGmailClient;

pub struct GoogleRestFactory {
    http: Client,
    classroom_base_url: String,
    gmail_base_url: String,
    page_size: u32,
}

impl GoogleRestFactory {
    pub fn new(
        http: Client,
        classroom_base_url: impl Into<String>,
        gmail_base_url: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            http,
            classroom_base_url: classroom_base_url.into(),
            gmail_base_url: gmail_base_url.into(),
            page_size,
        }
    }

    pub fn from_config() -> Result<Self> {
        let config = AppConfig::get();
        let http = Client::builder()
            .timeout(Duration::from_secs(config.google.request_timeout))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(
            "Google REST factory initialized (classroom: {}, gmail: {})",
            config.google.classroom_base_url, config.google.gmail_base_url
        );

        Ok(Self::new(
            http,
            config.google.classroom_base_url.clone(),
            config.google.gmail_base_url.clone(),
            config.google.page_size,
        ))
    }

    pub fn http_client(&self) -> Client {
        self.http.clone()
    }
}

impl GoogleApiFactory for GoogleRestFactory {
    fn classroom(&self, access_token: &str) -> Arc<dyn ClassroomApi> {
        Arc::new(RestClassroomClient::new(
            self.http.clone(),
            &self.classroom_base_url,
            access_token,
            self.page_size,
        ))
    }

    fn gmail(&self, access_token: &str) -> Arc<dyn MailSender> {
        Arc::new(RestGmailClient::new(
            self.http.clone(),
            &self.gmail_base_url,
            access_token,
        ))
    }
}

/// 将非 2xx 响应转换为错误
pub(crate) async fn check_status(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(status_error(status, context, &body))
}

pub(crate) fn status_error(status: StatusCode, context: &str, body: &str) -> DashboardError {
    let message = format!("{context} failed with status {status}: {body}");
    match status {
        // 只有 401 表示令牌失效；403 多为单门课程权限不足
        StatusCode::UNAUTHORIZED => DashboardError::google_auth(message),
        StatusCode::NOT_FOUND => DashboardError::not_found(message),
        _ => DashboardError::google_api(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        assert!(status_error(StatusCode::UNAUTHORIZED, "list courses", "").is_auth_failure());
        let forbidden = status_error(StatusCode::FORBIDDEN, "list announcements", "");
        assert!(!forbidden.is_auth_failure());
        assert!(matches!(forbidden, DashboardError::GoogleApi(_)));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "get profile", ""),
            DashboardError::NotFound(_)
        ));
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "list courses", "oops");
        assert!(matches!(err, DashboardError::GoogleApi(_)));
        assert!(err.message().contains("list courses"));
        assert!(err.message().contains("oops"));
    }
}
