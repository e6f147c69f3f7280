//! Google API 访问层
//!
//! 业务层只依赖这里的 trait；默认实现位于 `rest`，基于 reqwest 直接调用
//! Classroom v1 / Gmail v1 REST 接口。访问令牌随请求传入，每个请求构造独立的客户端。

use std::sync::Arc;

use crate::errors::Result;
use crate::models::auth::entities::{GoogleUserInfo, OAuthTokens};
use crate::models::classroom::{
    entities::{Announcement, Course, CourseWork, RosterStudent, StudentSubmission, UserProfile},
    requests::CourseListQuery,
    responses::CurrentUser,
};
use crate::models::reminders::entities::EmailMessage;

pub mod rest;

#[cfg(test)]
pub mod fake;

#[async_trait::async_trait]
pub trait ClassroomApi: Send + Sync {
    /// 课程管理方法
    // 列出课程（自动翻页）
    async fn list_courses(&self, query: &CourseListQuery) -> Result<Vec<Course>>;
    // 列出课程作业
    async fn list_course_work(&self, course_id: &str) -> Result<Vec<CourseWork>>;
    // 列出课程学生
    async fn list_students(&self, course_id: &str) -> Result<Vec<RosterStudent>>;
    // 列出公告
    async fn list_announcements(&self, course_id: &str) -> Result<Vec<Announcement>>;

    /// 提交管理方法
    // 列出某作业的提交，可按学生过滤
    async fn list_submissions(
        &self,
        course_id: &str,
        course_work_id: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<StudentSubmission>>;

    /// 用户方法
    // 获取用户资料，不存在时返回 None
    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
    // 获取当前登录用户
    async fn current_user(&self) -> Result<CurrentUser>;
}

#[async_trait::async_trait]
pub trait MailSender: Send + Sync {
    /// 发送一封邮件，返回 Gmail 消息 ID
    async fn send(&self, message: &EmailMessage) -> Result<String>;
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorization_url(&self, state: &str) -> Result<String>;
    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens>;
    async fn user_info(&self, access_token: &str) -> Result<GoogleUserInfo>;
}

/// 按访问令牌构造 API 客户端
pub trait GoogleApiFactory: Send + Sync {
    fn classroom(&self, access_token: &str) -> Arc<dyn ClassroomApi>;
    fn gmail(&self, access_token: &str) -> Arc<dyn MailSender>;
}

pub struct GoogleClients {
    pub api: Arc<dyn GoogleApiFactory>,
    pub identity: Arc<dyn IdentityProvider>,
}

pub fn create_google_clients() -> Result<GoogleClients> {
    let factory = rest::GoogleRestFactory::from_config()?;
    let identity = rest::oauth::GoogleOAuthClient::from_config(factory.http_client())?;
    Ok(GoogleClients {
        api: Arc::new(factory),
        identity: Arc::new(identity),
    })
}
