pub mod callback;
pub mod session;
pub mod signin;
pub mod signout;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::google::IdentityProvider;
use crate::models::auth::requests::OAuthCallbackParams;

/// 登录成功后的跳转地址
pub const SIGNED_IN_REDIRECT: &str = "/dashboard";

pub struct AuthService {
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { identity: None }
    }

    pub(crate) fn get_identity(&self, request: &HttpRequest) -> Arc<dyn IdentityProvider> {
        if let Some(identity) = &self.identity {
            identity.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn IdentityProvider>>>()
                .expect("Identity provider not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 跳转到 Google 授权页
    pub async fn sign_in(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        signin::handle_sign_in(self, request).await
    }

    // OAuth 回调
    pub async fn callback(
        &self,
        request: &HttpRequest,
        params: OAuthCallbackParams,
    ) -> ActixResult<HttpResponse> {
        callback::handle_callback(self, request, params).await
    }

    // 当前会话
    pub async fn get_session(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        session::handle_get_session(request).await
    }

    // 退出登录
    pub async fn sign_out(&self) -> ActixResult<HttpResponse> {
        signout::handle_sign_out().await
    }
}
