use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::auth::requests::OAuthCallbackParams;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn sign_in(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.sign_in(&request).await
}

pub async fn callback(
    request: HttpRequest,
    query: web::Query<OAuthCallbackParams>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.callback(&request, query.into_inner()).await
}

pub async fn get_session(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_session(&request).await
}

pub async fn sign_out() -> ActixResult<HttpResponse> {
    AUTH_SERVICE.sign_out().await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/signin", web::get().to(sign_in))
            .route("/callback/google", web::get().to(callback))
            .route("/session", web::get().to(get_session))
            .route("/signout", web::post().to(sign_out)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::{IdentityProvider, fake::FakeIdentity};
    use crate::utils::jwt::{OAUTH_STATE_COOKIE, SessionTokens};
    use actix_web::{App, cookie::Cookie, http::StatusCode, http::header, test};
    use std::sync::Arc;

    fn identity() -> web::Data<Arc<dyn IdentityProvider>> {
        web::Data::new(Arc::new(FakeIdentity) as Arc<dyn IdentityProvider>)
    }

    fn location(resp: &actix_web::dev::ServiceResponse) -> String {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[actix_web::test]
    async fn test_sign_in_redirects_with_state_cookie() {
        let app = test::init_service(
            App::new()
                .app_data(identity())
                .configure(configure_auth_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/auth/signin").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        let state = resp
            .response()
            .cookies()
            .find(|c| c.name() == OAUTH_STATE_COOKIE)
            .map(|c| c.value().to_string())
            .unwrap();
        assert!(location(&resp).ends_with(&format!("state={state}")));
    }

    #[actix_web::test]
    async fn test_callback_issues_session() {
        let app = test::init_service(
            App::new()
                .app_data(identity())
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/auth/callback/google?code=good-code&state=s1")
            .cookie(Cookie::new(OAUTH_STATE_COOKIE, "s1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/dashboard");

        let token = resp
            .response()
            .cookies()
            .find(|c| c.name() == "session_token")
            .map(|c| c.value().to_string())
            .unwrap();
        let session = SessionTokens::verify(&token).unwrap().into_session();
        assert_eq!(session.user.email.as_deref(), Some("profesor.garcia@school.edu"));

        // 会话接口不返回访问令牌
        let req = test::TestRequest::get()
            .uri("/api/auth/session")
            .cookie(SessionTokens::session_cookie(&token))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user"]["id"], "teacher-1");
        assert_eq!(body["user"]["role"], "profesor");
        assert!(!body.to_string().contains("ya29"));
    }

    #[actix_web::test]
    async fn test_callback_rejects_state_mismatch() {
        let app = test::init_service(
            App::new()
                .app_data(identity())
                .configure(configure_auth_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/auth/callback/google?code=good-code&state=forged")
            .cookie(Cookie::new(OAUTH_STATE_COOKIE, "s1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/?error=OAuthCallback");
        assert!(
            resp.response()
                .cookies()
                .all(|c| c.name() != "session_token")
        );
    }
}
