use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireSession;
use crate::services::ClassroomService;

// 懒加载的全局 ClassroomService 实例
static CLASSROOM_SERVICE: Lazy<ClassroomService> = Lazy::new(ClassroomService::new_lazy);

// 当前用户的课程
pub async fn list_courses(request: HttpRequest) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.list_courses(&request).await
}

// 当前用户的身份
pub async fn get_user_roles(request: HttpRequest) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.get_user_roles(&request).await
}

// 配置路由
pub fn configure_classroom_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/classroom")
            .wrap(RequireSession)
            .route("", web::get().to(list_courses)),
    )
    .service(
        web::scope("/api/user")
            .wrap(RequireSession)
            .route("", web::get().to(get_user_roles)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::{
        GoogleApiFactory,
        fake::{FakeClassroom, FakeFactory, course},
    };
    use crate::models::auth::entities::{SessionRole, SessionUser};
    use crate::utils::jwt::SessionTokens;
    use actix_web::{App, cookie::Cookie, http::StatusCode, test};
    use std::sync::Arc;

    fn factory(classroom: FakeClassroom) -> web::Data<Arc<dyn GoogleApiFactory>> {
        web::Data::new(Arc::new(FakeFactory::new(classroom)) as Arc<dyn GoogleApiFactory>)
    }

    fn signed_in(access_token: &str) -> Cookie<'static> {
        let user = SessionUser {
            id: "t1".into(),
            name: Some("Marta".into()),
            email: Some("profesor@school.edu".into()),
            image: None,
            role: SessionRole::Profesor,
        };
        let (token, _) = SessionTokens::issue(&user, access_token).unwrap();
        SessionTokens::session_cookie(&token)
    }

    #[actix_web::test]
    async fn test_list_courses() {
        let app = test::init_service(
            App::new()
                .app_data(factory(FakeClassroom::new().enrolled(course("c1", "Arte"))))
                .configure(configure_classroom_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/classroom")
            .cookie(signed_in("ya29.x"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["courses"][0]["id"], "c1");
    }

    #[actix_web::test]
    async fn test_session_and_token_are_required() {
        let app = test::init_service(
            App::new()
                .app_data(factory(FakeClassroom::new()))
                .configure(configure_classroom_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/classroom").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/classroom")
            .cookie(signed_in(""))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing Google access token in session");
    }

    #[actix_web::test]
    async fn test_expired_google_token_forces_logout() {
        let app = test::init_service(
            App::new()
                .app_data(factory(FakeClassroom::new().unauthorized()))
                .configure(configure_classroom_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/user")
            .cookie(signed_in("ya29.x"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers().get("X-Force-Logout").unwrap(), "true");
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["forceLogout"], true);
        assert_eq!(body["redirectTo"], "/");
    }
}
