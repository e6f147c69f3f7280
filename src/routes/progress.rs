use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireSession;
use crate::models::classroom::requests::CourseScopedParams;
use crate::services::ProgressService;

// 懒加载的全局 ProgressService 实例
static PROGRESS_SERVICE: Lazy<ProgressService> = Lazy::new(ProgressService::new_lazy);

// 单门课程的学生进度
pub async fn get_course_progress(
    request: HttpRequest,
    query: web::Query<CourseScopedParams>,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE
        .get_course_progress(&request, query.into_inner())
        .await
}

// 所有任教课程的学生进度
pub async fn get_student_progress(request: HttpRequest) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.get_student_progress(&request).await
}

// 配置路由
pub fn configure_progress_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/progress")
            .wrap(RequireSession)
            .route("", web::get().to(get_course_progress)),
    )
    .service(
        web::scope("/api/student-progress")
            .wrap(RequireSession)
            .route("", web::get().to(get_student_progress)),
    );
}
