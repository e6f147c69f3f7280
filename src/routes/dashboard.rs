use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireSession;
use crate::services::DashboardService;

// 懒加载的全局 DashboardService 实例
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn get_overview(request: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_overview(&request).await
}

pub async fn get_student_dashboard(request: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_student_dashboard(&request).await
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/dashboard")
            .wrap(RequireSession)
            .route("", web::get().to(get_overview)),
    )
    .service(
        web::scope("/api/student-dashboard")
            .wrap(RequireSession)
            .route("", web::get().to(get_student_dashboard)),
    );
}
