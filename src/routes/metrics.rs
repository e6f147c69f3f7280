use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireSession;
use crate::models::classroom::requests::CourseScopedParams;
use crate::services::MetricsService;

// 懒加载的全局 MetricsService 实例
static METRICS_SERVICE: Lazy<MetricsService> = Lazy::new(MetricsService::new_lazy);

pub async fn get_metrics(
    request: HttpRequest,
    query: web::Query<CourseScopedParams>,
) -> ActixResult<HttpResponse> {
    METRICS_SERVICE
        .get_metrics(&request, query.into_inner())
        .await
}

// 配置路由
pub fn configure_metrics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/metrics")
            .wrap(RequireSession)
            .route("", web::get().to(get_metrics)),
    );
}
