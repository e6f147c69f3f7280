use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireSession;
use crate::services::PendingTaskService;

// 懒加载的全局 PendingTaskService 实例
static PENDING_TASK_SERVICE: Lazy<PendingTaskService> = Lazy::new(PendingTaskService::new_lazy);

pub async fn list_pending_tasks(request: HttpRequest) -> ActixResult<HttpResponse> {
    PENDING_TASK_SERVICE.list_pending_tasks(&request).await
}

// 配置路由
pub fn configure_pending_task_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/pending-tasks")
            .wrap(RequireSession)
            .route("", web::get().to(list_pending_tasks)),
    );
}
