use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireSession};
use crate::models::reminders::requests::{MassReminderRequest, ReminderRequest};
use crate::services::ReminderService;

// 懒加载的全局 ReminderService 实例
static REMINDER_SERVICE: Lazy<ReminderService> = Lazy::new(ReminderService::new_lazy);

pub async fn send_reminder(
    request: HttpRequest,
    body: web::Json<ReminderRequest>,
) -> ActixResult<HttpResponse> {
    REMINDER_SERVICE
        .send_reminder(&request, body.into_inner())
        .await
}

pub async fn send_mass_reminder(
    request: HttpRequest,
    body: web::Json<MassReminderRequest>,
) -> ActixResult<HttpResponse> {
    REMINDER_SERVICE
        .send_mass_reminder(&request, body.into_inner())
        .await
}

// 配置路由
pub fn configure_reminder_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/send-reminder")
            .wrap(RateLimit::reminders().with_prefix("send-reminder"))
            .wrap(RequireSession)
            .route("", web::post().to(send_reminder)),
    )
    .service(
        web::scope("/api/send-mass-reminder")
            .wrap(RateLimit::reminders().with_prefix("send-mass-reminder"))
            .wrap(RequireSession)
            .route("", web::post().to(send_mass_reminder)),
    );
}
