pub mod auth;

pub mod classroom;

pub mod dashboard;

pub mod metrics;

pub mod notifications;

pub mod pending_tasks;

pub mod progress;

pub mod reminders;

pub use auth::configure_auth_routes;
pub use classroom::configure_classroom_routes;
pub use dashboard::configure_dashboard_routes;
pub use metrics::configure_metrics_routes;
pub use notifications::configure_notification_routes;
pub use pending_tasks::configure_pending_task_routes;
pub use progress::configure_progress_routes;
pub use reminders::configure_reminder_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_classroom_routes)
        .configure(configure_dashboard_routes)
        .configure(configure_metrics_routes)
        .configure(configure_progress_routes)
        .configure(configure_pending_task_routes)
        .configure(configure_notification_routes)
        .configure(configure_reminder_routes);
}
