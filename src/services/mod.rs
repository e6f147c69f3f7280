pub mod auth;
pub mod classroom;
pub mod context;
pub mod dashboard;
pub mod metrics;
pub mod notifications;
pub mod pending_tasks;
pub mod progress;
pub mod reminders;

pub use auth::AuthService;
pub use classroom::ClassroomService;
pub use dashboard::DashboardService;
pub use metrics::MetricsService;
pub use notifications::NotificationService;
pub use pending_tasks::PendingTaskService;
pub use progress::ProgressService;
pub use reminders::ReminderService;
