pub mod auth;
pub mod classroom;
pub mod common;
pub mod dashboard;
pub mod metrics;
pub mod notifications;
pub mod pending_tasks;
pub mod progress;
pub mod reminders;

pub use common::response::ErrorResponse;

use chrono::{DateTime, Utc};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}
