use serde::Serialize;
use ts_rs::TS;

/// 公告通知
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationItem {
    pub id: Option<String>,
    pub course_id: String,
    pub course_name: String,
    pub text: String,
    pub alternate_link: Option<String>,
    pub state: Option<String>,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
}

/// GET /api/notifications
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListResponse {
    pub announcements: Vec<NotificationItem>,
}
