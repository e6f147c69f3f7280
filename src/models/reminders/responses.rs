use serde::Serialize;
use ts_rs::TS;

/// 提醒发送结果
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/reminder.ts")]
pub struct ReminderResponse {
    pub success: bool,
    pub message: String,
    pub sent_to: usize,
    pub failed: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tasks: Option<usize>,
    pub errors: Vec<String>,
}
