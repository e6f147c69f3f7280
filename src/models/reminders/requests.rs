use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reminder.ts")]
pub struct ReminderStudent {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
}

/// POST /api/send-reminder
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/reminder.ts")]
pub struct ReminderRequest {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub task_title: String,
    #[serde(default)]
    pub course_name: String,
    pub due_date: Option<String>,
    #[serde(default)]
    pub students: Vec<ReminderStudent>,
}

/// POST /api/send-mass-reminder
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/reminder.ts")]
pub struct MassReminderRequest {
    #[serde(default)]
    pub tasks: Vec<ReminderRequest>,
}
