use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/pending_tasks.ts")]
pub struct PendingStudent {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub submission_state: String,
}

/// 仍有学生未交的作业
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/pending_tasks.ts")]
pub struct PendingTask {
    pub course_id: String,
    pub course_name: String,
    pub task_id: String,
    pub task_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub pending_students: Vec<PendingStudent>,
}

/// GET /api/pending-tasks
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/pending_tasks.ts")]
pub struct PendingTasksResponse {
    pub pending_tasks: Vec<PendingTask>,
}
