use serde::Serialize;
use ts_rs::TS;

/// 课程进度表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct CourseProgressRow {
    pub user_id: String,
    pub name: String,
    pub progress_pct: u32,
    pub average_grade: Option<f64>,
    pub last_submission_at: Option<String>,
}

/// GET /api/progress
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct CourseProgressResponse {
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    pub students: Vec<CourseProgressRow>,
}

/// 学生在单个作业上的提交情况
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct StudentTaskSubmission {
    pub task_id: String,
    pub task_title: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

/// 教师视角下单个学生的进度
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct StudentProgress {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub course_id: String,
    pub course_name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub graded_tasks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_grade: Option<f64>,
    pub completion_rate: f64,
    pub submissions: Vec<StudentTaskSubmission>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct CourseStudentProgress {
    pub course_id: String,
    pub course_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub total_students: usize,
    pub total_tasks: usize,
    pub students: Vec<StudentProgress>,
}

/// GET /api/student-progress
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct StudentProgressResponse {
    pub courses: Vec<CourseStudentProgress>,
    pub total_students: usize,
    pub overall_average_completion: f64,
}
