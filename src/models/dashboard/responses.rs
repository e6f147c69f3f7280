use serde::Serialize;
use ts_rs::TS;

use super::entities::{AssignmentStatus, CourseRole};
use crate::models::classroom::entities::{DueDate, TimeOfDay};

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StateHistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct SubmissionHistoryEntry {
    pub state_history: Option<StateHistoryEntry>,
}

/// 当前学生自己的提交
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct UserSubmission {
    pub id: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_history: Option<Vec<SubmissionHistoryEntry>>,
}

/// 附带提交统计的作业
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct CourseWorkWithSubmissions {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "Array<unknown> | null")]
    pub materials: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_modification_mode: Option<String>,
    pub total_submissions: usize,
    pub turned_in_submissions: usize,
    pub graded_submissions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_submission: Option<UserSubmission>,
}

/// 仪表盘中的课程
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardCourse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_link: Option<String>,
    pub role: CourseRole,
    pub course_work: Vec<CourseWorkWithSubmissions>,
    pub total_assignments: usize,
    pub completed_assignments: usize,
    pub pending_assignments: usize,
}

/// GET /api/dashboard
#[derive(Debug, Clone, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardOverview {
    pub teacher_courses: Vec<DashboardCourse>,
    pub student_courses: Vec<DashboardCourse>,
    pub total_courses: usize,
    pub total_assignments: usize,
    pub completed_assignments: usize,
    pub pending_assignments: usize,
}

/// 作业反馈信息
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AssignmentFeedback {
    pub has_grade: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_grade: Option<f64>,
    pub is_returned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_time: Option<String>,
    pub feedback_available: bool,
    pub needs_attention: bool,
}

/// 学生视角的待办作业
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub course_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub status: AssignmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<AssignmentFeedback>,
}

/// 学生在单门课程中的进度
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentCourseProgress {
    pub course_id: String,
    pub course_name: String,
    pub progress_percent: u32,
    pub total_assignments: usize,
    pub completed_assignments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RecentGrade {
    pub course_name: String,
    pub grade: f64,
    pub assignment_title: String,
    pub date: chrono::DateTime<chrono::Utc>,
}

/// GET /api/student-dashboard
#[derive(Debug, Clone, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboardData {
    pub overall_progress: u32,
    pub courses: Vec<StudentCourseProgress>,
    pub upcoming_assignments: Vec<Assignment>,
    pub recent_grades: Vec<RecentGrade>,
    pub total_courses: usize,
    pub total_assignments: usize,
    pub completed_assignments: usize,
}
