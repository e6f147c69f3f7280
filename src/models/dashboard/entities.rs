use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 用户在课程中的身份
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum CourseRole {
    Teacher,
    Student,
}

impl CourseRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseRole::Teacher => "teacher",
            CourseRole::Student => "student",
        }
    }
}

/// 学生视角的作业状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum AssignmentStatus {
    Pending,
    Submitted,
    Late,
}
