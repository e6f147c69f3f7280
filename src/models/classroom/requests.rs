use serde::Deserialize;
use ts_rs::TS;

/// 课程列表过滤条件（对应 courses.list 的查询参数）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseListQuery {
    pub teacher_id: Option<String>,
    pub student_id: Option<String>,
    pub course_states: Vec<String>,
}

impl CourseListQuery {
    /// 当前用户所有进行中的课程
    pub fn active() -> Self {
        Self {
            course_states: vec!["ACTIVE".to_string()],
            ..Default::default()
        }
    }

    /// 当前用户任教的课程
    pub fn teaching() -> Self {
        Self {
            teacher_id: Some("me".to_string()),
            ..Self::active()
        }
    }

    /// 当前用户选修的课程
    pub fn enrolled() -> Self {
        Self {
            student_id: Some("me".to_string()),
            ..Self::active()
        }
    }
}

/// 以课程为维度的查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct CourseScopedParams {
    pub course_id: Option<String>,
}
