//! Google Classroom v1 资源结构
//!
//! 字段与 REST 响应保持一致（camelCase），缺失字段一律按 `None` 处理。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未填写姓名时的默认显示
pub const UNKNOWN_STUDENT_NAME: &str = "Desconocido";

pub const STATE_NEW: &str = "NEW";
pub const STATE_CREATED: &str = "CREATED";
pub const STATE_TURNED_IN: &str = "TURNED_IN";
pub const STATE_RETURNED: &str = "RETURNED";
pub const STATE_RECLAIMED: &str = "RECLAIMED_BY_STUDENT";
pub const STATE_UNSPECIFIED: &str = "SUBMISSION_STATE_UNSPECIFIED";
pub const STATE_NOT_SUBMITTED: &str = "NOT_SUBMITTED";

/// 课程
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct Course {
    pub id: Option<String>,
    pub name: Option<String>,
    pub section: Option<String>,
    pub description_heading: Option<String>,
    pub description: Option<String>,
    pub room: Option<String>,
    pub owner_id: Option<String>,
    pub course_state: Option<String>,
    pub alternate_link: Option<String>,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
    /// 只有教师身份才能看到课程的 Drive 目录
    pub teacher_folder: Option<DriveFolder>,
}

impl Course {
    /// 当前用户是否为该课程的教师
    pub fn is_taught_by(&self, user_id: &str) -> bool {
        self.teacher_folder.is_some() || self.owner_id.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct DriveFolder {
    pub id: Option<String>,
    pub title: Option<String>,
    pub alternate_link: Option<String>,
}

/// 截止日期（UTC 日历日）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct DueDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DueDate {
    /// 格式化为 `YYYY-MM-DD`，任一部分缺失时返回 `None`
    pub fn format(&self) -> Option<String> {
        Some(format!(
            "{}-{:02}-{:02}",
            self.year?, self.month?, self.day?
        ))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct TimeOfDay {
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
}

/// 作业
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct CourseWork {
    pub id: Option<String>,
    pub course_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[ts(type = "Array<unknown> | null")]
    pub materials: Option<Vec<serde_json::Value>>,
    pub state: Option<String>,
    pub alternate_link: Option<String>,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
    pub due_date: Option<DueDate>,
    pub due_time: Option<TimeOfDay>,
    pub max_points: Option<f64>,
    pub work_type: Option<String>,
    pub submission_modification_mode: Option<String>,
    pub topic_id: Option<String>,
}

impl CourseWork {
    pub fn due_date_string(&self) -> Option<String> {
        self.due_date.as_ref().and_then(DueDate::format)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct StateHistory {
    pub state: Option<String>,
    pub state_timestamp: Option<String>,
    pub actor_user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct SubmissionHistory {
    pub state_history: Option<StateHistory>,
}

/// 学生提交记录
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct StudentSubmission {
    pub id: Option<String>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub course_work_id: String,
    #[serde(default)]
    pub state: String,
    pub assigned_grade: Option<f64>,
    pub draft_grade: Option<f64>,
    pub alternate_link: Option<String>,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
    pub late: Option<bool>,
    pub submission_history: Option<Vec<SubmissionHistory>>,
}

impl StudentSubmission {
    /// 补全课程与作业 ID，缺失状态视为 NEW
    pub fn normalized(mut self, course_id: &str, course_work_id: &str) -> Self {
        self.course_id = course_id.to_string();
        self.course_work_id = course_work_id.to_string();
        if self.state.is_empty() {
            self.state = STATE_NEW.to_string();
        }
        self
    }

    pub fn is_delivered(&self) -> bool {
        is_delivered_state(&self.state)
    }

    pub fn is_returned(&self) -> bool {
        self.state == STATE_RETURNED
    }

    /// 最近一次活动时间：优先 updateTime
    pub fn activity_time(&self) -> Option<&str> {
        self.update_time
            .as_deref()
            .or(self.creation_time.as_deref())
    }
}

/// TURNED_IN 与 RETURNED 视为已交
pub fn is_delivered_state(state: &str) -> bool {
    state == STATE_TURNED_IN || state == STATE_RETURNED
}

/// 进度视图的交付判断，不区分大小写
pub fn is_delivered_state_ignore_case(state: &str) -> bool {
    state.eq_ignore_ascii_case(STATE_TURNED_IN) || state.eq_ignore_ascii_case(STATE_RETURNED)
}

/// 未交或处于待完成状态
pub fn is_pending_state(state: Option<&str>) -> bool {
    match state {
        None => true,
        Some(s) => matches!(s, STATE_NEW | STATE_CREATED | STATE_RECLAIMED),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct Name {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub full_name: Option<String>,
}

/// 用户资料
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/classroom.ts")]
pub struct UserProfile {
    pub id: Option<String>,
    pub name: Option<Name>,
    pub email_address: Option<String>,
    pub photo_url: Option<String>,
}

/// 花名册原始条目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub course_id: Option<String>,
    pub user_id: Option<String>,
    pub profile: Option<UserProfile>,
}

/// 整理后的花名册学生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudent {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
}

impl RosterStudent {
    /// 没有任何 ID 的条目直接丢弃
    pub fn from_student(student: Student) -> Option<Self> {
        let profile = student.profile.unwrap_or_default();
        let user_id = student.user_id.or(profile.id)?;
        let name = profile
            .name
            .and_then(|n| n.full_name.or(n.given_name))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_STUDENT_NAME.to_string());
        Some(Self {
            user_id,
            name,
            email: profile.email_address.filter(|e| !e.is_empty()),
        })
    }
}

/// 公告
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Option<String>,
    #[serde(default)]
    pub course_id: String,
    pub text: Option<String>,
    pub alternate_link: Option<String>,
    pub state: Option<String>,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
}
