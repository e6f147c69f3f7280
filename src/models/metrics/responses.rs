use serde::Serialize;
use ts_rs::TS;

/// 单周指标
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/metrics.ts")]
pub struct WeeklyMetrics {
    /// 周一日期，`YYYY-MM-DD`
    pub week: String,
    /// "Semana 1", "Semana 2", ...
    pub week_label: String,
    pub attendance_percent: u32,
    pub submissions_count: usize,
    pub participation_count: usize,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/metrics.ts")]
pub struct CourseMetrics {
    pub weekly_data: Vec<WeeklyMetrics>,
    pub total_students: usize,
    pub total_assignments: usize,
    pub total_announcements: usize,
}

/// GET /api/metrics
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/metrics.ts")]
pub struct MetricsResponse {
    pub metrics: CourseMetrics,
}
