//! 课程周指标

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::{DateTime, Duration, Utc};
use futures_util::try_join;
use std::collections::HashSet;
use tracing::warn;

use super::MetricsService;
use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::{entities::StudentSubmission, requests::CourseScopedParams};
use crate::models::common::response::error_response;
use crate::models::metrics::responses::{CourseMetrics, MetricsResponse, WeeklyMetrics};
use crate::services::context::{failure_response, map_bounded, require_google_session};
use crate::utils::dates::{parse_timestamp, recent_week_starts};
use crate::utils::validate::validate_course_id;

pub const WEEKS: usize = 8;
/// 预期每周至少 70% 的学生有提交
const EXPECTED_ACTIVITY_RATIO: f64 = 0.7;

pub async fn get_metrics(
    service: &MetricsService,
    request: &HttpRequest,
    query: CourseScopedParams,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let course_id = match query.course_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                "courseId parameter is required",
            ));
        }
    };
    if let Err(msg) = validate_course_id(course_id) {
        return Ok(error_response(StatusCode::BAD_REQUEST, msg));
    }

    let api = service.get_google(request).classroom(&session.access_token);
    match course_metrics(api.as_ref(), course_id, Utc::now(), service.max_concurrency).await {
        Ok(metrics) => Ok(HttpResponse::Ok().json(MetricsResponse { metrics })),
        Err(e) => Ok(failure_response("/api/metrics", &e, true)),
    }
}

/// 统计最近八周的提交与参与情况
///
/// 每个作业只拉取一次提交记录，再按周分桶。
pub async fn course_metrics(
    api: &dyn ClassroomApi,
    course_id: &str,
    now: DateTime<Utc>,
    max_concurrency: usize,
) -> Result<CourseMetrics> {
    let (students, course_work, announcements) = try_join!(
        api.list_students(course_id),
        api.list_course_work(course_id),
        api.list_announcements(course_id)
    )?;

    let work_ids: Vec<String> = course_work.iter().filter_map(|w| w.id.clone()).collect();
    let fetched = map_bounded(work_ids, max_concurrency, |work_id| async move {
        let result = api.list_submissions(course_id, &work_id, None).await;
        (work_id, result)
    })
    .await;

    let mut submissions: Vec<StudentSubmission> = Vec::new();
    for (work_id, result) in fetched {
        match result {
            Ok(mut subs) => submissions.append(&mut subs),
            Err(e) => warn!("Failed to get submissions for coursework {}: {}", work_id, e),
        }
    }

    let weekly_data = weekly_buckets(&submissions, students.len(), now);

    Ok(CourseMetrics {
        weekly_data,
        total_students: students.len(),
        total_assignments: course_work.len(),
        total_announcements: announcements.len(),
    })
}

fn weekly_buckets(
    submissions: &[StudentSubmission],
    total_students: usize,
    now: DateTime<Utc>,
) -> Vec<WeeklyMetrics> {
    let activity: Vec<(DateTime<Utc>, Option<&str>)> = submissions
        .iter()
        .filter_map(|s| {
            let at = parse_timestamp(s.activity_time()?)?;
            Some((at, s.user_id.as_deref()))
        })
        .collect();

    recent_week_starts(now, WEEKS)
        .into_iter()
        .enumerate()
        .map(|(i, start)| {
            let end = start + Duration::weeks(1);
            let in_week: Vec<_> = activity
                .iter()
                .filter(|(at, _)| *at >= start && *at < end)
                .collect();
            let participants: HashSet<&str> =
                in_week.iter().filter_map(|(_, user)| *user).collect();

            WeeklyMetrics {
                week: start.format("%Y-%m-%d").to_string(),
                week_label: format!("Semana {}", i + 1),
                attendance_percent: attendance_percent(in_week.len(), total_students),
                submissions_count: in_week.len(),
                participation_count: participants.len(),
            }
        })
        .collect()
}

pub fn attendance_percent(submissions: usize, total_students: usize) -> u32 {
    if total_students == 0 {
        return 0;
    }
    let expected = (total_students as f64 * EXPECTED_ACTIVITY_RATIO).max(1.0);
    ((submissions as f64 / expected) * 100.0).round().min(100.0) as u32
}
