//! 单门课程的学生进度表

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use futures_util::try_join;

use super::ProgressService;
use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::{
    entities::{Course, RosterStudent, is_delivered_state_ignore_case},
    requests::CourseScopedParams,
};
use crate::models::common::response::error_response;
use crate::models::progress::responses::{CourseProgressResponse, CourseProgressRow};
use crate::services::classroom::{WorkSubmissions, active_courses, submissions_by_work};
use crate::services::context::{failure_response, require_google_session};
use crate::utils::collate::compare_names;
use crate::utils::dates::{parse_timestamp, round2};
use crate::utils::validate::validate_course_id;

pub async fn get_course_progress(
    service: &ProgressService,
    request: &HttpRequest,
    query: CourseScopedParams,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let course_id = query.course_id.filter(|id| !id.is_empty());
    if let Some(id) = course_id.as_deref()
        && let Err(msg) = validate_course_id(id)
    {
        return Ok(error_response(StatusCode::BAD_REQUEST, msg));
    }

    let api = service.get_google(request).classroom(&session.access_token);
    match course_progress(api.as_ref(), course_id.as_deref(), service.max_concurrency).await {
        Ok(progress) => Ok(HttpResponse::Ok().json(progress)),
        Err(e) => Ok(failure_response("/api/progress", &e, true)),
    }
}

/// 未指定课程时取第一门进行中的课程；没有课程则返回空表
pub async fn course_progress(
    api: &dyn ClassroomApi,
    course_id: Option<&str>,
    max_concurrency: usize,
) -> Result<CourseProgressResponse> {
    let (course_id, course_name) = match course_id {
        Some(id) => (id.to_string(), None),
        None => match first_course(api).await? {
            Some(course) => (course.id.unwrap_or_default(), course.name),
            None => {
                return Ok(CourseProgressResponse {
                    course_id: None,
                    course_name: None,
                    students: Vec::new(),
                });
            }
        },
    };

    let (students, works) = try_join!(
        api.list_students(&course_id),
        api.list_course_work(&course_id)
    )?;
    let fetched = submissions_by_work(api, &course_id, &works, max_concurrency).await;

    let mut rows: Vec<CourseProgressRow> = students
        .iter()
        .map(|student| progress_row(student, &fetched, works.len()))
        .collect();
    rows.sort_by(|a, b| compare_names(&a.name, &b.name));

    Ok(CourseProgressResponse {
        course_id: Some(course_id),
        course_name,
        students: rows,
    })
}

async fn first_course(api: &dyn ClassroomApi) -> Result<Option<Course>> {
    Ok(active_courses(api)
        .await?
        .into_iter()
        .find(|c| c.id.is_some()))
}

fn progress_row(
    student: &RosterStudent,
    fetched: &[WorkSubmissions<'_>],
    total_tasks: usize,
) -> CourseProgressRow {
    let mut delivered = 0;
    let mut grades = Vec::new();
    let mut last_submission_at: Option<&str> = None;

    for sub in fetched.iter().filter_map(|w| w.for_user(&student.user_id)) {
        if is_delivered_state_ignore_case(&sub.state) {
            delivered += 1;
        }
        if let Some(grade) = sub.assigned_grade.or(sub.draft_grade) {
            grades.push(grade);
        }
        if let Some(t) = sub.activity_time() {
            let newer = match last_submission_at {
                None => true,
                Some(current) => parse_timestamp(t) > parse_timestamp(current),
            };
            if newer {
                last_submission_at = Some(t);
            }
        }
    }

    let progress_pct = if total_tasks > 0 {
        ((delivered as f64 / total_tasks as f64) * 100.0).round() as u32
    } else {
        0
    };
    let average_grade =
        (!grades.is_empty()).then(|| round2(grades.iter().sum::<f64>() / grades.len() as f64));

    CourseProgressRow {
        user_id: student.user_id.clone(),
        name: student.name.clone(),
        progress_pct,
        average_grade,
        last_submission_at: last_submission_at.map(str::to_string),
    }
}
