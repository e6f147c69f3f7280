//! 教师/学生混合仪表盘
//!
//! 课程 → 作业 → 提交逐层展开，统计每个作业的提交情况；
//! 学生课程额外附带本人的提交记录。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{debug, warn};

use super::DashboardService;
use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::entities::{
    Course, CourseWork, StudentSubmission, is_delivered_state,
};
use crate::models::common::response::error_response;
use crate::models::dashboard::{
    entities::CourseRole,
    responses::{
        CourseWorkWithSubmissions, DashboardCourse, DashboardOverview, StateHistoryEntry,
        SubmissionHistoryEntry, UserSubmission,
    },
};
use crate::services::classroom::courses_with_roles;
use crate::services::context::{failure_response, map_bounded, require_google_session};

pub const UNTITLED_TASK: &str = "Tarea sin título";
pub const UNNAMED_COURSE: &str = "Curso sin nombre";

pub async fn get_overview(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    if session.user_id().is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            "Missing user email in session",
        ));
    }

    let api = service.get_google(request).classroom(&session.access_token);
    match build_overview(api.as_ref(), session.user_id(), service.max_concurrency).await {
        Ok(overview) => Ok(HttpResponse::Ok().json(overview)),
        Err(e) => Ok(failure_response("/api/dashboard", &e, true)),
    }
}

/// 汇总用户全部课程
pub async fn build_overview(
    api: &dyn ClassroomApi,
    user_id: &str,
    max_concurrency: usize,
) -> Result<DashboardOverview> {
    let courses = courses_with_roles(api).await?;
    debug!("Building dashboard for {} courses", courses.len());

    let summaries = map_bounded(courses, max_concurrency, |(course, role)| async move {
        let course_id = course.id.clone().unwrap_or_default();
        match summarize_course(api, course, role, user_id, max_concurrency).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Error processing course {}: {}", course_id, e);
                None
            }
        }
    })
    .await;

    let mut overview = DashboardOverview::default();
    for course in summaries.into_iter().flatten() {
        overview.total_assignments += course.total_assignments;
        overview.completed_assignments += course.completed_assignments;
        overview.pending_assignments += course.pending_assignments;
        match course.role {
            CourseRole::Teacher => overview.teacher_courses.push(course),
            CourseRole::Student => overview.student_courses.push(course),
        }
    }
    overview.total_courses = overview.teacher_courses.len() + overview.student_courses.len();
    Ok(overview)
}

async fn summarize_course(
    api: &dyn ClassroomApi,
    course: Course,
    role: CourseRole,
    user_id: &str,
    max_concurrency: usize,
) -> Result<DashboardCourse> {
    let course_id = course.id.clone().unwrap_or_default();
    let works: Vec<CourseWork> = api
        .list_course_work(&course_id)
        .await?
        .into_iter()
        .filter(|w| w.id.is_some())
        .collect();

    // 每个作业只取一次全部提交
    let course_id_ref = course_id.as_str();
    let fetched = map_bounded(works, max_concurrency, |work| async move {
        let work_id = work.id.clone().unwrap_or_default();
        let submissions = api.list_submissions(course_id_ref, &work_id, None).await;
        (work, submissions)
    })
    .await;

    let mut course_work = Vec::with_capacity(fetched.len());
    for (work, submissions) in fetched {
        match submissions {
            Ok(submissions) => {
                let own = (role == CourseRole::Student)
                    .then(|| {
                        submissions
                            .iter()
                            .find(|s| s.user_id.as_deref() == Some(user_id))
                    })
                    .flatten()
                    .map(to_user_submission);
                course_work.push(with_submission_counts(work, &submissions, own));
            }
            Err(e) => warn!(
                "Error processing courseWork {}: {}",
                work.id.as_deref().unwrap_or_default(),
                e
            ),
        }
    }

    let total_assignments = course_work.len();
    let (completed_assignments, pending_assignments) = match role {
        CourseRole::Student => {
            let completed = course_work
                .iter()
                .filter(|cw| {
                    cw.user_submission
                        .as_ref()
                        .is_some_and(|s| is_delivered_state(&s.state))
                })
                .count();
            (completed, total_assignments - completed)
        }
        CourseRole::Teacher => course_work.iter().fold((0, 0), |(done, pending), cw| {
            (
                done + cw.turned_in_submissions,
                pending + (cw.total_submissions - cw.turned_in_submissions),
            )
        }),
    };

    Ok(DashboardCourse {
        id: course_id,
        name: course.name.unwrap_or_else(|| UNNAMED_COURSE.to_string()),
        section: course.section,
        description: course.description,
        room: course.room,
        alternate_link: course.alternate_link,
        role,
        course_work,
        total_assignments,
        completed_assignments,
        pending_assignments,
    })
}

fn with_submission_counts(
    work: CourseWork,
    submissions: &[StudentSubmission],
    user_submission: Option<UserSubmission>,
) -> CourseWorkWithSubmissions {
    let turned_in = submissions.iter().filter(|s| s.is_delivered()).count();
    let graded = submissions.iter().filter(|s| s.is_returned()).count();

    CourseWorkWithSubmissions {
        id: work.id.unwrap_or_default(),
        title: work
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED_TASK.to_string()),
        description: work.description.filter(|d| !d.is_empty()),
        materials: work.materials,
        state: work.state,
        alternate_link: work.alternate_link,
        creation_time: work.creation_time,
        update_time: work.update_time,
        due_date: work.due_date,
        due_time: work.due_time,
        max_points: work.max_points.filter(|p| *p != 0.0),
        work_type: work.work_type,
        submission_modification_mode: work.submission_modification_mode,
        total_submissions: submissions.len(),
        turned_in_submissions: turned_in,
        graded_submissions: graded,
        user_submission,
    }
}

fn to_user_submission(submission: &StudentSubmission) -> UserSubmission {
    UserSubmission {
        id: submission.id.clone().unwrap_or_default(),
        state: submission.state.clone(),
        update_time: submission.update_time.clone(),
        submission_history: submission.submission_history.as_ref().map(|history| {
            history
                .iter()
                .map(|h| SubmissionHistoryEntry {
                    state_history: h.state_history.as_ref().map(|sh| StateHistoryEntry {
                        state: sh.state.clone(),
                        state_timestamp: sh.state_timestamp.clone(),
                        actor_user_id: sh.actor_user_id.clone(),
                    }),
                })
                .collect()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::fake::{FakeClassroom, course, submission, work};
    use crate::models::classroom::entities::{
        STATE_CREATED, STATE_RETURNED, STATE_TURNED_IN,
    };
    use std::sync::atomic::Ordering;

    fn fixture() -> FakeClassroom {
        FakeClassroom::new()
            .teaching(course("t1", "Matemáticas"))
            .enrolled(course("s1", "Literatura"))
            .work("t1", work("w1", "Ecuaciones", Some((2025, 3, 10))))
            .work("t1", work("w2", "", None))
            .submission(submission("t1", "w1", "a", STATE_TURNED_IN))
            .submission(submission("t1", "w1", "b", STATE_RETURNED))
            .submission(submission("t1", "w1", "c", STATE_CREATED))
            .submission(submission("t1", "w2", "a", STATE_CREATED))
            .work("s1", work("w3", "Ensayo", None))
            .work("s1", work("w4", "Poema", None))
            .submission(submission("s1", "w3", "me", STATE_TURNED_IN))
            .submission(submission("s1", "w3", "other", STATE_CREATED))
            .submission(submission("s1", "w4", "other", STATE_RETURNED))
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let api = fixture();
        let overview = build_overview(&api, "me", 2).await.unwrap();

        assert_eq!(overview.total_courses, 2);
        let teacher = &overview.teacher_courses[0];
        assert_eq!(teacher.role, CourseRole::Teacher);
        assert_eq!(teacher.course_work[0].total_submissions, 3);
        assert_eq!(teacher.course_work[0].turned_in_submissions, 2);
        assert_eq!(teacher.course_work[0].graded_submissions, 1);
        assert_eq!(teacher.course_work[1].title, UNTITLED_TASK);
        // 教师：已交 2，未交 1 + 1
        assert_eq!(teacher.completed_assignments, 2);
        assert_eq!(teacher.pending_assignments, 2);

        let student = &overview.student_courses[0];
        assert_eq!(student.total_assignments, 2);
        assert_eq!(student.completed_assignments, 1);
        assert_eq!(student.pending_assignments, 1);
        assert_eq!(
            student.course_work[0].user_submission.as_ref().unwrap().state,
            STATE_TURNED_IN
        );
        assert!(student.course_work[1].user_submission.is_none());
        assert!(teacher.course_work[0].user_submission.is_none());

        assert_eq!(overview.total_assignments, 4);
        assert_eq!(overview.completed_assignments, 3);
        assert_eq!(overview.pending_assignments, 3);

        // 每个作业只请求一次提交列表
        assert_eq!(api.submission_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_failing_course_is_skipped() {
        let api = fixture().failing("s1");
        let overview = build_overview(&api, "me", 4).await.unwrap();
        assert_eq!(overview.total_courses, 1);
        assert!(overview.student_courses.is_empty());
    }

    #[tokio::test]
    async fn test_auth_failure_is_top_level_error() {
        let api = fixture().unauthorized();
        let err = build_overview(&api, "me", 4).await.unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_zero_max_points_omitted() {
        let mut w = work("w1", "Quiz", None);
        w.max_points = Some(0.0);
        assert!(with_submission_counts(w, &[], None).max_points.is_none());
    }
}
