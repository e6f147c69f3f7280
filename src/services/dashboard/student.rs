//! 学生个人仪表盘

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{error, warn};

use super::DashboardService;
use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::entities::{
    Course, CourseWork, STATE_CREATED, STATE_NEW, STATE_RETURNED, STATE_UNSPECIFIED,
    StudentSubmission,
};
use crate::models::dashboard::{
    entities::AssignmentStatus,
    responses::{
        Assignment, AssignmentFeedback, RecentGrade, StudentCourseProgress, StudentDashboardData,
    },
};
use crate::services::classroom::active_courses;
use crate::services::context::{map_bounded, require_google_session};
use crate::utils::dates::round2;

use super::overview::UNTITLED_TASK;

const UNNAMED_COURSE: &str = "Sin nombre";
const COURSE_AVERAGE_TITLE: &str = "Promedio del curso";
const UPCOMING_COURSES: usize = 3;
const UPCOMING_PER_COURSE: usize = 2;
const UPCOMING_LIMIT: usize = 5;
const RECENT_GRADES_LIMIT: usize = 5;

pub async fn get_student_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let api = service.get_google(request).classroom(&session.access_token);
    let data = student_dashboard(api.as_ref(), service.max_concurrency).await;
    Ok(HttpResponse::Ok().json(data))
}

/// 单门课程的数据，进度与待办共用
struct CourseSnapshot {
    progress: StudentCourseProgress,
    works: Vec<CourseWork>,
    own: HashMap<String, StudentSubmission>,
}

/// 任何顶层失败都返回空结构
pub async fn student_dashboard(
    api: &dyn ClassroomApi,
    max_concurrency: usize,
) -> StudentDashboardData {
    match try_student_dashboard(api, max_concurrency).await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to get student dashboard data: {}", e);
            StudentDashboardData::default()
        }
    }
}

async fn try_student_dashboard(
    api: &dyn ClassroomApi,
    max_concurrency: usize,
) -> Result<StudentDashboardData> {
    let me = api.current_user().await?;
    let courses = active_courses(api).await?;
    let user_id = me.user_id.as_str();

    let snapshots: Vec<Option<CourseSnapshot>> =
        futures_util::future::join_all(courses.iter().map(|course| async move {
            let course_id = course.id.as_deref()?;
            Some(snapshot_course(api, course, course_id, user_id, max_concurrency).await)
        }))
        .await;

    let total_assignments: usize = snapshots
        .iter()
        .flatten()
        .map(|s| s.progress.total_assignments)
        .sum();
    let completed_assignments: usize = snapshots
        .iter()
        .flatten()
        .map(|s| s.progress.completed_assignments)
        .sum();
    let overall_progress = percent(completed_assignments, total_assignments);

    let mut upcoming = Vec::new();
    for (course, snapshot) in courses.iter().zip(&snapshots).take(UPCOMING_COURSES) {
        let (Some(course_id), Some(snapshot)) = (course.id.as_deref(), snapshot) else {
            continue;
        };
        for work in snapshot.works.iter().take(UPCOMING_PER_COURSE) {
            let Some(work_id) = work.id.as_deref() else {
                continue;
            };
            upcoming.push(to_assignment(
                course,
                course_id,
                work,
                work_id,
                snapshot.own.get(work_id),
            ));
        }
    }
    // 有截止日期的在前，按日期升序
    upcoming.sort_by(|a, b| match (&a.due_date, &b.due_date) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    upcoming.truncate(UPCOMING_LIMIT);

    let course_progress: Vec<StudentCourseProgress> =
        snapshots.into_iter().flatten().map(|s| s.progress).collect();

    let now = Utc::now();
    let recent_grades = course_progress
        .iter()
        .filter_map(|cp| {
            cp.average_grade.map(|grade| RecentGrade {
                course_name: cp.course_name.clone(),
                grade,
                assignment_title: COURSE_AVERAGE_TITLE.to_string(),
                date: now,
            })
        })
        .take(RECENT_GRADES_LIMIT)
        .collect();

    Ok(StudentDashboardData {
        overall_progress,
        courses: course_progress,
        upcoming_assignments: upcoming,
        recent_grades,
        total_courses: courses.len(),
        total_assignments,
        completed_assignments,
    })
}

async fn snapshot_course(
    api: &dyn ClassroomApi,
    course: &Course,
    course_id: &str,
    user_id: &str,
    max_concurrency: usize,
) -> CourseSnapshot {
    let course_name = course
        .name
        .clone()
        .unwrap_or_else(|| UNNAMED_COURSE.to_string());

    let works = match api.list_course_work(course_id).await {
        Ok(works) => works,
        Err(e) => {
            warn!("Failed to get progress for course {}: {}", course_id, e);
            return CourseSnapshot {
                progress: StudentCourseProgress {
                    course_id: course_id.to_string(),
                    course_name,
                    progress_percent: 0,
                    total_assignments: 0,
                    completed_assignments: 0,
                    average_grade: None,
                    alternate_link: None,
                },
                works: Vec::new(),
                own: HashMap::new(),
            };
        }
    };

    if works.is_empty() {
        return CourseSnapshot {
            progress: StudentCourseProgress {
                course_id: course_id.to_string(),
                course_name,
                progress_percent: 100,
                total_assignments: 0,
                completed_assignments: 0,
                average_grade: None,
                alternate_link: None,
            },
            works,
            own: HashMap::new(),
        };
    }

    let with_ids: Vec<String> = works.iter().filter_map(|w| w.id.clone()).collect();
    let fetched = map_bounded(with_ids, max_concurrency, |work_id| async move {
        let result = api
            .list_submissions(course_id, &work_id, Some(user_id))
            .await;
        (work_id, result)
    })
    .await;

    let mut own = HashMap::new();
    for (work_id, result) in fetched {
        match result {
            Ok(submissions) => {
                if let Some(sub) = submissions
                    .into_iter()
                    .find(|s| s.user_id.as_deref() == Some(user_id))
                {
                    own.insert(work_id, sub);
                }
            }
            Err(e) => warn!("Failed to get submissions for assignment {}: {}", work_id, e),
        }
    }

    let completed = own.values().filter(|s| s.is_delivered()).count();
    let grades: Vec<f64> = own.values().filter_map(|s| s.assigned_grade).collect();
    let average_grade =
        (!grades.is_empty()).then(|| round2(grades.iter().sum::<f64>() / grades.len() as f64));

    CourseSnapshot {
        progress: StudentCourseProgress {
            course_id: course_id.to_string(),
            course_name,
            progress_percent: percent(completed, works.len()),
            total_assignments: works.len(),
            completed_assignments: completed,
            average_grade,
            alternate_link: course.alternate_link.clone(),
        },
        works,
        own,
    }
}

fn to_assignment(
    course: &Course,
    course_id: &str,
    work: &CourseWork,
    work_id: &str,
    submission: Option<&StudentSubmission>,
) -> Assignment {
    Assignment {
        id: work_id.to_string(),
        title: work
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED_TASK.to_string()),
        course_id: course_id.to_string(),
        course_name: course
            .name
            .clone()
            .unwrap_or_else(|| UNNAMED_COURSE.to_string()),
        due_date: work.due_date_string(),
        status: assignment_status(submission),
        submission_state: Some(
            submission
                .map(|s| s.state.clone())
                .unwrap_or_else(|| STATE_NEW.to_string()),
        ),
        alternate_link: work.alternate_link.clone(),
        feedback: submission
            .filter(|s| s.id.is_some())
            .map(feedback_for),
    }
}

pub fn assignment_status(submission: Option<&StudentSubmission>) -> AssignmentStatus {
    let Some(submission) = submission else {
        return AssignmentStatus::Pending;
    };
    if submission.is_delivered() {
        return AssignmentStatus::Submitted;
    }
    match submission.state.as_str() {
        STATE_NEW | STATE_CREATED | STATE_UNSPECIFIED if submission.late == Some(true) => {
            AssignmentStatus::Late
        }
        _ => AssignmentStatus::Pending,
    }
}

/// 由提交记录推导反馈状态
pub fn feedback_for(submission: &StudentSubmission) -> AssignmentFeedback {
    let has_grade = submission.assigned_grade.is_some();
    let is_returned = submission.is_returned();
    let return_time = if is_returned {
        submission
            .submission_history
            .iter()
            .flatten()
            .filter_map(|h| h.state_history.as_ref())
            .filter(|sh| sh.state.as_deref() == Some(STATE_RETURNED))
            .filter_map(|sh| sh.state_timestamp.clone())
            .next_back()
            .or_else(|| submission.update_time.clone())
    } else {
        None
    };

    AssignmentFeedback {
        has_grade,
        assigned_grade: submission.assigned_grade,
        is_returned,
        return_time,
        feedback_available: is_returned || has_grade,
        needs_attention: is_returned && !has_grade,
    }
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::fake::{FakeClassroom, course, submission, work};
    use crate::models::classroom::entities::{
        STATE_RECLAIMED, STATE_TURNED_IN, StateHistory, SubmissionHistory,
    };

    fn graded(course_id: &str, work_id: &str, grade: f64, state: &str) -> StudentSubmission {
        let mut s = submission(course_id, work_id, "me", state);
        s.assigned_grade = Some(grade);
        s
    }

    #[tokio::test]
    async fn test_student_dashboard() {
        let api = FakeClassroom::new()
            .with_me("me", "Ana")
            .enrolled(course("c1", "Biología"))
            .enrolled(course("c2", "Arte"))
            .work("c1", work("w1", "Célula", Some((2025, 5, 2))))
            .work("c1", work("w2", "Mitosis", Some((2025, 4, 20))))
            .work("c1", work("w3", "ADN", None))
            .submission(graded("c1", "w1", 8.0, STATE_RETURNED))
            .submission(graded("c1", "w2", 9.5, STATE_TURNED_IN))
            .submission(submission("c1", "w2", "other", STATE_TURNED_IN));

        let data = student_dashboard(&api, 2).await;
        assert_eq!(data.total_courses, 2);
        assert_eq!(data.courses.len(), 2);

        let c1 = &data.courses[0];
        assert_eq!(c1.total_assignments, 3);
        assert_eq!(c1.completed_assignments, 2);
        assert_eq!(c1.progress_percent, 67);
        assert_eq!(c1.average_grade, Some(8.75));

        // 没有作业的课程视为完成
        let c2 = &data.courses[1];
        assert_eq!(c2.progress_percent, 100);
        assert_eq!(c2.total_assignments, 0);

        assert_eq!(data.total_assignments, 3);
        assert_eq!(data.completed_assignments, 2);
        assert_eq!(data.overall_progress, 67);

        // 每门课只取前两个作业，按截止日期排序
        let ids: Vec<_> = data.upcoming_assignments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w1"]);
        assert_eq!(data.upcoming_assignments[0].status, AssignmentStatus::Submitted);

        assert_eq!(data.recent_grades.len(), 1);
        assert_eq!(data.recent_grades[0].assignment_title, COURSE_AVERAGE_TITLE);
        assert_eq!(data.recent_grades[0].grade, 8.75);
    }

    #[tokio::test]
    async fn test_failure_returns_empty_structure() {
        let api = FakeClassroom::new().with_me("me", "Ana").unauthorized();
        let data = student_dashboard(&api, 2).await;
        assert_eq!(data.total_courses, 0);
        assert!(data.courses.is_empty());
        assert_eq!(data.overall_progress, 0);
    }

    #[tokio::test]
    async fn test_failing_course_is_zeroed() {
        let api = FakeClassroom::new()
            .with_me("me", "Ana")
            .enrolled(course("c1", "Biología"))
            .failing("c1");
        let data = student_dashboard(&api, 2).await;
        assert_eq!(data.courses[0].progress_percent, 0);
        assert!(data.upcoming_assignments.is_empty());
    }

    #[test]
    fn test_assignment_status() {
        assert_eq!(assignment_status(None), AssignmentStatus::Pending);

        let mut s = submission("c", "w", "me", STATE_CREATED);
        assert_eq!(assignment_status(Some(&s)), AssignmentStatus::Pending);
        s.late = Some(true);
        assert_eq!(assignment_status(Some(&s)), AssignmentStatus::Late);

        s.state = STATE_RECLAIMED.to_string();
        assert_eq!(assignment_status(Some(&s)), AssignmentStatus::Pending);

        s.state = STATE_RETURNED.to_string();
        assert_eq!(assignment_status(Some(&s)), AssignmentStatus::Submitted);
    }

    #[test]
    fn test_feedback_returned_without_grade_needs_attention() {
        let mut s = submission("c", "w", "me", STATE_RETURNED);
        s.submission_history = Some(vec![
            SubmissionHistory {
                state_history: Some(StateHistory {
                    state: Some(STATE_TURNED_IN.into()),
                    state_timestamp: Some("2025-03-01T10:00:00Z".into()),
                    actor_user_id: None,
                }),
            },
            SubmissionHistory {
                state_history: Some(StateHistory {
                    state: Some(STATE_RETURNED.into()),
                    state_timestamp: Some("2025-03-03T09:00:00Z".into()),
                    actor_user_id: None,
                }),
            },
        ]);

        let feedback = feedback_for(&s);
        assert!(feedback.is_returned);
        assert!(!feedback.has_grade);
        assert!(feedback.needs_attention);
        assert!(feedback.feedback_available);
        assert_eq!(feedback.return_time.as_deref(), Some("2025-03-03T09:00:00Z"));
    }
}
