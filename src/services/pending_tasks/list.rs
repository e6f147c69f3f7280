use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::{future::join_all, try_join};
use std::cmp::Ordering;
use tracing::{error, warn};

use super::PendingTaskService;
use crate::cache::ObjectCache;
use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::entities::{Course, STATE_NOT_SUBMITTED, is_pending_state};
use crate::models::pending_tasks::responses::{PendingStudent, PendingTask, PendingTasksResponse};
use crate::services::classroom::{lookup_email, submissions_by_work, teacher_courses};
use crate::services::context::{
    failure_response, map_bounded, object_cache, require_google_session,
};
use crate::utils::collate::compare_names;

const UNTITLED_TASK: &str = "Tarea sin título";
const UNNAMED_COURSE: &str = "Curso sin nombre";

pub async fn list_pending_tasks(
    service: &PendingTaskService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let api = service.get_google(request).classroom(&session.access_token);
    let cache = object_cache(request);

    match collect_pending_tasks(
        api.as_ref(),
        cache.as_deref(),
        session.user_id(),
        service.max_concurrency,
    )
    .await
    {
        Ok(pending_tasks) => Ok(HttpResponse::Ok().json(PendingTasksResponse { pending_tasks })),
        Err(e) => Ok(failure_response("/api/pending-tasks", &e, true)),
    }
}

/// 收集任教课程中仍有学生未交的作业
pub async fn collect_pending_tasks(
    api: &dyn ClassroomApi,
    cache: Option<&dyn ObjectCache>,
    user_id: &str,
    max_concurrency: usize,
) -> Result<Vec<PendingTask>> {
    let courses = teacher_courses(api, user_id).await?;

    let per_course = join_all(courses.iter().map(|course| async move {
        let course_id = course.id.as_deref()?;
        match course_pending_tasks(api, cache, user_id, course, course_id, max_concurrency).await
        {
            Ok(tasks) => Some(tasks),
            Err(e) => {
                error!("Error processing course {}: {}", course_id, e);
                None
            }
        }
    }))
    .await;

    let mut tasks: Vec<PendingTask> = per_course.into_iter().flatten().flatten().collect();
    tasks.sort_by(compare_tasks);
    Ok(tasks)
}

async fn course_pending_tasks(
    api: &dyn ClassroomApi,
    cache: Option<&dyn ObjectCache>,
    viewer: &str,
    course: &Course,
    course_id: &str,
    max_concurrency: usize,
) -> Result<Vec<PendingTask>> {
    let (works, students) = try_join!(
        api.list_course_work(course_id),
        api.list_students(course_id)
    )?;
    let course_name = course
        .name
        .clone()
        .unwrap_or_else(|| UNNAMED_COURSE.to_string());

    let mut tasks = Vec::new();
    for entry in submissions_by_work(api, course_id, &works, max_concurrency).await {
        if let Err(e) = &entry.result {
            warn!(
                "Error processing coursework {} in course {}: {}",
                entry.work_id, course_id, e
            );
            continue;
        }

        let pending: Vec<_> = students
            .iter()
            .map(|student| (student, entry.for_user(&student.user_id)))
            .filter(|(_, own)| is_pending_state(own.map(|s| s.state.as_str())))
            .collect();
        if pending.is_empty() {
            continue;
        }

        let pending_students = map_bounded(pending, max_concurrency, |(student, own)| async move {
            let email = match &student.email {
                Some(email) => Some(email.clone()),
                None => lookup_email(api, cache, viewer, &student.user_id).await,
            };
            PendingStudent {
                user_id: student.user_id.clone(),
                name: student.name.clone(),
                email: email.unwrap_or_default(),
                submission_state: own
                    .map(|s| s.state.clone())
                    .unwrap_or_else(|| STATE_NOT_SUBMITTED.to_string()),
            }
        })
        .await;

        tasks.push(PendingTask {
            course_id: course_id.to_string(),
            course_name: course_name.clone(),
            task_id: entry.work_id.to_string(),
            task_title: entry
                .work
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED_TASK.to_string()),
            task_description: entry.work.description.clone().filter(|d| !d.is_empty()),
            due_date: entry.work.due_date_string(),
            pending_students,
        });
    }
    Ok(tasks)
}

/// 有截止日期的在前并按日期升序，其余按课程名
fn compare_tasks(a: &PendingTask, b: &PendingTask) -> Ordering {
    match (&a.due_date, &b.due_date) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_names(&a.course_name, &b.course_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::fake::{FakeClassroom, course, roster, submission, work};
    use crate::models::classroom::entities::{
        STATE_CREATED, STATE_RECLAIMED, STATE_TURNED_IN,
    };

    fn owned(id: &str, name: &str) -> Course {
        Course {
            owner_id: Some("t1".into()),
            ..course(id, name)
        }
    }

    fn fixture() -> FakeClassroom {
        FakeClassroom::new()
            .enrolled(owned("c1", "Música"))
            .enrolled(owned("c2", "Algebra"))
            .enrolled(course("c3", "Ajeno"))
            .student("c1", roster("s1", "Ana", Some("ana@school.edu")))
            .student("c1", roster("s2", "Luis", None))
            .student("c1", roster("s3", "Eva", None))
            .profile("s2", "luis@school.edu")
            .work("c1", work("w1", "Ritmo", Some((2025, 5, 10))))
            .work("c1", work("w2", "Escalas", Some((2025, 4, 1))))
            .work("c1", work("w3", "Historia", None))
            .student("c2", roster("s1", "Ana", Some("ana@school.edu")))
            .work("c2", work("w9", "Ecuaciones", None))
            .submission(submission("c1", "w1", "s1", STATE_TURNED_IN))
            .submission(submission("c1", "w1", "s2", STATE_RECLAIMED))
            .submission(submission("c1", "w1", "s3", STATE_CREATED))
            .submission(submission("c1", "w2", "s1", STATE_TURNED_IN))
            .submission(submission("c1", "w2", "s2", STATE_TURNED_IN))
            .submission(submission("c1", "w2", "s3", STATE_TURNED_IN))
            .submission(submission("c3", "w5", "s1", STATE_CREATED))
    }

    #[tokio::test]
    async fn test_collect_pending_tasks() {
        let api = fixture();
        let tasks = collect_pending_tasks(&api, None, "t1", 2).await.unwrap();

        // w2 全部已交，不出现
        let ids: Vec<_> = tasks.iter().map(|t| t.task_id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w9", "w3"]);

        let w1 = &tasks[0];
        assert_eq!(w1.due_date.as_deref(), Some("2025-05-10"));
        assert_eq!(w1.pending_students.len(), 2);
        assert_eq!(w1.pending_students[0].user_id, "s2");
        assert_eq!(w1.pending_students[0].email, "luis@school.edu");
        assert_eq!(w1.pending_students[0].submission_state, STATE_RECLAIMED);
        assert_eq!(w1.pending_students[1].email, "");

        let w3 = &tasks[2];
        assert_eq!(w3.pending_students.len(), 3);
        assert!(
            w3.pending_students
                .iter()
                .all(|s| s.submission_state == STATE_NOT_SUBMITTED)
        );
        assert_eq!(w3.pending_students[0].email, "ana@school.edu");
    }

    #[tokio::test]
    async fn test_undated_tasks_sorted_by_course_name_ignoring_accents() {
        let api = FakeClassroom::new()
            .enrolled(owned("c1", "Zoología"))
            .enrolled(owned("c2", "Álgebra"))
            .enrolled(owned("c3", "biología"))
            .student("c1", roster("s1", "Ana", None))
            .student("c2", roster("s1", "Ana", None))
            .student("c3", roster("s1", "Ana", None))
            .work("c1", work("w1", "Células", None))
            .work("c2", work("w2", "Matrices", None))
            .work("c3", work("w3", "Plantas", None));
        let tasks = collect_pending_tasks(&api, None, "t1", 2).await.unwrap();
        let courses: Vec<_> = tasks.iter().map(|t| t.course_name.as_str()).collect();
        assert_eq!(courses, vec!["Álgebra", "biología", "Zoología"]);
    }

    #[tokio::test]
    async fn test_auth_failure_propagates() {
        let api = fixture().unauthorized();
        let err = collect_pending_tasks(&api, None, "t1", 2).await.unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_failing_course_is_skipped() {
        let api = fixture().failing("c1");
        let tasks = collect_pending_tasks(&api, None, "t1", 2).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].course_name, "Algebra");
    }
}
