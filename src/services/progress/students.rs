//! 教师视角的学生进度

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::{future::join_all, try_join};
use tracing::{error, warn};

use super::ProgressService;
use crate::cache::ObjectCache;
use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::entities::{
    Course, RosterStudent, STATE_NOT_SUBMITTED, StudentSubmission,
};
use crate::models::progress::responses::{
    CourseStudentProgress, StudentProgress, StudentProgressResponse, StudentTaskSubmission,
};
use crate::services::classroom::{
    WorkSubmissions, lookup_email, submissions_by_work, teacher_courses,
};
use crate::services::context::{
    failure_response, map_bounded, object_cache, require_google_session,
};

const UNTITLED_TASK: &str = "Tarea sin título";
const UNNAMED_COURSE: &str = "Curso sin nombre";
/// 作业未设置满分时按 100 计
const DEFAULT_MAX_POINTS: f64 = 100.0;

pub async fn get_student_progress(
    service: &ProgressService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let api = service.get_google(request).classroom(&session.access_token);
    let cache = object_cache(request);

    match student_progress(
        api.as_ref(),
        cache.as_deref(),
        session.user_id(),
        service.max_concurrency,
    )
    .await
    {
        Ok(progress) => Ok(HttpResponse::Ok().json(progress)),
        Err(e) => Ok(failure_response("/api/student-progress", &e, true)),
    }
}

/// 汇总当前教师所有课程中每个学生的完成情况
pub async fn student_progress(
    api: &dyn ClassroomApi,
    cache: Option<&dyn ObjectCache>,
    user_id: &str,
    max_concurrency: usize,
) -> Result<StudentProgressResponse> {
    let courses = teacher_courses(api, user_id).await?;

    let results = join_all(courses.iter().map(|course| async move {
        let course_id = course.id.as_deref()?;
        match course_students(api, cache, user_id, course, course_id, max_concurrency).await {
            Ok(progress) => Some(progress),
            Err(e) => {
                error!("Error processing course {}: {}", course_id, e);
                None
            }
        }
    }))
    .await;
    let courses: Vec<CourseStudentProgress> = results.into_iter().flatten().collect();

    let total_students: usize = courses.iter().map(|c| c.total_students).sum();
    let completion_sum: f64 = courses
        .iter()
        .flat_map(|c| &c.students)
        .map(|s| s.completion_rate)
        .sum();
    let overall_average_completion = if total_students > 0 {
        completion_sum / total_students as f64
    } else {
        0.0
    };

    Ok(StudentProgressResponse {
        courses,
        total_students,
        overall_average_completion,
    })
}

async fn course_students(
    api: &dyn ClassroomApi,
    cache: Option<&dyn ObjectCache>,
    viewer: &str,
    course: &Course,
    course_id: &str,
    max_concurrency: usize,
) -> Result<CourseStudentProgress> {
    let (works, students) = try_join!(
        api.list_course_work(course_id),
        api.list_students(course_id)
    )?;
    let fetched = submissions_by_work(api, course_id, &works, max_concurrency).await;
    for entry in &fetched {
        if let Err(e) = &entry.result {
            warn!("Failed to get submissions for work {}: {}", entry.work_id, e);
        }
    }

    let course_name = course
        .name
        .clone()
        .unwrap_or_else(|| UNNAMED_COURSE.to_string());

    // 花名册没有邮箱时再查用户资料
    let emails = map_bounded(students.clone(), max_concurrency, |student| async move {
        match student.email {
            Some(email) => Some(email),
            None => lookup_email(api, cache, viewer, &student.user_id).await,
        }
    })
    .await;

    let mut progress: Vec<StudentProgress> = students
        .iter()
        .zip(emails)
        .map(|(student, email)| {
            student_row(student, email, course_id, &course_name, &fetched, works.len())
        })
        .collect();
    // 完成率低的排在前面
    progress.sort_by(|a, b| a.completion_rate.total_cmp(&b.completion_rate));

    Ok(CourseStudentProgress {
        course_id: course_id.to_string(),
        course_name,
        section: course.section.clone(),
        total_students: students.len(),
        total_tasks: works.len(),
        students: progress,
    })
}

fn student_row(
    student: &RosterStudent,
    email: Option<String>,
    course_id: &str,
    course_name: &str,
    fetched: &[WorkSubmissions<'_>],
    total_tasks: usize,
) -> StudentProgress {
    let mut submissions = Vec::new();
    let mut completed = 0;
    let mut graded = 0;
    let mut grade_points = 0.0;
    let mut max_points = 0.0;

    // 拉取失败的作业不出现在明细中，但仍计入总数
    for entry in fetched.iter().filter(|w| w.result.is_ok()) {
        let own = entry.for_user(&student.user_id);
        if own.is_some_and(StudentSubmission::is_delivered) {
            completed += 1;
        }
        if let Some(grade) = own
            .filter(|s| s.is_returned())
            .and_then(|s| s.assigned_grade)
        {
            graded += 1;
            grade_points += grade;
            max_points += entry
                .work
                .max_points
                .filter(|p| *p != 0.0)
                .unwrap_or(DEFAULT_MAX_POINTS);
        }

        submissions.push(StudentTaskSubmission {
            task_id: entry.work_id.to_string(),
            task_title: entry
                .work
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED_TASK.to_string()),
            state: own
                .map(|s| s.state.clone())
                .unwrap_or_else(|| STATE_NOT_SUBMITTED.to_string()),
            assigned_grade: own.and_then(|s| s.assigned_grade),
            max_points: entry.work.max_points,
            late: own.and_then(|s| s.late),
            due_date: entry.work.due_date_string(),
            submitted_at: own.and_then(|s| s.update_time.clone()),
        });
    }

    let completion_rate = if total_tasks > 0 {
        completed as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };

    StudentProgress {
        user_id: student.user_id.clone(),
        name: student.name.clone(),
        email,
        course_id: course_id.to_string(),
        course_name: course_name.to_string(),
        total_tasks,
        completed_tasks: completed,
        pending_tasks: total_tasks - completed,
        graded_tasks: graded,
        average_grade: (max_points > 0.0).then(|| grade_points / max_points * 100.0),
        completion_rate,
        submissions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::google::fake::{FakeClassroom, course, roster, submission, work};
    use crate::models::classroom::entities::{DriveFolder, STATE_RETURNED, STATE_TURNED_IN};
    use std::sync::atomic::Ordering;

    fn taught(id: &str, name: &str) -> Course {
        Course {
            teacher_folder: Some(DriveFolder::default()),
            ..course(id, name)
        }
    }

    fn returned(work_id: &str, user: &str, grade: f64) -> StudentSubmission {
        let mut s = submission("c1", work_id, user, STATE_RETURNED);
        s.assigned_grade = Some(grade);
        s
    }

    fn fixture() -> FakeClassroom {
        let mut w1 = work("w1", "Mapa", Some((2025, 4, 1)));
        w1.max_points = Some(10.0);
        let w2 = work("w2", "", None);

        FakeClassroom::new()
            .enrolled(taught("c1", "Geografía"))
            .enrolled(course("c9", "Otra"))
            .student("c1", roster("s1", "Ana", Some("ana@school.edu")))
            .student("c1", roster("s2", "Luis", None))
            .profile("s2", "luis@school.edu")
            .work("c1", w1)
            .work("c1", w2)
            .submission(returned("w1", "s1", 8.0))
            .submission(returned("w2", "s1", 50.0))
            .submission(submission("c1", "w1", "s2", STATE_TURNED_IN))
    }

    #[tokio::test]
    async fn test_student_progress() {
        let api = fixture();
        let cache = MokaCacheWrapper::with_settings(100, 60);
        let result = student_progress(&api, Some(&cache), "t1", 2).await.unwrap();

        // 只统计任教课程
        assert_eq!(result.courses.len(), 1);
        assert_eq!(result.total_students, 2);
        let course = &result.courses[0];
        assert_eq!(course.total_tasks, 2);

        // 按完成率升序
        let luis = &course.students[0];
        assert_eq!(luis.user_id, "s2");
        assert_eq!(luis.email.as_deref(), Some("luis@school.edu"));
        assert_eq!(luis.completed_tasks, 1);
        assert_eq!(luis.pending_tasks, 1);
        assert_eq!(luis.graded_tasks, 0);
        assert_eq!(luis.average_grade, None);
        assert_eq!(luis.completion_rate, 50.0);
        assert_eq!(luis.submissions[1].state, STATE_NOT_SUBMITTED);
        assert_eq!(luis.submissions[1].task_title, UNTITLED_TASK);

        let ana = &course.students[1];
        assert_eq!(ana.completion_rate, 100.0);
        assert_eq!(ana.graded_tasks, 2);
        // (8 + 50) / (10 + 100)
        let expected = 58.0 / 110.0 * 100.0;
        assert!((ana.average_grade.unwrap() - expected).abs() < 1e-9);
        assert_eq!(ana.submissions[0].due_date.as_deref(), Some("2025-04-01"));

        assert_eq!(result.overall_average_completion, 75.0);
        // 花名册里有邮箱的学生不查资料
        assert_eq!(api.profile_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_course_is_skipped() {
        let api = fixture().failing("c1");
        let result = student_progress(&api, None, "t1", 2).await.unwrap();
        assert!(result.courses.is_empty());
        assert_eq!(result.overall_average_completion, 0.0);
    }
}
