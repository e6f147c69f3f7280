//! 测试用的内存实现

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{DashboardError, Result};
use crate::models::auth::entities::{GoogleUserInfo, OAuthTokens};
use crate::models::classroom::{
    entities::{
        Announcement, Course, CourseWork, DueDate, RosterStudent, StudentSubmission,
        UserProfile,
    },
    requests::CourseListQuery,
    responses::CurrentUser,
};
use crate::models::reminders::entities::EmailMessage;

use super::{ClassroomApi, GoogleApiFactory, IdentityProvider, MailSender};

#[derive(Default)]
pub struct FakeClassroom {
    pub me: Option<CurrentUser>,
    pub teaching: Vec<Course>,
    pub enrolled: Vec<Course>,
    pub course_work: HashMap<String, Vec<CourseWork>>,
    pub students: HashMap<String, Vec<RosterStudent>>,
    pub submissions: HashMap<(String, String), Vec<StudentSubmission>>,
    pub announcements: HashMap<String, Vec<Announcement>>,
    pub profiles: HashMap<String, UserProfile>,
    /// 这些课程的任何子资源调用都会失败
    pub failing_courses: HashSet<String>,
    pub auth_failure: bool,
    pub submission_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

impl FakeClassroom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_me(mut self, id: &str, name: &str) -> Self {
        self.me = Some(CurrentUser {
            user_id: id.to_string(),
            name: Some(name.to_string()),
            email: None,
        });
        self
    }

    pub fn teaching(mut self, course: Course) -> Self {
        self.teaching.push(course);
        self
    }

    pub fn enrolled(mut self, course: Course) -> Self {
        self.enrolled.push(course);
        self
    }

    pub fn work(mut self, course_id: &str, work: CourseWork) -> Self {
        self.course_work
            .entry(course_id.to_string())
            .or_default()
            .push(work);
        self
    }

    pub fn student(mut self, course_id: &str, student: RosterStudent) -> Self {
        self.students
            .entry(course_id.to_string())
            .or_default()
            .push(student);
        self
    }

    pub fn submission(mut self, submission: StudentSubmission) -> Self {
        self.submissions
            .entry((
                submission.course_id.clone(),
                submission.course_work_id.clone(),
            ))
            .or_default()
            .push(submission);
        self
    }

    pub fn announcement(mut self, announcement: Announcement) -> Self {
        self.announcements
            .entry(announcement.course_id.clone())
            .or_default()
            .push(announcement);
        self
    }

    pub fn profile(mut self, user_id: &str, email: &str) -> Self {
        self.profiles.insert(
            user_id.to_string(),
            UserProfile {
                id: Some(user_id.to_string()),
                email_address: Some(email.to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn failing(mut self, course_id: &str) -> Self {
        self.failing_courses.insert(course_id.to_string());
        self
    }

    pub fn unauthorized(mut self) -> Self {
        self.auth_failure = true;
        self
    }

    fn guard(&self, course_id: &str) -> Result<()> {
        if self.auth_failure {
            return Err(DashboardError::google_auth("token expired"));
        }
        if self.failing_courses.contains(course_id) {
            return Err(DashboardError::google_api(format!(
                "course {course_id} unavailable"
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ClassroomApi for FakeClassroom {
    async fn list_courses(&self, query: &CourseListQuery) -> Result<Vec<Course>> {
        if self.auth_failure {
            return Err(DashboardError::google_auth("token expired"));
        }
        if query.teacher_id.is_some() {
            return Ok(self.teaching.clone());
        }
        if query.student_id.is_some() {
            return Ok(self.enrolled.clone());
        }
        let mut all = self.teaching.clone();
        for course in &self.enrolled {
            if !all.iter().any(|c| c.id == course.id) {
                all.push(course.clone());
            }
        }
        Ok(all)
    }

    async fn list_course_work(&self, course_id: &str) -> Result<Vec<CourseWork>> {
        self.guard(course_id)?;
        Ok(self.course_work.get(course_id).cloned().unwrap_or_default())
    }

    async fn list_students(&self, course_id: &str) -> Result<Vec<RosterStudent>> {
        self.guard(course_id)?;
        Ok(self.students.get(course_id).cloned().unwrap_or_default())
    }

    async fn list_announcements(&self, course_id: &str) -> Result<Vec<Announcement>> {
        self.guard(course_id)?;
        Ok(self
            .announcements
            .get(course_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_submissions(
        &self,
        course_id: &str,
        course_work_id: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<StudentSubmission>> {
        self.guard(course_id)?;
        self.submission_calls.fetch_add(1, Ordering::SeqCst);
        let all = self
            .submissions
            .get(&(course_id.to_string(), course_work_id.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(all
            .into_iter()
            .filter(|s| user_id.is_none() || s.user_id.as_deref() == user_id)
            .collect())
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if user_id == "broken" {
            return Err(DashboardError::google_api("profile lookup failed"));
        }
        Ok(self.profiles.get(user_id).cloned())
    }

    async fn current_user(&self) -> Result<CurrentUser> {
        if self.auth_failure {
            return Err(DashboardError::google_auth("token expired"));
        }
        self.me
            .clone()
            .ok_or_else(|| DashboardError::google_auth("no current user"))
    }
}

/// 记录所有发出的邮件；收件人在 `reject` 中时发送失败
#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub reject: HashSet<String>,
}

impl FakeMailer {
    pub fn rejecting(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MailSender for FakeMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        if message.to.iter().any(|to| self.reject.contains(to)) {
            return Err(DashboardError::mail(format!(
                "rejected {}",
                message.to.join(",")
            )));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(format!("msg-{}", sent.len()))
    }
}

pub struct FakeFactory {
    pub classroom: Arc<FakeClassroom>,
    pub mailer: Arc<FakeMailer>,
}

impl FakeFactory {
    pub fn new(classroom: FakeClassroom) -> Self {
        Self {
            classroom: Arc::new(classroom),
            mailer: Arc::new(FakeMailer::default()),
        }
    }
}

impl GoogleApiFactory for FakeFactory {
    fn classroom(&self, _access_token: &str) -> Arc<dyn ClassroomApi> {
        self.classroom.clone()
    }

    fn gmail(&self, _access_token: &str) -> Arc<dyn MailSender> {
        self.mailer.clone()
    }
}

pub struct FakeIdentity;

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentity {
    fn authorization_url(&self, state: &str) -> Result<String> {
        Ok(format!("https://accounts.example/auth?state={state}"))
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens> {
        if code != "good-code" {
            return Err(DashboardError::google_auth("invalid_grant"));
        }
        Ok(OAuthTokens {
            access_token: "ya29.fake".into(),
            expires_in: Some(3599),
            refresh_token: None,
            scope: None,
            token_type: Some("Bearer".into()),
            id_token: None,
        })
    }

    async fn user_info(&self, _access_token: &str) -> Result<GoogleUserInfo> {
        Ok(GoogleUserInfo {
            sub: "teacher-1".into(),
            email: Some("profesor.garcia@school.edu".into()),
            name: Some("Marta García".into()),
            picture: None,
        })
    }
}

// 构造测试数据的辅助函数

pub fn course(id: &str, name: &str) -> Course {
    Course {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn work(id: &str, title: &str, due: Option<(i32, u32, u32)>) -> CourseWork {
    CourseWork {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        due_date: due.map(|(year, month, day)| DueDate {
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }),
        ..Default::default()
    }
}

pub fn roster(user_id: &str, name: &str, email: Option<&str>) -> RosterStudent {
    RosterStudent {
        user_id: user_id.to_string(),
        name: name.to_string(),
        email: email.map(str::to_string),
    }
}

pub fn submission(course_id: &str, work_id: &str, user_id: &str, state: &str) -> StudentSubmission {
    StudentSubmission {
        id: Some(format!("{work_id}-{user_id}")),
        user_id: Some(user_id.to_string()),
        course_id: course_id.to_string(),
        course_work_id: work_id.to_string(),
        state: state.to_string(),
        ..Default::default()
    }
}
