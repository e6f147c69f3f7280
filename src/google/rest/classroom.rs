//! Classroom v1 REST 客户端

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::{
    entities::{Announcement, Course, CourseWork, RosterStudent, StudentSubmission, UserProfile},
    requests::CourseListQuery,
    responses::{
        CurrentUser, ListAnnouncementsPage, ListCourseWorkPage, ListCoursesPage,
        ListStudentsPage, ListSubmissionsPage, Paginated,
    },
};

use super::{check_status, status_error};

// 防止服务端反复返回相同 pageToken 造成死循环
const MAX_PAGES: usize = 500;

pub struct RestClassroomClient {
    http: Client,
    base_url: String,
    access_token: String,
    page_size: u32,
}

impl RestClassroomClient {
    pub fn new(http: Client, base_url: &str, access_token: &str, page_size: u32) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            page_size,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 循环读取 nextPageToken 直到取完
    async fn list_all<P>(&self, path: &str, params: &[(&str, String)], context: &str) -> Result<Vec<P::Item>>
    where
        P: Paginated + DeserializeOwned,
    {
        let url = self.url(path);
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        for page_index in 0..MAX_PAGES {
            let mut query: Vec<(&str, String)> = params.to_vec();
            query.push(("pageSize", self.page_size.to_string()));
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&query)
                .send()
                .await?;
            let page: P = check_status(response, context).await?.json().await?;
            let (mut page_items, next) = page.into_parts();
            debug!(
                "{} page {} returned {} items",
                context,
                page_index + 1,
                page_items.len()
            );
            items.append(&mut page_items);

            match next {
                Some(token) if page_token.as_deref() != Some(token.as_str()) => {
                    page_token = Some(token)
                }
                Some(_) => {
                    warn!("{} returned a repeated page token, stopping", context);
                    break;
                }
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait::async_trait]
impl ClassroomApi for RestClassroomClient {
    async fn list_courses(&self, query: &CourseListQuery) -> Result<Vec<Course>> {
        let mut params = Vec::new();
        if let Some(teacher) = &query.teacher_id {
            params.push(("teacherId", teacher.clone()));
        }
        if let Some(student) = &query.student_id {
            params.push(("studentId", student.clone()));
        }
        for state in &query.course_states {
            params.push(("courseStates", state.clone()));
        }
        self.list_all::<ListCoursesPage>("courses", &params, "courses.list")
            .await
    }

    async fn list_course_work(&self, course_id: &str) -> Result<Vec<CourseWork>> {
        let path = format!("courses/{course_id}/courseWork");
        self.list_all::<ListCourseWorkPage>(&path, &[], "courseWork.list")
            .await
    }

    async fn list_students(&self, course_id: &str) -> Result<Vec<RosterStudent>> {
        let path = format!("courses/{course_id}/students");
        let students = self
            .list_all::<ListStudentsPage>(&path, &[], "students.list")
            .await?;
        Ok(students
            .into_iter()
            .filter_map(RosterStudent::from_student)
            .collect())
    }

    async fn list_announcements(&self, course_id: &str) -> Result<Vec<Announcement>> {
        let path = format!("courses/{course_id}/announcements");
        let announcements = self
            .list_all::<ListAnnouncementsPage>(&path, &[], "announcements.list")
            .await?;
        Ok(announcements
            .into_iter()
            .map(|mut a| {
                if a.course_id.is_empty() {
                    a.course_id = course_id.to_string();
                }
                a
            })
            .collect())
    }

    async fn list_submissions(
        &self,
        course_id: &str,
        course_work_id: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<StudentSubmission>> {
        let path = format!("courses/{course_id}/courseWork/{course_work_id}/studentSubmissions");
        let params: Vec<(&str, String)> = user_id
            .map(|id| vec![("userId", id.to_string())])
            .unwrap_or_default();
        let submissions = self
            .list_all::<ListSubmissionsPage>(&path, &params, "studentSubmissions.list")
            .await?;
        Ok(submissions
            .into_iter()
            .map(|s| s.normalized(course_id, course_work_id))
            .collect())
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let response = self
            .http
            .get(self.url(&format!("userProfiles/{user_id}")))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let profile = check_status(response, "userProfiles.get").await?.json().await?;
        Ok(Some(profile))
    }

    async fn current_user(&self) -> Result<CurrentUser> {
        let profile = self
            .get_user_profile("me")
            .await?
            .and_then(CurrentUser::from_profile);
        profile.ok_or_else(|| {
            status_error(StatusCode::UNAUTHORIZED, "userProfiles.get(me)", "no profile")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = RestClassroomClient::new(
            Client::new(),
            "https://classroom.googleapis.com/v1/",
            "token",
            100,
        );
        assert_eq!(
            client.url("/courses/1/students"),
            "https://classroom.googleapis.com/v1/courses/1/students"
        );
    }
}
