use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::try_join;
use std::collections::HashSet;

use super::ClassroomService;
use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::{
    entities::Course, requests::CourseListQuery, responses::CoursesResponse,
};
use crate::models::dashboard::entities::CourseRole;
use crate::services::context::{failure_response, require_google_session};

pub async fn list_courses(
    service: &ClassroomService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let api = service.get_google(request).classroom(&session.access_token);

    match active_courses(api.as_ref()).await {
        Ok(courses) => Ok(HttpResponse::Ok().json(CoursesResponse { courses })),
        Err(e) => Ok(failure_response("/api/classroom", &e, false)),
    }
}

/// 当前用户所有 ACTIVE 课程
pub async fn active_courses(api: &dyn ClassroomApi) -> Result<Vec<Course>> {
    api.list_courses(&CourseListQuery::active()).await
}

/// 当前用户任教的课程：有教师目录或 ownerId 为本人
pub async fn teacher_courses(api: &dyn ClassroomApi, user_id: &str) -> Result<Vec<Course>> {
    Ok(active_courses(api)
        .await?
        .into_iter()
        .filter(|course| course.id.is_some() && course.is_taught_by(user_id))
        .collect())
}

/// 带身份的课程列表，同一课程同时出现时以教师身份为准
pub async fn courses_with_roles(api: &dyn ClassroomApi) -> Result<Vec<(Course, CourseRole)>> {
    let teaching_query = CourseListQuery::teaching();
    let enrolled_query = CourseListQuery::enrolled();
    let (teaching, enrolled) = try_join!(
        api.list_courses(&teaching_query),
        api.list_courses(&enrolled_query)
    )?;

    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(teaching.len() + enrolled.len());
    let tagged = teaching
        .into_iter()
        .map(|c| (c, CourseRole::Teacher))
        .chain(enrolled.into_iter().map(|c| (c, CourseRole::Student)));

    for (course, role) in tagged {
        let Some(id) = course.id.clone() else {
            continue;
        };
        if seen.insert(id) {
            result.push((course, role));
        }
    }
    Ok(result)
}
