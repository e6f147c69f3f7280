use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassroomService, active_courses};
use crate::errors::Result;
use crate::google::ClassroomApi;
use crate::models::classroom::responses::RolesResponse;
use crate::models::dashboard::entities::CourseRole;
use crate::services::context::{failure_response, require_google_session};

pub async fn get_user_roles(
    service: &ClassroomService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let api = service.get_google(request).classroom(&session.access_token);

    match user_roles(api.as_ref(), session.user_id()).await {
        Ok(roles) => Ok(HttpResponse::Ok().json(RolesResponse { roles })),
        Err(e) => Ok(failure_response("/api/user", &e, true)),
    }
}

/// 拥有任一课程为 teacher，有任何课程为 student
pub async fn user_roles(api: &dyn ClassroomApi, user_id: &str) -> Result<Vec<String>> {
    let courses = active_courses(api).await?;

    let mut roles = Vec::with_capacity(2);
    if courses
        .iter()
        .any(|c| c.owner_id.as_deref() == Some(user_id))
    {
        roles.push(CourseRole::Teacher.as_str().to_string());
    }
    if !courses.is_empty() {
        roles.push(CourseRole::Student.as_str().to_string());
    }
    Ok(roles)
}
