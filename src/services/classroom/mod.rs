pub mod courses;
pub mod profile;
pub mod roles;
pub mod submissions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::google::GoogleApiFactory;

pub use courses::{active_courses, courses_with_roles, teacher_courses};
pub use profile::lookup_email;
pub use roles::user_roles;
pub use submissions::{WorkSubmissions, submissions_by_work};

pub struct ClassroomService {
    google: Option<Arc<dyn GoogleApiFactory>>,
}

impl ClassroomService {
    pub fn new_lazy() -> Self {
        Self { google: None }
    }

    pub(crate) fn get_google(&self, request: &HttpRequest) -> Arc<dyn GoogleApiFactory> {
        match &self.google {
            Some(google) => google.clone(),
            None => super::context::google_factory(request),
        }
    }

    pub async fn list_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        courses::list_courses(self, request).await
    }

    pub async fn get_user_roles(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roles::get_user_roles(self, request).await
    }
}
