pub mod course;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::google::GoogleApiFactory;
use crate::models::classroom::requests::CourseScopedParams;

pub use course::course_progress;
pub use students::student_progress;

pub struct ProgressService {
    google: Option<Arc<dyn GoogleApiFactory>>,
    max_concurrency: usize,
}

impl ProgressService {
    pub fn new_lazy() -> Self {
        Self {
            google: None,
            max_concurrency: AppConfig::get().google.max_concurrency,
        }
    }

    pub(crate) fn get_google(&self, request: &HttpRequest) -> Arc<dyn GoogleApiFactory> {
        match &self.google {
            Some(google) => google.clone(),
            None => super::context::google_factory(request),
        }
    }

    pub async fn get_course_progress(
        &self,
        request: &HttpRequest,
        query: CourseScopedParams,
    ) -> ActixResult<HttpResponse> {
        course::get_course_progress(self, request, query).await
    }

    pub async fn get_student_progress(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        students::get_student_progress(self, request).await
    }
}
