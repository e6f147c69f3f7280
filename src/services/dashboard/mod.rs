pub mod overview;
pub mod student;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::google::GoogleApiFactory;

pub use overview::build_overview;
pub use student::student_dashboard;

pub struct DashboardService {
    google: Option<Arc<dyn GoogleApiFactory>>,
    max_concurrency: usize,
}

impl DashboardService {
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

    pub async fn get_overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::get_overview(self, request).await
    }

    pub async fn get_student_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::get_student_dashboard(self, request).await
    }
}
