pub mod weekly;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::google::GoogleApiFactory;
use crate::models::classroom::requests::CourseScopedParams;

pub use weekly::course_metrics;

pub struct MetricsService {
    google: Option<Arc<dyn GoogleApiFactory>>,
    max_concurrency: usize,
}

impl MetricsService {
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

    pub async fn get_metrics(
        &self,
        request: &HttpRequest,
        query: CourseScopedParams,
    ) -> ActixResult<HttpResponse> {
        weekly::get_metrics(self, request, query).await
    }
}
