pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::google::GoogleApiFactory;

pub use list::collect_pending_tasks;

pub struct PendingTaskService {
    google: Option<Arc<dyn GoogleApiFactory>>,
    max_concurrency: usize,
}

impl PendingTaskService {
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

    pub async fn list_pending_tasks(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_pending_tasks(self, request).await
    }
}
