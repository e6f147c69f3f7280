pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::google::GoogleApiFactory;

pub use list::course_announcements;

pub struct NotificationService {
    google: Option<Arc<dyn GoogleApiFactory>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { google: None }
    }

    pub(crate) fn get_google(&self, request: &HttpRequest) -> Arc<dyn GoogleApiFactory> {
        match &self.google {
            Some(google) => google.clone(),
            None => super::context::google_factory(request),
        }
    }

    pub async fn list_notifications(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_notifications(self, request).await
    }
}
