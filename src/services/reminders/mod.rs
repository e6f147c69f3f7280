pub mod batch;
pub mod compose;
pub mod mass;
pub mod single;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::google::GoogleApiFactory;
use crate::models::reminders::requests::{MassReminderRequest, ReminderRequest};

pub use batch::send_batch;

pub struct ReminderService {
    google: Option<Arc<dyn GoogleApiFactory>>,
    send_delay: Duration,
    product_name: String,
}

impl ReminderService {
    pub fn new_lazy() -> Self {
        let config = AppConfig::get();
        Self {
            google: None,
            send_delay: Duration::from_millis(config.gmail.send_delay_ms),
            product_name: config.gmail.product_name.clone(),
        }
    }

    pub(crate) fn get_google(&self, request: &HttpRequest) -> Arc<dyn GoogleApiFactory> {
        match &self.google {
            Some(google) => google.clone(),
            None => super::context::google_factory(request),
        }
    }

    pub async fn send_reminder(
        &self,
        request: &HttpRequest,
        body: ReminderRequest,
    ) -> ActixResult<HttpResponse> {
        single::send_reminder(self, request, body).await
    }

    pub async fn send_mass_reminder(
        &self,
        request: &HttpRequest,
        body: MassReminderRequest,
    ) -> ActixResult<HttpResponse> {
        mass::send_mass_reminder(self, request, body).await
    }
}
