use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::time::Duration;
use tracing::{error, info};

use super::ReminderService;
use super::batch::send_batch;
use super::compose::{Signature, summary_message, task_body, task_subject, valid_email};
use crate::errors::{DashboardError, Result};
use crate::google::MailSender;
use crate::models::auth::entities::SessionUser;
use crate::models::common::response::error_response;
use crate::models::reminders::{
    entities::EmailMessage, requests::ReminderRequest, responses::ReminderResponse,
};
use crate::services::context::require_google_session;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const NO_VALID_EMAIL_MESSAGE: &str = "No students with valid email addresses found";

pub async fn send_reminder(
    service: &ReminderService,
    request: &HttpRequest,
    body: ReminderRequest,
) -> ActixResult<HttpResponse> {
    let session = match require_google_session(request) {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };
    let mailer = service.get_google(request).gmail(&session.access_token);
    let signature = Signature {
        name: session.session.user.name.as_deref(),
        product_name: &service.product_name,
    };

    match remind_task(
        mailer.as_ref(),
        &session.session.user,
        signature,
        &body,
        service.send_delay,
    )
    .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(DashboardError::Validation(msg)) => Ok(error_response(StatusCode::BAD_REQUEST, msg)),
        Err(e) => {
            error!("/api/send-reminder error: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.message(),
            ))
        }
    }
}

/// 向同一作业的所有未交学生发送相同的提醒
pub async fn remind_task(
    mailer: &dyn MailSender,
    sender: &SessionUser,
    signature: Signature<'_>,
    task: &ReminderRequest,
    delay: Duration,
) -> Result<ReminderResponse> {
    if task.task_id.is_empty()
        || task.task_title.is_empty()
        || task.course_name.is_empty()
        || task.students.is_empty()
    {
        return Err(DashboardError::validation(MISSING_FIELDS_MESSAGE));
    }

    let recipients: Vec<&str> = task.students.iter().filter_map(valid_email).collect();
    if recipients.is_empty() {
        return Err(DashboardError::validation(NO_VALID_EMAIL_MESSAGE));
    }

    let subject = task_subject(task);
    let body = task_body(task, signature);
    let messages: Vec<EmailMessage> = recipients
        .iter()
        .map(|to| EmailMessage {
            to: vec![to.to_string()],
            subject: subject.clone(),
            body: body.clone(),
            from: sender.email.clone(),
        })
        .collect();

    info!(
        task_title = %task.task_title,
        course_name = %task.course_name,
        recipients = messages.len(),
        "Sending reminder emails"
    );
    let result = send_batch(mailer, &messages, delay).await;
    if result.failed > 0 {
        error!("Some emails failed to send: {:?}", result.errors);
    }

    Ok(ReminderResponse {
        success: result.sent > 0,
        message: summary_message(result.sent, result.failed),
        sent_to: result.sent,
        failed: result.failed,
        skipped: task.students.len() - recipients.len(),
        total_tasks: None,
        errors: result.errors,
    })
}
