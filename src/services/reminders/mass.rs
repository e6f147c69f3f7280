use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::time::Duration;
use tracing::{error, info};

use super::ReminderService;
use super::batch::send_batch;
use super::compose::{Signature, group_by_student, student_body, student_subject, summary_message};
use super::single::NO_VALID_EMAIL_MESSAGE;
use crate::errors::{DashboardError, Result};
use crate::google::MailSender;
use crate::models::auth::entities::SessionUser;
use crate::models::common::response::error_response;
use crate::models::reminders::{
    entities::EmailMessage, requests::MassReminderRequest, responses::ReminderResponse,
};
use crate::services::context::require_google_session;

pub const NO_TASKS_MESSAGE: &str = "No tasks provided";

pub async fn send_mass_reminder(
    service: &ReminderService,
    request: &HttpRequest,
    body: MassReminderRequest,
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

    match remind_students(
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
            error!("/api/send-mass-reminder error: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.message(),
            ))
        }
    }
}

/// 每个学生一封邮件，列出其在所有作业中的待办
pub async fn remind_students(
    mailer: &dyn MailSender,
    sender: &SessionUser,
    signature: Signature<'_>,
    body: &MassReminderRequest,
    delay: Duration,
) -> Result<ReminderResponse> {
    if body.tasks.is_empty() {
        return Err(DashboardError::validation(NO_TASKS_MESSAGE));
    }

    let (students, with_email) = group_by_student(&body.tasks);
    if students.is_empty() {
        return Err(DashboardError::validation(NO_VALID_EMAIL_MESSAGE));
    }

    let messages: Vec<EmailMessage> = students
        .iter()
        .map(|student| EmailMessage {
            to: vec![student.email.clone()],
            subject: student_subject(student),
            body: student_body(student, signature),
            from: sender.email.clone(),
        })
        .collect();

    info!(
        total_tasks = body.tasks.len(),
        total_students = students.len(),
        "Sending mass reminder emails"
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
        // 同一学生出现在多个作业中只发一封
        skipped: with_email - students.len(),
        total_tasks: Some(body.tasks.len()),
        errors: result.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::fake::FakeMailer;
    use crate::models::auth::entities::SessionRole;
    use crate::models::reminders::requests::{ReminderRequest, ReminderStudent};

    fn teacher() -> SessionUser {
        SessionUser {
            id: "t1".into(),
            name: None,
            email: Some("profesor.garcia@school.edu".into()),
            image: None,
            role: SessionRole::Profesor,
        }
    }

    fn task(title: &str, emails: &[&str]) -> ReminderRequest {
        ReminderRequest {
            task_id: format!("id-{title}"),
            task_title: title.into(),
            course_name: "Historia".into(),
            due_date: None,
            students: emails
                .iter()
                .map(|e| ReminderStudent {
                    name: e.split('@').next().unwrap_or_default().to_string(),
                    email: Some(e.to_string()),
                })
                .collect(),
        }
    }

    fn signature() -> Signature<'static> {
        Signature {
            name: None,
            product_name: "Conecta Clases",
        }
    }

    #[tokio::test]
    async fn test_one_message_per_student() {
        let mailer = FakeMailer::default();
        let body = MassReminderRequest {
            tasks: vec![
                task("Ensayo", &["ana@school.edu", "luis@school.edu"]),
                task("Mapa", &["ana@school.edu"]),
            ],
        };

        let response = remind_students(&mailer, &teacher(), signature(), &body, Duration::ZERO)
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.sent_to, 2);
        assert_eq!(response.skipped, 1);
        assert_eq!(response.total_tasks, Some(2));
        assert_eq!(
            response.message,
            "Recordatorios enviados exitosamente a 2 estudiantes"
        );

        let sent = mailer.sent();
        assert_eq!(sent[0].to, vec!["ana@school.edu".to_string()]);
        assert_eq!(sent[0].subject, "Recordatorio: Tienes 2 tareas pendientes");
        assert!(sent[0].body.contains("Tu profesor"));
        assert_eq!(sent[1].subject, "Recordatorio: Ensayo");
    }

    #[tokio::test]
    async fn test_all_failed_is_not_success() {
        let mailer = FakeMailer::rejecting(&["ana@school.edu"]);
        let body = MassReminderRequest {
            tasks: vec![task("Ensayo", &["ana@school.edu"])],
        };
        let response = remind_students(&mailer, &teacher(), signature(), &body, Duration::ZERO)
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.failed, 1);
        assert_eq!(response.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let mailer = FakeMailer::default();
        let err = remind_students(
            &mailer,
            &teacher(),
            signature(),
            &MassReminderRequest { tasks: vec![] },
            Duration::ZERO,
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), NO_TASKS_MESSAGE);

        let err = remind_students(
            &mailer,
            &teacher(),
            signature(),
            &MassReminderRequest {
                tasks: vec![task("Ensayo", &[])],
            },
            Duration::ZERO,
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), NO_VALID_EMAIL_MESSAGE);
    }
}
