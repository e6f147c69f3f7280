use std::time::Duration;
use tracing::error;

use crate::google::MailSender;
use crate::models::reminders::entities::{BatchSendResult, EmailMessage};

/// 逐封发送，两封之间等待 `delay`；单封失败只记录，不中断
pub async fn send_batch(
    mailer: &dyn MailSender,
    messages: &[EmailMessage],
    delay: Duration,
) -> BatchSendResult {
    let mut result = BatchSendResult::default();

    for (i, message) in messages.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let recipients = message.to.join(", ");
        match mailer.send(message).await {
            Ok(_) => result.sent += 1,
            Err(e) => {
                error!("Failed to send email to {}: {}", recipients, e);
                result.failed += 1;
                result
                    .errors
                    .push(format!("Failed to send to {}: {}", recipients, e.message()));
            }
        }
    }

    result
}
