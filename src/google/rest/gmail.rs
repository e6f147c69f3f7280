//! Gmail v1 发送客户端
//!
//! 邮件由 lettre 构造为纯文本 MIME，base64url 编码后通过 `users.messages.send` 发送。

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use lettre::Message;
use lettre::message::{Mailbox, SinglePart};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::errors::{DashboardError, Result};
use crate::google::MailSender;
use crate::models::reminders::entities::EmailMessage;

use super::check_status;

pub struct RestGmailClient {
    http: Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: Option<String>,
}

impl RestGmailClient {
    pub fn new(http: Client, base_url: &str, access_token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl MailSender for RestGmailClient {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        if message.to.is_empty() {
            return Err(DashboardError::mail("Message has no recipients"));
        }

        let raw = URL_SAFE_NO_PAD.encode(build_raw_message(message)?);
        let response = self
            .http
            .post(format!("{}/users/me/messages/send", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&json!({ "raw": raw }))
            .send()
            .await?;

        let sent: SentMessage = check_status(response, "messages.send")
            .await
            .map_err(|e| match e {
                DashboardError::GoogleAuth(_) => e,
                other => DashboardError::mail(other.message()),
            })?
            .json()
            .await?;
        Ok(sent.id.unwrap_or_default())
    }
}

/// 构造 RFC 5322 邮件
///
/// 标题与地址交由 lettre 编码，非 ASCII 与控制字符都会写成 RFC 2047 编码字，
/// 换行无法进入头部。lettre 要求 From 存在，Gmail 发送时按授权账号改写。
pub fn build_raw_message(message: &EmailMessage) -> Result<Vec<u8>> {
    let from = message
        .from
        .as_deref()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| DashboardError::mail("Message has no sender address"))?;

    let mut builder = Message::builder()
        .from(parse_mailbox(from)?)
        .subject(message.subject.as_str());
    for to in &message.to {
        builder = builder.to(parse_mailbox(to)?);
    }

    let email = builder
        .singlepart(SinglePart::plain(message.body.clone()))
        .map_err(|e| DashboardError::mail(format!("Failed to build message: {e}")))?;
    Ok(email.formatted())
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| DashboardError::validation(format!("Invalid email address '{address}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(subject: &str) -> EmailMessage {
        EmailMessage {
            to: vec!["ana@school.edu".into(), "luis@school.edu".into()],
            subject: subject.into(),
            body: "Hola Ana,\n\nLínea dos".into(),
            from: Some("profesor@school.edu".into()),
        }
    }

    fn headers(raw: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(raw);
        let (head, _) = text.split_once("\r\n\r\n").unwrap();
        head.split("\r\n").map(str::to_string).collect()
    }

    #[test]
    fn test_raw_message_headers() {
        let raw = build_raw_message(&message("Recordatorio: Ensayo")).unwrap();
        let head = headers(&raw).join("\n");
        assert!(head.contains("From: profesor@school.edu"));
        assert!(head.contains("ana@school.edu"));
        assert!(head.contains("luis@school.edu"));
        assert!(head.contains("Subject: Recordatorio: Ensayo"));
        assert!(head.contains("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_line_break_in_subject_cannot_add_headers() {
        let raw = build_raw_message(&message(
            "Recordatorio: Ensayo\r\nBcc: attacker@evil.test - Historia",
        ))
        .unwrap();
        let headers = headers(&raw);
        assert!(
            !headers
                .iter()
                .any(|h| h.to_ascii_lowercase().starts_with("bcc:"))
        );
        assert_eq!(headers.iter().filter(|h| h.starts_with("Subject:")).count(), 1);
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        let raw = build_raw_message(&message("Recordatorio: Capítulo 3")).unwrap();
        let head = headers(&raw).join("\n");
        assert!(head.contains("=?utf-8?") || head.contains("=?UTF-8?"));
        assert!(!head.contains("Capítulo"));
    }

    #[test]
    fn test_missing_sender_is_rejected() {
        let mut msg = message("Hi");
        msg.from = None;
        assert!(matches!(build_raw_message(&msg), Err(DashboardError::Mail(_))));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let mut msg = message("Hi");
        msg.to = vec!["not an address".into()];
        assert!(matches!(
            build_raw_message(&msg),
            Err(DashboardError::Validation(_))
        ));
    }
}
