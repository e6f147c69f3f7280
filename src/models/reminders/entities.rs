/// 待发送的邮件
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub from: Option<String>,
}

/// 批量发送结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSendResult {
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}
