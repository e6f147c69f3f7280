use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 会话角色（依据邮箱推断）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub enum SessionRole {
    Alumno,      // 学生
    Profesor,    // 教师
    Coordinador, // 协调员
}

impl SessionRole {
    /// 根据邮箱推断角色，默认为学生
    pub fn from_email(email: &str) -> Self {
        if email.contains("profesor") || email.contains("teacher") {
            return SessionRole::Profesor;
        }
        if email.contains("coordinador") || email.contains("admin") {
            return SessionRole::Coordinador;
        }
        SessionRole::Alumno
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRole::Alumno => "alumno",
            SessionRole::Profesor => "profesor",
            SessionRole::Coordinador => "coordinador",
        }
    }
}

impl std::fmt::Display for SessionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 会话中的用户信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SessionUser {
    /// Google 账号 ID，与 Classroom 用户 ID 一致
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub role: SessionRole,
}

/// 通过认证中间件后放入请求扩展的会话
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub access_token: Option<String>,
}

impl Session {
    /// 空字符串的令牌视为缺失
    pub fn google_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Google 令牌端点返回值
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
    pub id_token: Option<String>,
}

/// OpenID userinfo
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_email() {
        assert_eq!(
            SessionRole::from_email("profesor.lopez@school.edu"),
            SessionRole::Profesor
        );
        assert_eq!(
            SessionRole::from_email("math-teacher@school.edu"),
            SessionRole::Profesor
        );
        assert_eq!(
            SessionRole::from_email("admin@school.edu"),
            SessionRole::Coordinador
        );
        assert_eq!(
            SessionRole::from_email("ana@school.edu"),
            SessionRole::Alumno
        );
    }

    #[test]
    fn test_blank_token_is_missing() {
        let session = Session {
            user: SessionUser {
                id: "1".into(),
                name: None,
                email: None,
                image: None,
                role: SessionRole::Alumno,
            },
            access_token: Some(String::new()),
        };
        assert!(session.google_token().is_none());
    }
}
