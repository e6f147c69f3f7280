use crate::config::AppConfig;
use crate::models::auth::entities::{Session, SessionRole, SessionUser};
use actix_web::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use once_cell::sync::Lazy;
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};

const SESSION_TOKEN_TYPE: &str = "session";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

// 未配置密钥时使用进程级随机密钥，重启后会话全部失效
static SESSION_SECRET: Lazy<String> = Lazy::new(|| {
    let configured = AppConfig::get().session.secret.clone();
    if configured.is_empty() {
        tracing::warn!("SESSION_SECRET is not set, using a random per-process secret");
        random_string(48)
    } else {
        configured
    }
});

// 会话 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // Google 用户 ID
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub role: SessionRole,
    pub access_token: Option<String>, // Google 访问令牌
    pub token_type: String,
    pub exp: usize,
    pub iat: usize,
}

impl SessionClaims {
    pub fn into_session(self) -> Session {
        Session {
            user: SessionUser {
                id: self.sub,
                name: self.name,
                email: self.email,
                image: self.picture,
                role: self.role,
            },
            access_token: self.access_token,
        }
    }
}

pub struct SessionTokens;

impl SessionTokens {
    fn secret() -> &'static str {
        SESSION_SECRET.as_str()
    }

    // 会话有效期
    pub fn expiry_duration() -> chrono::Duration {
        chrono::Duration::minutes(AppConfig::get().session.expiry)
    }

    // 签发会话令牌，返回令牌与过期时间
    pub fn issue(
        user: &SessionUser,
        access_token: &str,
    ) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
        Self::issue_with(Self::secret(), user, access_token, Self::expiry_duration())
    }

    pub fn issue_with(
        secret: &str,
        user: &SessionUser,
        access_token: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let expiration = now + expiry_duration;

        let claims = SessionClaims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            picture: user.image.clone(),
            role: user.role,
            access_token: Some(access_token.to_string()).filter(|t| !t.is_empty()),
            token_type: SESSION_TOKEN_TYPE.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        let token = encode(&Header::default(), &claims, &encoding_key)?;
        Ok((token, expiration))
    }

    // 验证会话令牌
    pub fn verify(token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        Self::verify_with(Self::secret(), token)
    }

    pub fn verify_with(
        secret: &str,
        token: &str,
    ) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let claims = decode::<SessionClaims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)?;
        if claims.token_type != SESSION_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    /// 从会话 cookie 中提取令牌
    ///
    /// 令牌内含 Google 访问令牌，只接受 HttpOnly cookie，不读取 Authorization 头。
    pub fn extract_from_request(req: &actix_web::HttpRequest) -> Option<String> {
        let cookie_name = &AppConfig::get().session.cookie_name;
        req.cookie(cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// 创建会话 Cookie
    pub fn session_cookie(token: &str) -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(config.session.cookie_name.clone(), token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::minutes(
                config.session.expiry,
            ))
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    /// 创建空的会话 Cookie（用于注销）
    pub fn empty_cookie() -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(config.session.cookie_name.clone(), "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    /// OAuth state，用于回调时校验
    pub fn generate_state() -> String {
        random_string(32)
    }

    pub fn state_cookie(state: &str) -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(OAUTH_STATE_COOKIE, state.to_string())
            .path("/api/auth")
            .max_age(actix_web::cookie::time::Duration::minutes(10))
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    pub fn empty_state_cookie() -> Cookie<'static> {
        Cookie::build(OAUTH_STATE_COOKIE, "")
            .path("/api/auth")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .http_only(true)
            .finish()
    }
}

fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: "1234".into(),
            name: Some("Ana Pérez".into()),
            email: Some("ana@school.edu".into()),
            image: None,
            role: SessionRole::Alumno,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let (token, expires) =
            SessionTokens::issue_with("s3cret", &user(), "ya29.token", chrono::Duration::hours(1))
                .unwrap();
        assert!(expires > Utc::now());

        let session = SessionTokens::verify_with("s3cret", &token)
            .unwrap()
            .into_session();
        assert_eq!(session.user.id, "1234");
        assert_eq!(session.google_token(), Some("ya29.token"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) =
            SessionTokens::issue_with("s3cret", &user(), "t", chrono::Duration::hours(1)).unwrap();
        assert!(SessionTokens::verify_with("other", &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let (token, _) =
            SessionTokens::issue_with("s3cret", &user(), "t", chrono::Duration::hours(-2))
                .unwrap();
        assert!(SessionTokens::verify_with("s3cret", &token).is_err());
    }

    #[test]
    fn test_empty_access_token_not_stored() {
        let (token, _) =
            SessionTokens::issue_with("s3cret", &user(), "", chrono::Duration::hours(1)).unwrap();
        let claims = SessionTokens::verify_with("s3cret", &token).unwrap();
        assert!(claims.access_token.is_none());
    }

    #[test]
    fn test_state_is_random() {
        let a = SessionTokens::generate_state();
        assert_eq!(a.len(), 32);
        assert_ne!(a, SessionTokens::generate_state());
    }
}
