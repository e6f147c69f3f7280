use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use tracing::{error, info, warn};

use super::{AuthService, SIGNED_IN_REDIRECT};
use crate::errors::{DashboardError, Result};
use crate::google::IdentityProvider;
use crate::models::auth::{
    entities::{SessionRole, SessionUser},
    requests::OAuthCallbackParams,
};
use crate::utils::jwt::{OAUTH_STATE_COOKIE, SessionTokens};

/// 授权失败时的跳转，错误码沿用 NextAuth 的命名
const ACCESS_DENIED_REDIRECT: &str = "/?error=AccessDenied";
const CALLBACK_ERROR_REDIRECT: &str = "/?error=OAuthCallback";

pub async fn handle_callback(
    service: &AuthService,
    request: &HttpRequest,
    params: OAuthCallbackParams,
) -> ActixResult<HttpResponse> {
    if let Some(err) = params.error.as_deref() {
        warn!("Google sign in was denied: {}", err);
        return Ok(redirect(ACCESS_DENIED_REDIRECT, None));
    }

    let expected_state = request
        .cookie(OAUTH_STATE_COOKIE)
        .map(|c| c.value().to_string());
    if let Err(e) = verify_state(expected_state.as_deref(), params.state.as_deref()) {
        warn!("OAuth callback rejected: {}", e);
        return Ok(redirect(CALLBACK_ERROR_REDIRECT, None));
    }

    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(redirect(CALLBACK_ERROR_REDIRECT, None));
    };

    let identity = service.get_identity(request);
    match complete_sign_in(identity.as_ref(), code).await {
        Ok((user, token)) => {
            info!("User {} signed in as {}", user.id, user.role);
            Ok(redirect(SIGNED_IN_REDIRECT, Some(&token)))
        }
        Err(e) => {
            error!("OAuth callback failed: {}", e);
            Ok(redirect(CALLBACK_ERROR_REDIRECT, None))
        }
    }
}

/// state 必须与登录前写入 cookie 的值一致
pub fn verify_state(expected: Option<&str>, received: Option<&str>) -> Result<()> {
    match (expected, received) {
        (Some(expected), Some(received)) if !expected.is_empty() && expected == received => Ok(()),
        _ => Err(DashboardError::authentication("OAuth state mismatch")),
    }
}

/// 用授权码换取令牌，读取用户信息并签发会话
pub async fn complete_sign_in(
    identity: &dyn IdentityProvider,
    code: &str,
) -> Result<(SessionUser, String)> {
    let tokens = identity.exchange_code(code).await?;
    let info = identity.user_info(&tokens.access_token).await?;

    let role = info
        .email
        .as_deref()
        .map(SessionRole::from_email)
        .unwrap_or(SessionRole::Alumno);
    let user = SessionUser {
        id: info.sub,
        name: info.name,
        email: info.email,
        image: info.picture,
        role,
    };

    let (token, _) = SessionTokens::issue(&user, &tokens.access_token)?;
    Ok((user, token))
}

fn redirect(location: &str, session_token: Option<&str>) -> HttpResponse {
    let mut builder = HttpResponse::Found();
    builder
        .insert_header((header::LOCATION, location))
        .cookie(SessionTokens::empty_state_cookie());
    if let Some(token) = session_token {
        builder.cookie(SessionTokens::session_cookie(token));
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::fake::FakeIdentity;

    #[test]
    fn test_verify_state() {
        assert!(verify_state(Some("abc"), Some("abc")).is_ok());
        assert!(verify_state(Some("abc"), Some("xyz")).is_err());
        assert!(verify_state(None, Some("abc")).is_err());
        assert!(verify_state(Some(""), Some("")).is_err());
    }

    #[tokio::test]
    async fn test_complete_sign_in() {
        let (user, token) = complete_sign_in(&FakeIdentity, "good-code").await.unwrap();
        assert_eq!(user.id, "teacher-1");
        assert_eq!(user.role, SessionRole::Profesor);

        let claims = SessionTokens::verify(&token).unwrap();
        assert_eq!(claims.sub, "teacher-1");
        assert_eq!(claims.access_token.as_deref(), Some("ya29.fake"));
    }

    #[tokio::test]
    async fn test_rejected_code() {
        let err = complete_sign_in(&FakeIdentity, "bad-code").await.unwrap_err();
        assert!(err.is_auth_failure());
    }
}
