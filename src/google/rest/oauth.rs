//! Google OAuth 2.0 授权码流程

use reqwest::Client;
use url::Url;

use crate::config::AppConfig;
use crate::errors::{DashboardError, Result};
use crate::google::IdentityProvider;
use crate::models::auth::entities::{GoogleUserInfo, OAuthTokens};

use super::check_status;

pub struct GoogleOAuthClient {
    http: Client,
    client_id: String,
    client_secret: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
    redirect_uri: String,
    scopes: Vec<String>,
}

impl GoogleOAuthClient {
    pub fn from_config(http: Client) -> Result<Self> {
        let config = AppConfig::get();
        let google = &config.google;
        if google.client_id.is_empty() {
            tracing::warn!("GOOGLE_CLIENT_ID is not configured, sign in will fail");
        }
        Ok(Self {
            http,
            client_id: google.client_id.clone(),
            client_secret: google.client_secret.clone(),
            auth_url: google.auth_url.clone(),
            token_url: google.token_url.clone(),
            userinfo_url: google.userinfo_url.clone(),
            redirect_uri: config.oauth_redirect_uri(),
            scopes: google.scopes.clone(),
        })
    }

    fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleOAuthClient {
    fn authorization_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(&self.auth_url)
            .map_err(|e| DashboardError::google_auth(format!("Invalid auth_url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scope_string())
            .append_pair("state", state)
            // 需要 refresh_token 时必须 offline + consent
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;
        let tokens = check_status(response, "token exchange")
            .await
            .map_err(|e| DashboardError::google_auth(e.message()))?
            .json()
            .await?;
        Ok(tokens)
    }

    async fn user_info(&self, access_token: &str) -> Result<GoogleUserInfo> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;
        Ok(check_status(response, "userinfo").await?.json().await?)
    }
}
