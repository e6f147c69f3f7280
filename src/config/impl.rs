use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 常用部署变量到配置键的映射，优先级高于配置文件
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("app.environment", "APP_ENV"),
    ("app.log_level", "RUST_LOG"),
    ("app.public_url", "PUBLIC_URL"),
    ("server.host", "SERVER_HOST"),
    ("server.port", "SERVER_PORT"),
    ("server.unix_socket_path", "UNIX_SOCKET"),
    ("server.workers", "CPU_COUNT"),
    ("session.secret", "SESSION_SECRET"),
    ("google.client_id", "GOOGLE_CLIENT_ID"),
    ("google.client_secret", "GOOGLE_CLIENT_SECRET"),
    ("cache.type", "CACHE_TYPE"),
    ("cache.default_ttl", "CACHE_TTL"),
    ("cache.redis.url", "REDIS_URL"),
    ("cache.redis.key_prefix", "REDIS_KEY_PREFIX"),
    ("gmail.send_delay_ms", "EMAIL_SEND_DELAY_MS"),
];

impl AppConfig {
    /// 加载配置：config.toml → config.{APP_ENV}.toml → CLASSDASH__* → 部署变量
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("CLASSDASH")
                    .separator("__")
                    .try_parsing(true),
            );

        let builder = ENV_OVERRIDES
            .iter()
            .try_fold(builder, |builder, (key, var)| {
                builder.set_override_option(*key, std::env::var(var).ok())
            })?;

        let app_config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(app_config.normalized())
    }

    /// 补齐 0 值等需要运行时推导的字段
    fn normalized(mut self) -> Self {
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers).max(1);
        }
        self.google.max_concurrency = self.google.max_concurrency.max(1);
        self
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时初始化，重复调用报错
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// OAuth 回调地址，需与 Google 控制台登记的一致
    pub fn oauth_redirect_uri(&self) -> String {
        format!(
            "{}/api/auth/callback/google",
            self.app.public_url.trim_end_matches('/')
        )
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_loads() {
        let config = AppConfig::get();
        assert!(config.google.max_concurrency >= 1);
        assert!(config.server.workers >= 1);
        assert!(
            config
                .google
                .scopes
                .iter()
                .any(|s| s.ends_with("gmail.send"))
        );
    }

    #[test]
    fn test_redirect_uri_trims_trailing_slash() {
        let mut config = AppConfig::get().clone();
        config.app.public_url = "https://clases.example.com/".to_string();
        assert_eq!(
            config.oauth_redirect_uri(),
            "https://clases.example.com/api/auth/callback/google"
        );
    }

    #[test]
    fn test_normalized_fills_zero_values() {
        let mut config = AppConfig::get().clone();
        config.server.workers = 0;
        config.server.max_workers = 2;
        config.google.max_concurrency = 0;
        let config = config.normalized();
        assert!((1..=2).contains(&config.server.workers));
        assert_eq!(config.google.max_concurrency, 1);
    }
}
