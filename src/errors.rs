//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_dashboard_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum DashboardError {
            $($variant(String),)*
        }

        impl DashboardError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(DashboardError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(DashboardError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(DashboardError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl DashboardError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        DashboardError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_dashboard_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    GoogleApi("E003", "Google API Error"),
    GoogleAuth("E004", "Google Authorization Error"),
    Network("E005", "Network Error"),
    Mail("E006", "Mail Delivery Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Session("E010", "Session Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Io("E013", "IO Error"),
}

impl DashboardError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// Google 返回 401 时视为授权失效，客户端需要重新登录
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, DashboardError::GoogleAuth(_))
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DashboardError {}

// 为常见的错误类型实现 From trait
impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::Serialization(err.to_string())
        } else {
            DashboardError::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for DashboardError {
    fn from(err: chrono::ParseError) -> Self {
        DashboardError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for DashboardError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        DashboardError::Session(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DashboardError::cache_connection("test").code(), "E001");
        assert_eq!(DashboardError::google_api("test").code(), "E003");
        assert_eq!(DashboardError::validation("test").code(), "E007");
        assert_eq!(DashboardError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            DashboardError::google_auth("test").error_type(),
            "Google Authorization Error"
        );
        assert_eq!(
            DashboardError::mail("test").error_type(),
            "Mail Delivery Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = DashboardError::not_found("course 42");
        assert_eq!(err.message(), "course 42");
    }

    #[test]
    fn test_format_simple() {
        let err = DashboardError::validation("courseId parameter is required");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("courseId parameter is required"));
    }

    #[test]
    fn test_auth_failure() {
        assert!(DashboardError::google_auth("401").is_auth_failure());
        assert!(!DashboardError::google_api("500").is_auth_failure());
    }
}
