//! Classroom Dashboard - Google Classroom 辅助仪表盘后端
//!
//! 基于 Actix Web，聚合 Google Classroom 数据并通过 Gmail 发送作业提醒。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `google`: Google Classroom / Gmail / OAuth 访问层
//! - `middlewares`: 会话认证与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod errors;
pub mod google;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod utils;
