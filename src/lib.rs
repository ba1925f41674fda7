//! Web Watcher - HTTP端点健康检测单元
//!
//! 对单个HTTP端点执行一次检测，并按以下顺序校验：
//! - 传输是否成功
//! - 状态码是否可接受
//! - 可选的异步断言
//! - 可选的同步断言
//!
//! 检测结果是不可变的结构化数据，调度、告警等由外部负责。

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod watcher;

// 重新导出主要类型
pub use config::{Config, GlobalConfig, WatcherDefinition};
pub use error::{ConfigError, HttpError, WatcherError, WebWatcherError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpService, ReqwestHttpService};
pub use watcher::{Watcher, WebWatcher, WebWatcherCheckResult, WebWatcherConfiguration};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
