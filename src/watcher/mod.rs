//! Web检测模块
//!
//! 提供检测器配置、检测执行与检测结果

pub mod configuration;
pub mod result;
pub mod web;

// 重新导出主要类型
pub use configuration::{
    EnsureThat, EnsureThatAsync, HttpServiceProvider, WebWatcherConfiguration,
    WebWatcherConfigurationBuilder,
};
pub use result::{WebWatcherCheckResult, WEB_WATCHER_TYPE};
pub use web::{Watcher, WebWatcher};
