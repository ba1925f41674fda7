//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::GlobalConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Web Watcher - HTTP端点健康检测工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "web-watcher",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "WEB_WATCHER_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别，未指定时使用配置文件中的 `log_level`
    #[arg(
        short,
        long,
        value_enum,
        help = "日志级别",
        env = "WEB_WATCHER_LOG_LEVEL"
    )]
    pub log_level: Option<LogLevel>,

    /// 是否输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志", env = "WEB_WATCHER_LOG_JSON")]
    pub log_json: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 执行一次检测
    Check {
        /// 检测器名称（可选，不指定则执行所有检测器）
        #[arg(short, long, value_name = "NAME", help = "检测器名称")]
        watcher: Option<String>,

        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 验证配置文件
    Validate {
        /// 配置文件路径
        #[arg(value_name = "FILE", help = "配置文件路径")]
        config_path: Option<PathBuf>,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
    /// 表格格式
    Table,
}

impl Args {
    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::get_default_config_path)
    }

    /// 确定生效的日志级别
    ///
    /// 命令行参数优先，其次是配置文件的全局日志级别，都没有时为 `Info`。
    pub fn resolve_log_level(&self, global: Option<&GlobalConfig>) -> log::LevelFilter {
        match (&self.log_level, global) {
            (Some(level), _) => level.clone().into(),
            (None, Some(global)) => global.log_level_filter(),
            (None, None) => log::LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let args = Args::try_parse_from([
            "web-watcher",
            "--config",
            "watchers.toml",
            "check",
            "--watcher",
            "api",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.get_config_path(), PathBuf::from("watchers.toml"));
        assert_eq!(args.log_level, None);
        match args.command {
            Commands::Check { watcher, format } => {
                assert_eq!(watcher.as_deref(), Some("api"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("意外的子命令: {other:?}"),
        }
    }

    #[test]
    fn test_parse_validate_command() {
        let args =
            Args::try_parse_from(["web-watcher", "-l", "debug", "validate", "a.toml"]).unwrap();
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert!(matches!(
            args.command,
            Commands::Validate { config_path: Some(ref path) } if path == &PathBuf::from("a.toml")
        ));
    }

    #[test]
    fn test_resolve_log_level_prefers_cli_then_config() {
        let global = GlobalConfig {
            log_level: "warn".to_string(),
            request_timeout_seconds: None,
        };

        let args = Args::try_parse_from(["web-watcher", "version"]).unwrap();
        assert_eq!(args.resolve_log_level(Some(&global)), log::LevelFilter::Warn);
        assert_eq!(args.resolve_log_level(None), log::LevelFilter::Info);

        let args = Args::try_parse_from(["web-watcher", "-l", "error", "version"]).unwrap();
        assert_eq!(args.resolve_log_level(Some(&global)), log::LevelFilter::Error);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
    }
}
