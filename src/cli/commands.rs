//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::{Config, ConfigLoader, TomlConfigLoader};
use crate::error::{Result, WatcherError};
use crate::logging::LoggingSystem;
use crate::watcher::{Watcher, WebWatcher, WebWatcherCheckResult};
use async_trait::async_trait;
use std::path::Path;

/// 单个检测器的执行结果
pub type CheckOutcome = std::result::Result<WebWatcherCheckResult, WatcherError>;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                _ => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Validate { config_path } = &args.command {
            let path = config_path.clone().unwrap_or_else(|| args.get_config_path());
            self.validate_config_file(&path).await
        } else {
            Ok(())
        }
    }
}

impl ValidateCommand {
    /// 验证配置文件，并确认每个检测器都能创建
    async fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        let loader = TomlConfigLoader::new(true);
        let config = loader.load_from_file(config_path).await?;

        for definition in &config.watchers {
            definition.to_watcher(&config.global)?;
        }

        println!(
            "✓ 配置文件有效: {} ({} 个检测器)",
            config_path.display(),
            config.watchers.len()
        );
        Ok(())
    }
}

/// 检测命令
pub struct CheckCommand {
    logging: LoggingSystem,
}

impl CheckCommand {
    pub fn new(logging: LoggingSystem) -> Self {
        Self { logging }
    }

    /// 按名称筛选并创建检测器
    pub fn build_watchers(config: &Config, watcher_name: Option<&str>) -> Result<Vec<WebWatcher>> {
        config
            .watchers
            .iter()
            .filter(|definition| watcher_name.map_or(true, |name| definition.name == name))
            .map(|definition| definition.to_watcher(&config.global))
            .collect()
    }

    /// 并发执行所有检测器，每个检测器只执行一次
    pub async fn run_watchers(watchers: &[WebWatcher]) -> Vec<CheckOutcome> {
        let futures = watchers.iter().map(|watcher| watcher.execute());
        futures::future::join_all(futures).await
    }

    /// 执行检测
    async fn perform_check(
        &self,
        args: &Args,
        watcher_name: Option<&str>,
        format: &OutputFormat,
    ) -> Result<()> {
        let loader = TomlConfigLoader::new(true);
        let config = loader.load_from_file(args.get_config_path()).await?;

        let watchers = Self::build_watchers(&config, watcher_name)?;
        if watchers.is_empty() {
            if let Some(name) = watcher_name {
                eprintln!("未找到名为 '{name}' 的检测器");
            } else {
                eprintln!("未找到任何检测器");
            }
            return Ok(());
        }

        let outcomes = Self::run_watchers(&watchers).await;

        for outcome in &outcomes {
            match outcome {
                Ok(result) => self.logging.check_result_log(result),
                Err(e) => tracing::error!("检测执行失败: {}", e),
            }
        }

        match format {
            OutputFormat::Json => {
                let results: Vec<_> = outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            OutputFormat::Table => self.print_table_results(&watchers, &outcomes),
            OutputFormat::Text => self.print_text_results(&watchers, &outcomes),
        }

        Ok(())
    }

    /// 打印文本格式结果
    fn print_text_results(&self, watchers: &[WebWatcher], outcomes: &[CheckOutcome]) {
        for (watcher, outcome) in watchers.iter().zip(outcomes) {
            match outcome {
                Ok(result) => {
                    let status_icon = if result.is_valid { "✓" } else { "✗" };
                    println!("{} {} - {}", status_icon, result.watcher_name, result.description);
                }
                Err(e) => {
                    println!("✗ {} - 检测失败: {e}", watcher.name());
                }
            }
        }
    }

    /// 打印表格格式结果
    fn print_table_results(&self, watchers: &[WebWatcher], outcomes: &[CheckOutcome]) {
        println!(
            "{:<20} {:<10} {:<10} {:<40}",
            "检测器", "结果", "状态码", "地址"
        );
        println!("{}", "-".repeat(80));

        for (watcher, outcome) in watchers.iter().zip(outcomes) {
            match outcome {
                Ok(result) => {
                    let status_code = result
                        .status_code()
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "N/A".to_string());
                    println!(
                        "{:<20} {:<10} {:<10} {:<40}",
                        result.watcher_name,
                        if result.is_valid { "通过" } else { "失败" },
                        status_code,
                        result.request.full_url(result.uri.as_str())
                    );
                }
                Err(e) => {
                    println!(
                        "{:<20} {:<10} {:<10} {:<40}",
                        watcher.name(),
                        "错误",
                        "N/A",
                        e.endpoint()
                    );
                }
            }
        }
    }
}

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Check { watcher, format } = &args.command {
            self.perform_check(args, watcher.as_deref(), format).await
        } else {
            Ok(())
        }
    }
}
