//! Web Watcher 主程序入口
//!
//! HTTP端点健康检测工具

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};
use web_watcher::cli::args::{Args, Commands};
use web_watcher::cli::commands::{CheckCommand, Command, ValidateCommand, VersionCommand};
use web_watcher::config::{ConfigLoader, GlobalConfig, TomlConfigLoader};
use web_watcher::logging::{LogConfig, LoggingSystem};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 命令行未指定日志级别时，尝试读取配置文件中的全局日志级别
    let global = match args.log_level {
        Some(_) => None,
        None => load_global_config(&args).await,
    };

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.resolve_log_level(global.as_ref()),
        console: true,
        json_format: args.log_json,
        ..Default::default()
    };

    let logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    debug!("Web Watcher v{} 启动", web_watcher::VERSION);

    // 执行命令
    if let Err(e) = execute_command(&args, logging_system).await {
        error!("命令执行失败: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 读取配置文件的全局配置，文件不存在或无效时返回 `None`
///
/// 配置错误由具体命令在加载时报告。
async fn load_global_config(args: &Args) -> Option<GlobalConfig> {
    TomlConfigLoader::new(true)
        .load_from_file(args.get_config_path())
        .await
        .ok()
        .map(|config| config.global)
}

/// 执行CLI命令
async fn execute_command(args: &Args, logging_system: LoggingSystem) -> Result<()> {
    let command: Box<dyn Command> = match &args.command {
        Commands::Check { .. } => Box::new(CheckCommand::new(logging_system)),
        Commands::Validate { .. } => Box::new(ValidateCommand),
        Commands::Version { .. } => Box::new(VersionCommand),
    };

    command
        .execute(args)
        .await
        .with_context(|| format!("执行命令失败: {:?}", args.command))
}
