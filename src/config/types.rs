//! 配置数据结构定义
//!
//! 定义检测器配置文件的结构体和验证逻辑

use crate::error::{ConfigError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::watcher::{WebWatcher, WebWatcherConfiguration};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// 主配置结构，包含全局配置和检测器列表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 全局配置项
    #[serde(default)]
    pub global: GlobalConfig,
    /// 检测器配置列表
    pub watchers: Vec<WatcherDefinition>,
}

/// 全局配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 默认请求超时时间（秒），为空时使用传输层默认值
    pub request_timeout_seconds: Option<u64>,
}

impl GlobalConfig {
    /// 将配置的日志级别转换为 `LevelFilter`，无法识别时使用 `Info`
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: None,
        }
    }
}

/// 单个检测器的配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatcherDefinition {
    /// 检测器名称
    pub name: String,
    /// 基础地址
    pub url: String,
    /// 所属分组
    pub group: Option<String>,
    /// HTTP方法
    #[serde(default = "default_method")]
    pub method: String,
    /// 相对端点
    #[serde(default)]
    pub endpoint: String,
    /// 请求头
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// 请求体（用于POST/PUT请求）
    pub body: Option<serde_json::Value>,
    /// 检测器特定的超时时间（秒）
    pub timeout_seconds: Option<u64>,
    /// 是否跳过状态码校验
    #[serde(default)]
    pub skip_status_code_validation: bool,
    /// 响应体需要包含的文本
    pub expected_body_contains: Option<String>,
}

// 默认值函数
fn default_log_level() -> String {
    "info".to_string()
}
fn default_method() -> String {
    "GET".to_string()
}

impl WatcherDefinition {
    /// 构建请求描述
    pub fn to_request(&self) -> Result<HttpRequest> {
        let method: HttpMethod = self.method.parse().map_err(|e: String| {
            ConfigError::ValidationError(format!("检测器 {}: {}", self.name, e))
        })?;

        let request = HttpRequest::with_method(method, self.endpoint.clone(), self.body.clone());
        Ok(request.with_headers(self.headers.clone()))
    }

    /// 根据配置创建Web检测器
    ///
    /// # 参数
    /// * `global` - 全局配置，检测器未设置超时时使用全局超时
    ///
    /// # 返回
    /// * `Result<WebWatcher>` - 检测器实例
    pub fn to_watcher(&self, global: &GlobalConfig) -> Result<WebWatcher> {
        let mut builder =
            WebWatcherConfiguration::builder_with_request(&self.url, self.to_request()?)?;

        if let Some(seconds) = self.timeout_seconds.or(global.request_timeout_seconds) {
            builder = builder.with_timeout(Duration::from_secs(seconds));
        }

        if self.skip_status_code_validation {
            builder = builder.skip_status_code_validation();
        }

        if let Some(expected) = self.expected_body_contains.clone() {
            builder = builder.ensure_that(move |response| response.data.contains(&expected));
        }

        WebWatcher::new(&self.name, builder.build()?, self.group.as_deref())
    }
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> std::result::Result<(), String> {
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.global.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.global.log_level, valid_log_levels
        ));
    }

    if config.global.request_timeout_seconds == Some(0) {
        return Err("请求超时时间不能为0".to_string());
    }

    if config.watchers.is_empty() {
        return Err("至少需要配置一个检测器".to_string());
    }

    let mut names = HashSet::new();
    for watcher in &config.watchers {
        if watcher.name.trim().is_empty() {
            return Err("检测器名称不能为空".to_string());
        }

        if !names.insert(watcher.name.as_str()) {
            return Err(format!("检测器名称重复: {}", watcher.name));
        }

        if !watcher.url.starts_with("http://") && !watcher.url.starts_with("https://") {
            return Err(format!("检测器 {} 的URL格式无效", watcher.name));
        }

        if watcher.method.parse::<HttpMethod>().is_err() {
            return Err(format!(
                "检测器 {} 的HTTP方法 {} 无效，支持的方法: [\"GET\", \"PUT\", \"POST\", \"DELETE\"]",
                watcher.name, watcher.method
            ));
        }

        if watcher.timeout_seconds == Some(0) {
            return Err(format!("检测器 {} 的超时时间不能为0", watcher.name));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watcher::Watcher;

    fn create_test_definition() -> WatcherDefinition {
        WatcherDefinition {
            name: "api".to_string(),
            url: "https://example.com".to_string(),
            group: Some("backend".to_string()),
            method: "GET".to_string(),
            endpoint: "health".to_string(),
            headers: HashMap::new(),
            body: None,
            timeout_seconds: None,
            skip_status_code_validation: false,
            expected_body_contains: None,
        }
    }

    fn create_test_config() -> Config {
        Config {
            global: GlobalConfig {
                log_level: "info".to_string(),
                request_timeout_seconds: Some(10),
            },
            watchers: vec![create_test_definition()],
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = create_test_config();

        let serialized = toml::to_string(&config).expect("序列化失败");
        assert!(!serialized.is_empty());

        let deserialized: Config = toml::from_str(&serialized).expect("反序列化失败");
        assert_eq!(config.global, deserialized.global);
        assert_eq!(config.watchers, deserialized.watchers);
    }

    #[test]
    fn test_config_defaults() {
        let content = r#"
[[watchers]]
name = "site"
url = "https://example.com"
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.global, GlobalConfig::default());
        let watcher = &config.watchers[0];
        assert_eq!(watcher.method, "GET");
        assert_eq!(watcher.endpoint, "");
        assert!(!watcher.skip_status_code_validation);
        assert!(watcher.headers.is_empty());
    }

    #[test]
    fn test_global_log_level_filter() {
        let mut global = GlobalConfig::default();
        assert_eq!(global.log_level_filter(), log::LevelFilter::Info);

        global.log_level = "debug".to_string();
        assert_eq!(global.log_level_filter(), log::LevelFilter::Debug);

        global.log_level = "verbose".to_string();
        assert_eq!(global.log_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_config_validation() {
        assert!(validate_config(&create_test_config()).is_ok());
    }

    #[test]
    fn test_config_validation_empty_watchers() {
        let mut config = create_test_config();
        config.watchers.clear();

        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("至少需要配置一个检测器"));
    }

    #[test]
    fn test_config_validation_duplicate_names() {
        let mut config = create_test_config();
        config.watchers.push(create_test_definition());

        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("名称重复"));
    }

    #[test]
    fn test_config_validation_invalid_url() {
        let mut config = create_test_config();
        config.watchers[0].url = "invalid-url".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("URL格式无效"));
    }

    #[test]
    fn test_config_validation_invalid_method() {
        let mut config = create_test_config();
        config.watchers[0].method = "PATCH".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("HTTP方法"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = create_test_config();
        config.watchers[0].timeout_seconds = Some(0);
        assert!(validate_config(&config).is_err());

        let mut config = create_test_config();
        config.global.request_timeout_seconds = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = create_test_config();
        config.global.log_level = "verbose".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("无效的日志级别"));
    }

    #[test]
    fn test_to_request() {
        let mut definition = create_test_definition();
        definition.method = "post".to_string();
        definition.body = Some(serde_json::json!({"probe": true}));
        definition
            .headers
            .insert("Accept".to_string(), "application/json".to_string());

        let request = definition.to_request().unwrap();
        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.endpoint(), "health");
        assert_eq!(request.body(), Some(&serde_json::json!({"probe": true})));
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[test]
    fn test_to_watcher_uses_global_timeout() {
        let config = create_test_config();
        let watcher = config.watchers[0].to_watcher(&config.global).unwrap();

        assert_eq!(watcher.name(), "api");
        assert_eq!(watcher.group(), Some("backend"));
        assert_eq!(
            watcher.configuration().timeout(),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_to_watcher_prefers_own_timeout_and_adds_body_predicate() {
        let mut definition = create_test_definition();
        definition.timeout_seconds = Some(3);
        definition.skip_status_code_validation = true;
        definition.expected_body_contains = Some("up".to_string());

        let watcher = definition.to_watcher(&GlobalConfig::default()).unwrap();
        let configuration = watcher.configuration();
        assert_eq!(configuration.timeout(), Some(Duration::from_secs(3)));
        assert!(configuration.skip_status_code_validation());

        let ensure_that = configuration.ensure_that().unwrap();
        let up = crate::http::HttpResponse::valid(200, "OK", HashMap::new(), "status: up");
        let down = crate::http::HttpResponse::valid(200, "OK", HashMap::new(), "status: down");
        assert!(ensure_that(&up));
        assert!(!ensure_that(&down));
    }

    #[test]
    fn test_to_watcher_rejects_invalid_url() {
        let mut definition = create_test_definition();
        definition.url = "not a url".to_string();

        assert!(definition.to_watcher(&GlobalConfig::default()).is_err());
    }
}
