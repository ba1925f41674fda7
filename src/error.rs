//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Web Watcher 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum WebWatcherError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// HTTP执行器相关错误
    #[error("HTTP错误: {0}")]
    Http(#[from] HttpError),

    /// 检测执行错误
    #[error("检测执行错误: {0}")]
    Watcher(#[from] WatcherError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 必填参数为空
    #[error("参数 {argument} 不能为空")]
    EmptyArgument { argument: &'static str },

    /// 参数取值无效
    #[error("参数 {argument} 无效: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// URL不是合法的绝对地址
    #[error("无效的URL '{url}': {source}")]
    UriFormat {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// HTTP执行器错误类型
#[derive(Error, Debug)]
pub enum HttpError {
    /// 请求超时
    #[error("请求超时: {url}")]
    Timeout { url: String },

    /// HTTP请求错误
    #[error("HTTP请求失败: {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 请求头无效
    #[error("无效的请求头: {name}")]
    InvalidHeader { name: String },

    /// HTTP客户端初始化失败
    #[error("HTTP客户端初始化失败: {0}")]
    Client(#[source] reqwest::Error),

    /// 其他传输层错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HttpError {
    /// 是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout { .. })
    }
}

/// 检测执行过程中需要上报给调用方的错误
#[derive(Error, Debug)]
pub enum WatcherError {
    /// 访问端点时发生的非超时错误
    #[error("访问Web端点 '{endpoint}' 时发生错误: {source}")]
    Execution {
        endpoint: String,
        #[source]
        source: HttpError,
    },

    /// 校验断言自身执行失败（panic）
    #[error("Web端点 '{endpoint}' 的校验断言执行失败: {message}")]
    Predicate { endpoint: String, message: String },
}

impl WatcherError {
    /// 获取出错的端点地址
    pub fn endpoint(&self) -> &str {
        match self {
            WatcherError::Execution { endpoint, .. } | WatcherError::Predicate { endpoint, .. } => {
                endpoint
            }
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, WebWatcherError>;
