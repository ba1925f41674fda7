//! Web检测器实现
//!
//! 执行一次HTTP交互，并依次进行传输校验、状态码校验与断言校验

use crate::error::{ConfigError, HttpError, Result, WatcherError};
use crate::http::{HttpRequest, HttpResponse, HttpService};
use crate::watcher::configuration::{WebWatcherConfiguration, WebWatcherConfigurationBuilder};
use crate::watcher::result::WebWatcherCheckResult;
use async_trait::async_trait;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 检测器trait，供外部调度器周期性调用
#[async_trait]
pub trait Watcher: Send + Sync {
    /// 检测器名称
    fn name(&self) -> &str;

    /// 检测器所属分组
    fn group(&self) -> Option<&str>;

    /// 执行一次检测
    ///
    /// 超时、状态码不符和断言不通过都以失败结果返回；
    /// 其他错误以 `WatcherError` 上报。
    async fn execute(&self) -> std::result::Result<WebWatcherCheckResult, WatcherError>;
}

/// 用于网站或API监控的Web检测器
pub struct WebWatcher {
    name: String,
    group: Option<String>,
    configuration: WebWatcherConfiguration,
    http_service: Arc<dyn HttpService>,
}

impl WebWatcher {
    /// 默认检测器名称
    pub const DEFAULT_NAME: &'static str = "Web Watcher";

    /// 创建新的Web检测器
    ///
    /// HTTP执行器在此处由配置中的工厂创建一次，之后的每次检测都复用它。
    ///
    /// # 参数
    /// * `name` - 检测器名称，不能为空
    /// * `configuration` - 检测器配置
    /// * `group` - 可选分组
    pub fn new(
        name: &str,
        configuration: WebWatcherConfiguration,
        group: Option<&str>,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyArgument { argument: "name" }.into());
        }

        let http_service = (configuration.http_service_provider())()?;

        Ok(Self {
            name: name.to_string(),
            group: group.map(str::to_string),
            configuration,
            http_service,
        })
    }

    /// 使用默认名称创建Web检测器
    pub fn with_default_name(configuration: WebWatcherConfiguration) -> Result<Self> {
        Self::new(Self::DEFAULT_NAME, configuration, None)
    }

    /// 通过回调配置并创建Web检测器
    ///
    /// # 参数
    /// * `name` - 检测器名称
    /// * `url` - 基础地址
    /// * `request` - 请求描述
    /// * `configurator` - 对构建器进行配置的回调
    pub fn configure<F>(
        name: &str,
        url: &str,
        request: HttpRequest,
        configurator: F,
    ) -> Result<Self>
    where
        F: FnOnce(WebWatcherConfigurationBuilder) -> WebWatcherConfigurationBuilder,
    {
        let builder = WebWatcherConfiguration::builder_with_request(url, request)?;
        let configuration = configurator(builder).build()?;
        Self::new(name, configuration, None)
    }

    /// 设置分组
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn configuration(&self) -> &WebWatcherConfiguration {
        &self.configuration
    }

    /// 状态码是否可接受
    fn has_valid_response(&self, response: &HttpResponse) -> bool {
        response.is_valid || self.configuration.skip_status_code_validation()
    }

    fn create_result(
        &self,
        is_valid: bool,
        response: Option<HttpResponse>,
        description: String,
    ) -> WebWatcherCheckResult {
        WebWatcherCheckResult::create(
            &self.name,
            self.group.as_deref(),
            is_valid,
            self.configuration.uri().clone(),
            self.configuration.request().clone(),
            response,
            description,
        )
    }

    /// 依次执行异步断言与同步断言
    ///
    /// 异步断言先完成，再咨询同步断言；异步断言不通过时不再执行同步断言。
    async fn ensure(
        &self,
        full_url: &str,
        response: HttpResponse,
    ) -> std::result::Result<WebWatcherCheckResult, WatcherError> {
        let mut is_valid = true;

        if let Some(ensure_that_async) = self.configuration.ensure_that_async() {
            let task = tokio::spawn(ensure_that_async(response.clone()));
            is_valid = task.await.map_err(|e| WatcherError::Predicate {
                endpoint: full_url.to_string(),
                message: e.to_string(),
            })?;
        }

        if is_valid {
            if let Some(ensure_that) = self.configuration.ensure_that() {
                is_valid = panic::catch_unwind(AssertUnwindSafe(|| ensure_that(&response)))
                    .map_err(|payload| WatcherError::Predicate {
                        endpoint: full_url.to_string(),
                        message: panic_message(payload.as_ref()),
                    })?;
            }
        }

        let description = format!(
            "Web endpoint: '{}' has returned a response with status code: {}.",
            full_url, response.status_code
        );

        Ok(self.create_result(is_valid, Some(response), description))
    }
}

#[async_trait]
impl Watcher for WebWatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    async fn execute(&self) -> std::result::Result<WebWatcherCheckResult, WatcherError> {
        let base_url = self.configuration.uri().as_str();
        let request = self.configuration.request();
        let full_url = request.full_url(base_url);

        debug!(watcher = %self.name, url = %full_url, method = %request.method(), "开始Web检测");

        let response = match self
            .http_service
            .execute(base_url, request, self.configuration.timeout())
            .await
        {
            Ok(response) => response,
            Err(HttpError::Timeout { .. }) => {
                warn!(watcher = %self.name, url = %full_url, "Web检测超时");
                return Ok(self.create_result(
                    false,
                    None,
                    format!(
                        "A connection timeout occurred while trying to access the Web endpoint: '{full_url}'."
                    ),
                ));
            }
            Err(e) => {
                error!(watcher = %self.name, url = %full_url, error = %e, "Web检测执行失败");
                return Err(WatcherError::Execution {
                    endpoint: full_url,
                    source: e,
                });
            }
        };

        if !self.has_valid_response(&response) {
            warn!(
                watcher = %self.name,
                url = %full_url,
                status_code = response.status_code,
                "Web端点返回了无效的状态码"
            );
            let description = format!(
                "Web endpoint: '{}' has returned an invalid response with status code: {}.",
                full_url, response.status_code
            );
            return Ok(self.create_result(false, Some(response), description));
        }

        let result = self.ensure(&full_url, response).await?;
        if !result.is_valid {
            warn!(watcher = %self.name, url = %full_url, "Web检测断言未通过");
        }

        Ok(result)
    }
}

impl std::fmt::Debug for WebWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebWatcher")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("configuration", &self.configuration)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "断言发生panic".to_string()
    }
}
