//! Web检测器配置
//!
//! 通过构建器组装目标地址、请求、执行器、超时与校验断言，构建完成后不可变

use crate::error::{ConfigError, HttpError};
use crate::http::{HttpRequest, HttpResponse, HttpService, ReqwestHttpService};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// 同步校验断言
pub type EnsureThat = Arc<dyn Fn(&HttpResponse) -> bool + Send + Sync>;

/// 异步校验断言，在独立的任务中执行
pub type EnsureThatAsync = Arc<dyn Fn(HttpResponse) -> BoxFuture<'static, bool> + Send + Sync>;

/// HTTP执行器工厂，在检测器创建时调用一次
pub type HttpServiceProvider =
    Arc<dyn Fn() -> Result<Arc<dyn HttpService>, HttpError> + Send + Sync>;

/// Web检测器配置
#[derive(Clone)]
pub struct WebWatcherConfiguration {
    uri: Url,
    request: HttpRequest,
    http_service_provider: HttpServiceProvider,
    timeout: Option<Duration>,
    skip_status_code_validation: bool,
    ensure_that: Option<EnsureThat>,
    ensure_that_async: Option<EnsureThatAsync>,
}

impl WebWatcherConfiguration {
    /// 创建使用默认GET请求的构建器
    ///
    /// # 参数
    /// * `url` - 基础地址，必须是绝对URL
    ///
    /// # 返回
    /// * `Result<WebWatcherConfigurationBuilder, ConfigError>` - 构建器
    ///
    /// 地址为空或无法解析为绝对URL时返回错误。
    pub fn builder(url: &str) -> Result<WebWatcherConfigurationBuilder, ConfigError> {
        Self::builder_with_request(url, HttpRequest::default())
    }

    /// 创建使用指定请求的构建器
    pub fn builder_with_request(
        url: &str,
        request: HttpRequest,
    ) -> Result<WebWatcherConfigurationBuilder, ConfigError> {
        if url.trim().is_empty() {
            return Err(ConfigError::EmptyArgument { argument: "url" });
        }

        let uri = Url::parse(url).map_err(|source| ConfigError::UriFormat {
            url: url.to_string(),
            source,
        })?;

        Ok(WebWatcherConfigurationBuilder {
            configuration: Self {
                uri,
                request,
                http_service_provider: default_http_service_provider(),
                timeout: None,
                skip_status_code_validation: false,
                ensure_that: None,
                ensure_that_async: None,
            },
            error: None,
        })
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn http_service_provider(&self) -> &HttpServiceProvider {
        &self.http_service_provider
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn skip_status_code_validation(&self) -> bool {
        self.skip_status_code_validation
    }

    pub fn ensure_that(&self) -> Option<&EnsureThat> {
        self.ensure_that.as_ref()
    }

    pub fn ensure_that_async(&self) -> Option<&EnsureThatAsync> {
        self.ensure_that_async.as_ref()
    }
}

impl std::fmt::Debug for WebWatcherConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebWatcherConfiguration")
            .field("uri", &self.uri.as_str())
            .field("request", &self.request)
            .field("timeout", &self.timeout)
            .field(
                "skip_status_code_validation",
                &self.skip_status_code_validation,
            )
            .field("ensure_that", &self.ensure_that.is_some())
            .field("ensure_that_async", &self.ensure_that_async.is_some())
            .finish()
    }
}

fn default_http_service_provider() -> HttpServiceProvider {
    Arc::new(|| -> Result<Arc<dyn HttpService>, HttpError> {
        Ok(Arc::new(ReqwestHttpService::new()?))
    })
}

/// 配置构建器
///
/// 每个设置方法各自校验参数，遇到的第一个错误会在 `build` 时返回。
pub struct WebWatcherConfigurationBuilder {
    configuration: WebWatcherConfiguration,
    error: Option<ConfigError>,
}

impl WebWatcherConfigurationBuilder {
    fn record(&mut self, error: ConfigError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// 设置请求
    pub fn with_request(mut self, request: HttpRequest) -> Self {
        self.configuration.request = request;
        self
    }

    /// 设置超时时间，不允许为0
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            self.record(ConfigError::InvalidArgument {
                argument: "timeout",
                reason: "超时时间不能为0".to_string(),
            });
        } else {
            self.configuration.timeout = Some(timeout);
        }
        self
    }

    /// 跳过状态码校验
    pub fn skip_status_code_validation(mut self) -> Self {
        self.configuration.skip_status_code_validation = true;
        self
    }

    /// 设置同步校验断言
    pub fn ensure_that<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&HttpResponse) -> bool + Send + Sync + 'static,
    {
        self.configuration.ensure_that = Some(Arc::new(predicate));
        self
    }

    /// 设置异步校验断言
    pub fn ensure_that_async<F, Fut>(mut self, predicate: F) -> Self
    where
        F: Fn(HttpResponse) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let predicate: EnsureThatAsync = Arc::new(move |response| predicate(response).boxed());
        self.configuration.ensure_that_async = Some(predicate);
        self
    }

    /// 设置HTTP执行器工厂
    pub fn with_http_service_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn HttpService>, HttpError> + Send + Sync + 'static,
    {
        self.configuration.http_service_provider = Arc::new(provider);
        self
    }

    /// 直接指定HTTP执行器实例
    pub fn with_http_service(self, service: Arc<dyn HttpService>) -> Self {
        self.with_http_service_provider(move || Ok(Arc::clone(&service)))
    }

    /// 生成不可变的配置
    pub fn build(self) -> Result<WebWatcherConfiguration, ConfigError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.configuration),
        }
    }
}
