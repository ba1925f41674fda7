//! HTTP执行器实现
//!
//! 定义检测器依赖的执行器接口，并提供基于reqwest的默认实现

use crate::error::HttpError;
use crate::http::request::{HttpMethod, HttpRequest};
use crate::http::response::HttpResponse;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout;

/// HTTP执行器trait，对一个基础地址执行一次请求
///
/// 实现必须可以被并发调用：同一个检测器的多次检测可能同时复用同一个执行器。
#[async_trait]
pub trait HttpService: Send + Sync {
    /// 执行请求
    ///
    /// # 参数
    /// * `base_url` - 基础地址
    /// * `request` - 请求描述
    /// * `timeout` - 超时时间，`None` 表示使用传输层默认值
    ///
    /// # 返回
    /// * `Result<HttpResponse, HttpError>` - 响应，超时时返回 `HttpError::Timeout`
    async fn execute(
        &self,
        base_url: &str,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, HttpError>;
}

/// 基于reqwest的HTTP执行器
#[derive(Debug, Clone)]
pub struct ReqwestHttpService {
    /// HTTP客户端（内部引用计数，可并发使用）
    client: Client,
    /// 默认请求头，会被请求中的同名请求头覆盖
    default_headers: HeaderMap,
}

impl ReqwestHttpService {
    /// 创建新的HTTP执行器
    pub fn new() -> Result<Self, HttpError> {
        let client = Client::builder().build().map_err(HttpError::Client)?;
        Ok(Self::with_client(client))
    }

    /// 使用已有的客户端创建执行器
    pub fn with_client(client: Client) -> Self {
        let mut default_headers = HeaderMap::new();
        let user_agent = format!("{}/{}", crate::APP_NAME, crate::VERSION);
        if let Ok(value) = HeaderValue::from_str(&user_agent) {
            default_headers.insert(USER_AGENT, value);
        }

        Self {
            client,
            default_headers,
        }
    }

    /// 合并默认请求头与请求自带的请求头
    ///
    /// `HeaderName` 本身不区分大小写，`insert` 会替换同名的默认值。
    fn merge_headers(&self, headers: &HashMap<String, String>) -> Result<HeaderMap, HttpError> {
        let mut merged = self.default_headers.clone();

        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HttpError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeader { name: name.clone() })?;
            merged.insert(header_name, header_value);
        }

        Ok(merged)
    }

    /// 构建HTTP请求
    fn build_request(
        &self,
        url: &str,
        request: &HttpRequest,
    ) -> Result<reqwest::RequestBuilder, HttpError> {
        let method = match request.method() {
            HttpMethod::Get => Method::GET,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, url)
            .headers(self.merge_headers(request.headers())?);

        if request.method().has_body() {
            let empty = serde_json::json!({});
            builder = builder.json(request.body().unwrap_or(&empty));
        }

        Ok(builder)
    }

    /// 发送请求并读取完整响应
    async fn send(
        &self,
        url: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<HttpResponse, HttpError> {
        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify_error(url, e))?;

        let status = response.status();
        let reason_phrase = status.canonical_reason().unwrap_or("Unknown").to_string();
        let headers = Self::collect_headers(response.headers());
        let data = response
            .text()
            .await
            .map_err(|e| Self::classify_error(url, e))?;

        Ok(if status.is_success() {
            HttpResponse::valid(status.as_u16(), reason_phrase, headers, data)
        } else {
            HttpResponse::invalid(status.as_u16(), reason_phrase, headers, data)
        })
    }

    /// 区分超时与其他请求错误
    fn classify_error(url: &str, error: reqwest::Error) -> HttpError {
        if error.is_timeout() {
            HttpError::Timeout {
                url: url.to_string(),
            }
        } else {
            HttpError::Request {
                url: url.to_string(),
                source: error,
            }
        }
    }

    /// 提取响应头，每个名称只保留第一个值
    fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
        let mut collected = HashMap::new();
        for (name, value) in headers {
            if let Ok(value) = value.to_str() {
                collected
                    .entry(name.as_str().to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
        collected
    }
}

#[async_trait]
impl HttpService for ReqwestHttpService {
    async fn execute(
        &self,
        base_url: &str,
        request: &HttpRequest,
        timeout_duration: Option<Duration>,
    ) -> Result<HttpResponse, HttpError> {
        let url = request.full_url(base_url);
        let builder = self.build_request(&url, request)?;

        tracing::debug!(method = %request.method(), url = %url, "发送HTTP请求");

        match timeout_duration.filter(|d| !d.is_zero()) {
            Some(duration) => timeout(duration, self.send(&url, builder))
                .await
                .map_err(|_| HttpError::Timeout { url: url.clone() })?,
            None => self.send(&url, builder).await,
        }
    }
}
