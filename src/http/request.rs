//! HTTP请求描述
//!
//! 定义检测时发出的请求：方法、相对端点、可选请求体与请求头

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// 支持的HTTP方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    /// 该方法是否携带请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Put | HttpMethod::Post)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(format!("无效的HTTP方法: {other}")),
        }
    }
}

/// 发往被检测端点的请求描述，构建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    method: HttpMethod,
    endpoint: String,
    body: Option<serde_json::Value>,
    headers: HashMap<String, String>,
}

impl HttpRequest {
    fn new(method: HttpMethod, endpoint: String, body: Option<serde_json::Value>) -> Self {
        Self {
            method,
            endpoint,
            body: if method.has_body() { body } else { None },
            headers: HashMap::new(),
        }
    }

    /// 创建GET请求，`endpoint` 为空时直接请求基础地址
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint.into(), None)
    }

    /// 创建PUT请求
    pub fn put(endpoint: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self::new(HttpMethod::Put, endpoint.into(), body)
    }

    /// 创建POST请求
    pub fn post(endpoint: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self::new(HttpMethod::Post, endpoint.into(), body)
    }

    /// 创建DELETE请求
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint.into(), None)
    }

    /// 按方法创建请求，GET/DELETE 会忽略请求体
    pub fn with_method(
        method: HttpMethod,
        endpoint: impl Into<String>,
        body: Option<serde_json::Value>,
    ) -> Self {
        Self::new(method, endpoint.into(), body)
    }

    /// 设置单个请求头，同名（忽略大小写）的旧值会被替换
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// 批量设置请求头
    pub fn with_headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |request, (name, value)| request.with_header(name, value))
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// 按名称（忽略大小写）查找请求头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 拼接基础地址与本请求的端点
    pub fn full_url(&self, base_url: &str) -> String {
        full_url(base_url, &self.endpoint)
    }
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::get("")
    }
}

/// 拼接基础地址与相对端点
///
/// 端点为空时返回基础地址本身；否则两者之间恰好保留一个 `/`。
pub fn full_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.trim().is_empty() {
        return base_url.to_string();
    }

    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
