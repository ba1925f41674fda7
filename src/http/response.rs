//! HTTP响应数据结构
//!
//! 由HTTP执行器产生的不可变响应

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 被检测端点返回的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 传输层是否成功（通常为2xx）
    pub is_valid: bool,
    /// 状态原因短语
    pub reason_phrase: String,
    /// 响应头（每个名称保留首个值）
    pub headers: HashMap<String, String>,
    /// 响应体原文
    pub data: String,
}

impl HttpResponse {
    /// 创建传输成功的响应
    pub fn valid(
        status_code: u16,
        reason_phrase: impl Into<String>,
        headers: HashMap<String, String>,
        data: impl Into<String>,
    ) -> Self {
        Self::new(status_code, true, reason_phrase.into(), headers, data.into())
    }

    /// 创建传输失败的响应
    pub fn invalid(
        status_code: u16,
        reason_phrase: impl Into<String>,
        headers: HashMap<String, String>,
        data: impl Into<String>,
    ) -> Self {
        Self::new(status_code, false, reason_phrase.into(), headers, data.into())
    }

    fn new(
        status_code: u16,
        is_valid: bool,
        reason_phrase: String,
        headers: HashMap<String, String>,
        data: String,
    ) -> Self {
        Self {
            status_code,
            is_valid,
            reason_phrase,
            headers,
            data,
        }
    }

    /// 按名称（忽略大小写）查找响应头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_and_invalid_factories() {
        let ok = HttpResponse::valid(200, "Ok", HashMap::new(), "");
        assert!(ok.is_valid);
        assert_eq!(ok.status_code, 200);
        assert_eq!(ok.reason_phrase, "Ok");
        assert!(ok.headers.is_empty());
        assert!(ok.data.is_empty());

        let not_found = HttpResponse::invalid(404, "Not Found", HashMap::new(), "missing");
        assert!(!not_found.is_valid);
        assert_eq!(not_found.data, "missing");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let response = HttpResponse::valid(200, "OK", headers, "{}");

        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("server"), None);
    }
}
