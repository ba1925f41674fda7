//! Web检测结果数据结构
//!
//! 每次检测恰好产生一个结果，创建后不再修改

use crate::http::{HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Web检测器的类型标识
pub const WEB_WATCHER_TYPE: &str = "web";

/// Web检测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebWatcherCheckResult {
    /// 检测ID
    pub id: Uuid,
    /// 检测器名称
    pub watcher_name: String,
    /// 检测器类型
    pub watcher_type: String,
    /// 检测器所属分组
    pub group: Option<String>,
    /// 检测是否通过
    pub is_valid: bool,
    /// 检测描述
    pub description: String,
    /// 请求的基础地址
    pub uri: Url,
    /// 发出的请求
    pub request: HttpRequest,
    /// 收到的响应，超时时为空
    pub response: Option<HttpResponse>,
    /// 检测时间戳
    pub checked_at: DateTime<Utc>,
}

impl WebWatcherCheckResult {
    /// 创建新的检测结果
    ///
    /// # 参数
    /// * `watcher_name` - 检测器名称
    /// * `group` - 检测器分组
    /// * `is_valid` - 检测是否通过
    /// * `uri` - 基础地址
    /// * `request` - 请求描述
    /// * `response` - 响应（超时时为 `None`）
    /// * `description` - 检测描述
    pub fn create(
        watcher_name: &str,
        group: Option<&str>,
        is_valid: bool,
        uri: Url,
        request: HttpRequest,
        response: Option<HttpResponse>,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            watcher_name: watcher_name.to_string(),
            watcher_type: WEB_WATCHER_TYPE.to_string(),
            group: group.map(str::to_string),
            is_valid,
            description,
            uri,
            request,
            response,
            checked_at: Utc::now(),
        }
    }

    /// 响应状态码（如果有响应）
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|response| response.status_code)
    }

    /// 转换为JSON字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从JSON字符串创建
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
