//! HTTP交互模块
//!
//! 提供请求/响应数据模型以及可替换的HTTP执行器

pub mod request;
pub mod response;
pub mod service;

// 重新导出主要类型
pub use request::{full_url, HttpMethod, HttpRequest};
pub use response::HttpResponse;
pub use service::{HttpService, ReqwestHttpService};
