//! 底层 HTTP 发送器。
//!
//! [`HttpSender`] 只负责把已经签好名、拼好 URL 的请求发出去，
//! 便于在测试中替换为进程内的假实现。

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, cookie::Jar};

use crate::error::Result;

/// 一个已经完全准备好的 HTTP 请求。
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// HTTP 方法
    pub method: Method,
    /// 包含查询字符串的完整 URL
    pub url: String,
    /// 按顺序排列的请求头
    pub headers: Vec<(String, String)>,
    /// 请求体及其 Content-Type
    pub body: Option<(String, String)>,
}

/// HTTP 响应。
#[derive(Debug, Clone)]
pub struct HttpReply {
    /// HTTP 状态码
    pub status: u16,
    /// 原始响应体
    pub body: Vec<u8>,
}

/// 执行 HTTP 请求的抽象。
#[async_trait]
pub trait HttpSender: Send + Sync {
    /// 发送请求并返回原始响应。
    async fn execute(&self, request: PreparedRequest) -> Result<HttpReply>;
}

/// 基于 `reqwest` 的默认实现，与会话共享同一个 Cookie 容器。
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    http_client: Client,
}

impl ReqwestSender {
    /// 创建一个使用指定 Cookie 容器的发送器。
    pub fn new(cookies: Arc<Jar>) -> Result<Self> {
        let http_client = Client::builder().cookie_provider(cookies).build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl HttpSender for ReqwestSender {
    async fn execute(&self, request: PreparedRequest) -> Result<HttpReply> {
        let mut builder = self.http_client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some((content, content_type)) = request.body {
            builder = builder.header("Content-Type", content_type).body(content);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpReply { status, body })
    }
}
