//! 请求的签名、发送与响应归一化。

pub mod request;
pub mod sender;
pub(crate) mod signing;

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Method;
use serde_json::{Value, json};
use tracing::{instrument, trace};

use crate::{
    error::{KugouError, Result},
    session::SessionManager,
};

pub use request::{KgRequest, RequestBody, SignatureScheme};
pub use sender::{HttpReply, HttpSender, PreparedRequest, ReqwestSender};

/// 响应体不是 JSON 时，原始字节以 Base64 形式存放在此字段下。
pub const RAW_BASE64_KEY: &str = "__raw_base64__";

/// 负责签名并发送 [`KgRequest`]。
#[derive(Clone)]
pub struct Transport {
    sender: Arc<dyn HttpSender>,
    session: Arc<SessionManager>,
    gateway: String,
    user_agent: String,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("gateway", &self.gateway)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// 创建传输层。
    pub fn new(
        sender: Arc<dyn HttpSender>,
        session: Arc<SessionManager>,
        gateway: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            session,
            gateway: gateway.into(),
            user_agent: user_agent.into(),
        }
    }

    /// 共享的会话管理器。
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// 签名并发送请求，返回归一化后的 JSON。
    ///
    /// 非 2xx 状态码返回 [`KugouError::HttpStatus`]；空响应体视为 `{}`；
    /// 无法解析为 JSON 的响应体以 Base64 形式放入 [`RAW_BASE64_KEY`] 字段。
    #[instrument(skip(self, request), fields(path = %request.path))]
    pub async fn send(&self, request: KgRequest) -> Result<Value> {
        let session = self.session.snapshot();
        let signed = signing::sign_request(
            request,
            &session,
            &self.user_agent,
            chrono::Utc::now().timestamp(),
        );

        let request = signed.request;
        let host = request.host.as_deref().unwrap_or(&self.gateway);
        let url = build_url(host, &request.path, &request.params);

        let body = if request.method == Method::POST {
            match request.body {
                RequestBody::Json(value) => Some((value.to_string(), "application/json".to_string())),
                RequestBody::Raw {
                    content,
                    content_type,
                } => Some((content, content_type)),
                RequestBody::Empty => None,
            }
        } else {
            None
        };

        let reply = self
            .sender
            .execute(PreparedRequest {
                method: request.method,
                url: url.clone(),
                headers: signed.headers,
                body,
            })
            .await?;

        if !(200..300).contains(&reply.status) {
            return Err(KugouError::HttpStatus {
                status: reply.status,
                url,
            });
        }

        let value = normalize_body(&reply.body);
        trace!(
            url = %url,
            response.body = %value,
            "原始 JSON 响应"
        );
        Ok(value)
    }
}

/// 拼接 `host/path?query`，查询参数的值经过百分号编码。
pub(crate) fn build_url(host: &str, path: &str, params: &BTreeMap<String, String>) -> String {
    let mut url = format!(
        "{}/{}",
        host.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if !params.is_empty() {
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// 把响应体归一化为 JSON。
pub(crate) fn normalize_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return json!({});
    }
    serde_json::from_slice(bytes).unwrap_or_else(|_| json!({ RAW_BASE64_KEY: STANDARD.encode(bytes) }))
}
