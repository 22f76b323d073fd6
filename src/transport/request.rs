//! 请求描述符。接口层只描述“要发什么”，签名和发送由 [`super::Transport`] 完成。

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::Value;

/// 请求的签名方案，每个接口固定使用其中一种。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureScheme {
    /// 常规的安卓签名。
    #[default]
    Default,
    /// `/v5/url` 专用：在常规签名之外附加由 `hash` 派生的 `key`。
    PlayUrlV5,
    /// 网页端二维码登录签名。
    WebQr,
    /// 不签名。
    None,
}

/// 请求体。JSON 与原始字符串互斥。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// 无请求体
    #[default]
    Empty,
    /// JSON 请求体，发送时紧凑序列化。
    Json(Value),
    /// 原样发送的字符串请求体。
    Raw {
        /// 请求体内容
        content: String,
        /// 声明的 Content-Type
        content_type: String,
    },
}

impl RequestBody {
    /// 参与签名的请求体字符串。空 JSON 对象不参与签名。
    pub(crate) fn signing_text(&self) -> String {
        match self {
            Self::Json(Value::Object(map)) if map.is_empty() => String::new(),
            Self::Json(value) => value.to_string(),
            Self::Raw { content, .. } => content.clone(),
            Self::Empty => String::new(),
        }
    }
}

/// 单个酷狗 API 请求的完整描述。
#[derive(Debug, Clone)]
pub struct KgRequest {
    /// HTTP 方法
    pub method: Method,
    /// 接口路径，例如 `/v3/search/song`
    pub path: String,
    /// 显式指定的主机；为空时使用网关。
    pub host: Option<String>,
    /// 查询参数
    pub params: BTreeMap<String, String>,
    /// 请求体
    pub body: RequestBody,
    /// 签名方案
    pub signature: SignatureScheme,
    /// `x-router` 头
    pub router: Option<String>,
    /// 覆盖签名时使用的设备 ID
    pub dfid: Option<String>,
    /// 额外的请求头
    pub headers: Vec<(String, String)>,
}

impl KgRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            host: None,
            params: BTreeMap::new(),
            body: RequestBody::Empty,
            signature: SignatureScheme::Default,
            router: None,
            dfid: None,
            headers: Vec::new(),
        }
    }

    /// 创建一个 GET 请求。
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// 创建一个 POST 请求。
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// 指定主机。
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// 添加一个查询参数。
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// 设置 JSON 请求体。
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// 设置原始字符串请求体。
    #[must_use]
    pub fn raw(mut self, content: impl Into<String>, content_type: impl Into<String>) -> Self {
        self.body = RequestBody::Raw {
            content: content.into(),
            content_type: content_type.into(),
        };
        self
    }

    /// 设置签名方案。
    #[must_use]
    pub fn signature(mut self, scheme: SignatureScheme) -> Self {
        self.signature = scheme;
        self
    }

    /// 设置 `x-router`。
    #[must_use]
    pub fn router(mut self, router: impl Into<String>) -> Self {
        self.router = Some(router.into());
        self
    }

    /// 覆盖签名时使用的设备 ID。
    #[must_use]
    pub fn dfid(mut self, dfid: impl Into<String>) -> Self {
        self.dfid = Some(dfid.into());
        self
    }

    /// 添加一个请求头。
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
