//! 定义了整个 `kugou-helper` 库的错误类型 `KugouError`。

use std::{io, string::FromUtf8Error};
use thiserror::Error;

/// `kugou-helper` 库的通用错误枚举。
///
/// 只有真正的失败（网络、I/O、密钥材料不可用）才会以 `Err` 的形式冒泡；
/// 解密或解析失败在原语边界上被降级为 `None` 或空字符串。
#[derive(Error, Debug)]
pub enum KugouError {
    /// 网络请求失败 (源自 `reqwest::Error`)
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// 服务器返回了非 2xx 状态码
    #[error("HTTP 请求失败，状态码 {status}: {url}")]
    HttpStatus {
        /// HTTP 状态码
        status: u16,
        /// 请求的完整 URL
        url: String,
    },

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Base64 解码失败 (源自 `base64::DecodeError`)
    #[error("Base64 解码失败: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// UTF-8 转换失败 (源自 `string::FromUtf8Error`)
    #[error("UTF-8 转换失败: {0}")]
    FromUtf8(#[from] FromUtf8Error),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 加密失败
    #[error("加密失败: {0}")]
    Encryption(String),

    /// 该操作需要登录，但当前会话是匿名的
    #[error("该操作需要登录")]
    LoginRequired,

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// `KugouError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, KugouError>;
