//! 通用的响应外壳解析。
//!
//! 大多数接口返回 `{ "status": 1, "error_code": 0, "data": { ... } }`。
//! [`parse`] 负责判断成功与否、在成功时取出 `data`，
//! 并把外层的状态码回填到模型上。

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::models::de::as_i64;

/// 能够接收外层状态码回填的模型。
pub trait Envelope {
    /// 当模型自身没有 `status` / `error_code` 时，用外层的值补上。
    fn backfill(&mut self, _status: Option<i64>, _error_code: Option<i64>) {}
}

impl Envelope for Value {}

impl<T: Envelope> Envelope for Vec<T> {}

/// 外层的状态字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvelopeStatus {
    /// `status`
    pub status: Option<i64>,
    /// `error_code`，缺失时读取 `errcode`
    pub error_code: Option<i64>,
}

impl EnvelopeStatus {
    /// 从响应根节点读取状态字段。
    #[must_use]
    pub fn read(root: &Value) -> Self {
        let status = root.get("status").and_then(as_i64);
        let error_code = root
            .get("error_code")
            .and_then(as_i64)
            .or_else(|| root.get("errcode").and_then(as_i64));
        Self { status, error_code }
    }

    /// `status == 1` 且错误码缺失或为 0。
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Some(1) && self.error_code.is_none_or(|code| code == 0)
    }
}

/// 解析响应外壳。
///
/// 成功且 `data` 非空时解析 `data`，否则解析根节点本身，
/// 因此失败的响应也能以 `status != 1` 的模型形式返回。
/// 目标类型为 [`Value`] 时原样返回选中的节点。反序列化失败时返回 `None`。
pub fn parse<T>(root: &Value) -> Option<T>
where
    T: DeserializeOwned + Envelope,
{
    let envelope = EnvelopeStatus::read(root);
    let target = match root.get("data") {
        Some(data) if envelope.is_success() && !data.is_null() => data,
        _ => root,
    };

    match serde_json::from_value::<T>(target.clone()) {
        Ok(mut model) => {
            model.backfill(envelope.status, envelope.error_code);
            Some(model)
        }
        Err(e) => {
            warn!(
                status = ?envelope.status,
                error_code = ?envelope.error_code,
                "解析响应失败: {e}"
            );
            None
        }
    }
}
