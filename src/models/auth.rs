//! 登录态相关的模型。

use serde::{Deserialize, Serialize};

use super::{Extras, de, impl_envelope};

/// 刷新令牌 (`/v5/login_by_token`) 解密合并后的 `data`。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshTokenResponse {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 用户 ID
    #[serde(deserialize_with = "de::loose_string")]
    pub userid: String,
    /// 新令牌
    #[serde(deserialize_with = "de::loose_string")]
    pub token: String,
    /// VIP 标记
    #[serde(deserialize_with = "de::loose_i64")]
    pub is_vip: i64,
    /// 下次刷新时要串联的 `t1`
    #[serde(deserialize_with = "de::loose_string")]
    pub t1: String,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

impl_envelope!(RefreshTokenResponse);
