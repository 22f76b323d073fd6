//! 此模块定义了所有用于反序列化酷狗概念版 API 响应的数据结构。
//!
//! 模型只声明常用字段，其余字段全部保留在各自的 `extras` 中。
//! 酷狗的同一个字段在不同接口里时而是数字时而是字符串，
//! 因此数值和 ID 字段都使用 [`de`] 中的宽松反序列化函数。

pub mod auth;
pub mod discovery;
pub mod playlist;
pub mod song;
pub mod user;

pub use auth::RefreshTokenResponse;
pub use discovery::{DailyRecommendResponse, DailyRecommendSong};
pub use playlist::{AlbumLite, PlaylistInfo, PlaylistSong, PlaylistSongResponse, SingerLite};
pub use song::{
    AudioQuality, PlayUrlData, SearchHotCategory, SearchHotKeyword, SearchHotResponse,
    SearchResultData, SongInfo,
};
pub use user::{
    BusiVipInfo, OneDayVipModel, UpgradeVipModel, UserDetailModel, UserPlaylistItem,
    UserPlaylistResponse, UserVipResponse, VipFutureDuration, VipReceiveHistoryResponse,
    VipReceiveItem,
};

/// 模型中未声明的字段。
pub type Extras = serde_json::Map<String, serde_json::Value>;

/// 把封面模板中的 `{size}` 占位符替换为具体尺寸。
#[must_use]
pub fn fill_size(template: &str, size: u32) -> String {
    template.replace("{size}", &size.to_string())
}

/// 为带有 `status` / `error_code` 字段的模型实现 [`crate::envelope::Envelope`]。
macro_rules! impl_envelope {
    ($($model:ty),+ $(,)?) => {
        $(
            impl $crate::envelope::Envelope for $model {
                fn backfill(&mut self, status: Option<i64>, error_code: Option<i64>) {
                    if self.status.is_none() {
                        self.status = status;
                    }
                    if self.error_code.is_none() {
                        self.error_code = error_code;
                    }
                }
            }
        )+
    };
}
pub(crate) use impl_envelope;

/// 宽松的反序列化函数。
pub(crate) mod de {
    use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error};
    use serde_json::Value;

    /// 字符串、数字或布尔值都接受为字符串，`null` 视为空串。
    pub fn loose_string<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(d)? {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// 数字或数字字符串都接受为 `i64`，无法识别时为 `0`。
    pub fn loose_i64<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_i64(&Value::deserialize(d)?).unwrap_or_default())
    }

    /// 与 [`loose_i64`] 相同，但保留“缺失”这一状态。
    pub fn loose_opt_i64<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_i64(&Value::deserialize(d)?))
    }

    /// 只有数组才按元素解析，字符串、`null` 等其他形状都视为空列表。
    ///
    /// 没有权限的歌曲会把 `url` 返回成 `""`，列表接口没有数据时也常返回 `null`。
    pub fn loose_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(d)? {
            array @ Value::Array(_) => serde_json::from_value(array).map_err(D::Error::custom),
            _ => Ok(Vec::new()),
        }
    }

    /// 从 JSON 值中宽松地读取整数。
    pub fn as_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().and_then(|v| i64::try_from(v).ok()))
                .or_else(|| n.as_f64().and_then(integral_f64)),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// 只接受没有小数部分且落在 `i64` 范围内的浮点数。
    #[allow(clippy::cast_possible_truncation)]
    fn integral_f64(v: f64) -> Option<i64> {
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        (v.is_finite() && v.fract() == 0.0 && (-LIMIT..LIMIT).contains(&v)).then(|| v as i64)
    }
}
