//! 搜索、播放链接和热搜接口的模型。

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::{Extras, de, fill_size, impl_envelope};

// =================================================================
// 歌曲搜索接口 (`/v3/search/song`) 的模型
// =================================================================

/// 歌曲搜索结果的数据部分。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResultData {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 搜索到的歌曲总数。
    #[serde(deserialize_with = "de::loose_i64")]
    pub total: i64,
    /// 歌曲列表。
    #[serde(rename = "lists")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub songs: Vec<SongInfo>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 代表一首歌曲的详细信息。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SongInfo {
    /// 歌曲的文件哈希。
    #[serde(rename = "FileHash", deserialize_with = "de::loose_string")]
    pub hash: String,
    /// 文件名，通常是“歌手 - 歌名”。
    #[serde(rename = "FileName", deserialize_with = "de::loose_string")]
    pub name: String,
    /// 歌手名。
    #[serde(rename = "SingerName", deserialize_with = "de::loose_string")]
    pub singer: String,
    /// 专辑 ID。
    #[serde(rename = "AlbumID", deserialize_with = "de::loose_string")]
    pub album_id: String,
    /// 时长，单位为秒。
    #[serde(rename = "Duration", deserialize_with = "de::loose_i64")]
    pub duration: i64,
    /// 包含 `{size}` 占位符的封面模板。
    #[serde(rename = "Image")]
    pub image: Option<String>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

impl SongInfo {
    /// 100px 尺寸的封面地址。
    #[must_use]
    pub fn cover_url(&self) -> Option<String> {
        self.image.as_deref().map(|t| fill_size(t, 100))
    }
}

// =================================================================
// 播放链接接口 (`/v5/url`) 的模型
// =================================================================

/// 播放链接接口的响应。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayUrlData {
    /// 状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 候选播放地址
    #[serde(rename = "url")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub urls: Vec<String>,
    /// 文件哈希
    #[serde(deserialize_with = "de::loose_string")]
    pub hash: String,
    /// 权限状态
    #[serde(deserialize_with = "de::loose_i64")]
    pub priv_status: i64,
    /// 接口自带的错误码
    #[serde(deserialize_with = "de::loose_i64")]
    pub err_code: i64,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 播放链接接口的音质参数。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum AudioQuality {
    /// 128kbps MP3
    #[default]
    #[strum(serialize = "128")]
    #[serde(rename = "128")]
    Standard,
    /// 320kbps MP3
    #[strum(serialize = "320")]
    #[serde(rename = "320")]
    High,
    /// 无损 FLAC
    #[strum(serialize = "flac")]
    #[serde(rename = "flac")]
    Lossless,
    /// Hi-Res
    #[strum(serialize = "high")]
    #[serde(rename = "high")]
    HiRes,
    /// 蝰蛇全景声
    #[strum(serialize = "viper_atmos")]
    #[serde(rename = "viper_atmos")]
    ViperAtmos,
    /// 蝰蛇超清
    #[strum(serialize = "viper_clear")]
    #[serde(rename = "viper_clear")]
    ViperClear,
    /// 蝰蛇母带
    #[strum(serialize = "viper_tape")]
    #[serde(rename = "viper_tape")]
    ViperTape,
}

impl PlayUrlData {
    /// 是否拿到了可用的播放地址。
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Some(1) && !self.urls.is_empty()
    }

    /// 是否需要 VIP。
    #[must_use]
    pub const fn requires_vip(&self) -> bool {
        self.priv_status == 1
    }

    /// 是否需要购买专辑。
    #[must_use]
    pub const fn requires_album_purchase(&self) -> bool {
        self.priv_status == 10
    }
}

// =================================================================
// 热搜接口 (`/api/v3/search/hot_tab`) 的模型
// =================================================================

/// 热搜榜。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHotResponse {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 服务器时间戳
    #[serde(deserialize_with = "de::loose_i64")]
    pub timestamp: i64,
    /// 榜单分类，例如热搜榜、飙升榜。
    #[serde(rename = "list")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub categories: Vec<SearchHotCategory>,
}

/// 热搜榜单分类。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHotCategory {
    /// 分类名
    #[serde(deserialize_with = "de::loose_string")]
    pub name: String,
    /// 关键词
    #[serde(deserialize_with = "de::loose_vec")]
    pub keywords: Vec<SearchHotKeyword>,
}

/// 热搜关键词。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHotKeyword {
    /// 关键词
    #[serde(deserialize_with = "de::loose_string")]
    pub keyword: String,
    /// 上榜理由
    #[serde(deserialize_with = "de::loose_string")]
    pub reason: String,
    /// 跳转地址
    #[serde(rename = "jumpurl", deserialize_with = "de::loose_string")]
    pub jump_url: String,
    /// JSON 数据地址
    #[serde(deserialize_with = "de::loose_string")]
    pub json_url: String,
    /// 是否为封面词
    #[serde(deserialize_with = "de::loose_i64")]
    pub is_cover_word: i64,
    /// 类型
    #[serde(rename = "type", deserialize_with = "de::loose_i64")]
    pub kind: i64,
    /// 图标类型
    #[serde(deserialize_with = "de::loose_i64")]
    pub icon: i64,
}

impl_envelope!(SearchResultData, PlayUrlData, SearchHotResponse);
