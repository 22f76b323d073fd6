//! 歌单相关接口的模型。

use serde::{Deserialize, Serialize};

use super::{Extras, de, fill_size, impl_envelope};

/// 歌单详情 (`/v3/get_list_info` 的列表项)。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistInfo {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 数字歌单 ID
    #[serde(rename = "listid", deserialize_with = "de::loose_i64")]
    pub id: i64,
    /// 全局歌单 ID，其它歌单接口都用它。
    #[serde(rename = "global_collection_id", deserialize_with = "de::loose_string")]
    pub global_id: String,
    /// 名称
    #[serde(deserialize_with = "de::loose_string")]
    pub name: String,
    /// 封面
    #[serde(deserialize_with = "de::loose_string")]
    pub pic: String,
    /// 简介
    #[serde(deserialize_with = "de::loose_string")]
    pub intro: String,
    /// 歌曲数
    #[serde(rename = "count", deserialize_with = "de::loose_i64")]
    pub song_count: i64,
    /// 创建者昵称
    #[serde(rename = "list_create_username", deserialize_with = "de::loose_string")]
    pub creator_name: String,
    /// 创建者 ID
    #[serde(rename = "list_create_userid", deserialize_with = "de::loose_i64")]
    pub creator_id: i64,
    /// 播放量
    #[serde(deserialize_with = "de::loose_i64")]
    pub heat: i64,
    /// 创建时间戳
    #[serde(deserialize_with = "de::loose_i64")]
    pub create_time: i64,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 歌单歌曲列表 (`/pubsongs/v2/get_other_list_file_nofilt` 的 `data`)。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistSongResponse {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 歌单内歌曲总数
    #[serde(deserialize_with = "de::loose_i64")]
    pub count: i64,
    /// 当前页的歌曲
    #[serde(deserialize_with = "de::loose_vec")]
    pub songs: Vec<PlaylistSong>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 歌单中的一首歌。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistSong {
    /// 名称，通常是“歌手 - 歌名”
    #[serde(deserialize_with = "de::loose_string")]
    pub name: String,
    /// 文件哈希
    #[serde(deserialize_with = "de::loose_string")]
    pub hash: String,
    /// 时长（毫秒）
    #[serde(rename = "timelen", deserialize_with = "de::loose_i64")]
    pub duration_ms: i64,
    /// 专辑 ID
    #[serde(deserialize_with = "de::loose_string")]
    pub album_id: String,
    /// 权限位。0 免费，10 通常为 VIP。
    #[serde(deserialize_with = "de::loose_i64")]
    pub privilege: i64,
    /// 歌手
    #[serde(rename = "singerinfo")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub singers: Vec<SingerLite>,
    /// 专辑
    #[serde(rename = "albuminfo")]
    pub album: Option<AlbumLite>,
    /// 包含 `{size}` 占位符的封面模板
    pub cover: Option<String>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

impl PlaylistSong {
    /// 300px 尺寸的封面地址。
    #[must_use]
    pub fn cover_url(&self) -> Option<String> {
        self.cover.as_deref().map(|t| fill_size(t, 300))
    }
}

/// 精简的歌手信息。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SingerLite {
    /// 歌手 ID
    #[serde(deserialize_with = "de::loose_i64")]
    pub id: i64,
    /// 歌手名
    #[serde(deserialize_with = "de::loose_string")]
    pub name: String,
    /// 头像模板
    #[serde(deserialize_with = "de::loose_string")]
    pub avatar: String,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

impl SingerLite {
    /// 100px 尺寸的头像地址。
    #[must_use]
    pub fn avatar_url(&self) -> String {
        fill_size(&self.avatar, 100)
    }
}

/// 精简的专辑信息。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumLite {
    /// 专辑 ID
    #[serde(deserialize_with = "de::loose_i64")]
    pub id: i64,
    /// 专辑名
    #[serde(deserialize_with = "de::loose_string")]
    pub name: String,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

impl_envelope!(PlaylistInfo, PlaylistSongResponse);
