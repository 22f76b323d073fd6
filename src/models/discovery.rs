//! 每日推荐的模型。

use serde::{Deserialize, Serialize};

use super::{Extras, SingerLite, de, fill_size, impl_envelope};

/// 每日推荐 (`/everyday_song_recommend` 的 `data`)。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyRecommendResponse {
    /// 外层状态码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub status: Option<i64>,
    /// 外层错误码
    #[serde(deserialize_with = "de::loose_opt_i64")]
    pub error_code: Option<i64>,
    /// 推荐日期，例如 `20260131`
    #[serde(rename = "creation_date", deserialize_with = "de::loose_string")]
    pub date: String,
    /// 封面
    #[serde(rename = "cover_img_url", deserialize_with = "de::loose_string")]
    pub cover_url: String,
    /// 副标题
    #[serde(deserialize_with = "de::loose_string")]
    pub sub_title: String,
    /// 推荐的歌曲
    #[serde(rename = "song_list")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub songs: Vec<DailyRecommendSong>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

/// 每日推荐中的一首歌。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyRecommendSong {
    /// 歌名
    #[serde(rename = "songname", deserialize_with = "de::loose_string")]
    pub name: String,
    /// 歌手名（组合字符串）
    #[serde(rename = "author_name", deserialize_with = "de::loose_string")]
    pub singer_name: String,
    /// 标准音质哈希
    #[serde(deserialize_with = "de::loose_string")]
    pub hash: String,
    /// 时长（秒）
    #[serde(rename = "time_length", deserialize_with = "de::loose_i64")]
    pub duration: i64,
    /// 专辑 ID
    #[serde(deserialize_with = "de::loose_string")]
    pub album_id: String,
    /// 专辑名
    #[serde(deserialize_with = "de::loose_string")]
    pub album_name: String,
    /// 歌曲 ID
    #[serde(rename = "songid", deserialize_with = "de::loose_i64")]
    pub audio_id: i64,
    /// 混合 ID，搜索歌词时使用
    #[serde(rename = "mixsongid", deserialize_with = "de::loose_string")]
    pub mix_song_id: String,
    /// 带 `{size}` 占位符的封面
    #[serde(deserialize_with = "de::loose_string")]
    pub sizable_cover: String,
    /// 推荐语
    #[serde(rename = "rec_copy_write", deserialize_with = "de::loose_string")]
    pub recommend_reason: String,
    /// 次级推荐语
    #[serde(rename = "rec_sub_copy_write", deserialize_with = "de::loose_string")]
    pub recommend_sub_reason: String,
    /// 320K 哈希
    #[serde(deserialize_with = "de::loose_string")]
    pub hash_320: String,
    /// 320K 文件大小
    #[serde(deserialize_with = "de::loose_i64")]
    pub filesize_320: i64,
    /// 无损哈希
    #[serde(deserialize_with = "de::loose_string")]
    pub hash_flac: String,
    /// 无损文件大小
    #[serde(deserialize_with = "de::loose_i64")]
    pub filesize_flac: i64,
    /// Hi-Res 哈希
    #[serde(rename = "hash_192", deserialize_with = "de::loose_string")]
    pub hash_hires: String,
    /// 权限位
    #[serde(deserialize_with = "de::loose_i64")]
    pub privilege: i64,
    /// 1 表示原唱
    #[serde(deserialize_with = "de::loose_i64")]
    pub is_original: i64,
    /// 歌手
    #[serde(rename = "singerinfo")]
    #[serde(deserialize_with = "de::loose_vec")]
    pub singers: Vec<SingerLite>,
    /// 未声明的字段
    #[serde(flatten)]
    pub extras: Extras,
}

impl DailyRecommendSong {
    /// 指定尺寸的封面地址，没有封面时为空串。
    #[must_use]
    pub fn cover_url(&self, size: u32) -> String {
        fill_size(&self.sizable_cover, size)
    }
}

impl_envelope!(DailyRecommendResponse);
