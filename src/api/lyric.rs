//! 歌词搜索与下载。

use serde_json::Value;
use tracing::instrument;

use crate::{
    error::Result,
    signature::{APP_ID, CLIENT_VER},
    transport::{KgRequest, Transport},
};

const LYRIC_HOST: &str = "https://lyrics.kugou.com";

/// 歌词相关的原始接口。
#[derive(Debug, Clone)]
pub struct LyricApi {
    transport: Transport,
}

impl LyricApi {
    /// 创建接口实例。
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// 搜索歌词候选，返回的 `candidates` 中含有下载所需的 `id` 与 `accesskey`。
    #[instrument(skip(self))]
    pub async fn search_lyric(
        &self,
        hash: Option<&str>,
        album_audio_id: Option<&str>,
        keyword: Option<&str>,
        man: Option<&str>,
    ) -> Result<Value> {
        let request = KgRequest::get("/v1/search")
            .host(LYRIC_HOST)
            .param("album_audio_id", album_audio_id.unwrap_or("0"))
            .param("appid", APP_ID)
            .param("clientver", CLIENT_VER)
            .param("duration", 0)
            .param("hash", hash.unwrap_or_default())
            .param("keyword", keyword.unwrap_or_default())
            .param("lrctxt", 1)
            .param("man", man.unwrap_or("no"));
        self.transport.send(request).await
    }

    /// 下载歌词。`content` 字段是 Base64 编码的歌词数据。
    #[instrument(skip(self, access_key))]
    pub async fn download_lyric(&self, id: &str, access_key: &str, fmt: &str) -> Result<Value> {
        let request = KgRequest::get("/download")
            .host(LYRIC_HOST)
            .param("ver", 1)
            .param("client", "android")
            .param("id", id)
            .param("accesskey", access_key)
            .param("fmt", fmt)
            .param("charset", "utf8");
        self.transport.send(request).await
    }
}
