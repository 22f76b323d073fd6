//! 搜索、播放链接、热搜和歌手歌曲接口。

use serde_json::{Value, json};
use tracing::instrument;

use super::now_secs;
use crate::{
    crypto::calc_mid,
    error::Result,
    signature::{APP_ID, CLIENT_VER, sign_login_key},
    transport::{KgRequest, SignatureScheme, Transport},
};

const OPENAPI_HOST: &str = "https://openapi.kugou.com";
/// 播放链接请求里声明的客户端版本号。
const PLAY_URL_VERSION: &str = "11436";

/// 搜索相关的原始接口。
#[derive(Debug, Clone)]
pub struct SearchApi {
    transport: Transport,
}

impl SearchApi {
    /// 创建接口实例。
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// 搜索歌曲。
    #[instrument(skip(self))]
    pub async fn search_song(&self, keyword: &str, page: u32, pagesize: u32) -> Result<Value> {
        let request = KgRequest::get("/v3/search/song")
            .param("keyword", keyword)
            .param("page", page)
            .param("pagesize", pagesize)
            .param("platform", "AndroidFilter")
            .param("iscorrection", 1)
            .router("complexsearch.kugou.com");
        self.transport.send(request).await
    }

    /// 获取播放链接。
    ///
    /// 每次请求都使用一个随机的 24 位设备 ID 参与签名。
    #[instrument(skip(self))]
    pub async fn get_play_url(&self, hash: &str, quality: &str) -> Result<Value> {
        let random_dfid: String = uuid::Uuid::new_v4().simple().to_string().chars().take(24).collect();
        let request = KgRequest::get("/v5/url")
            .param("album_id", 0)
            .param("area_code", 1)
            .param("hash", hash.to_lowercase())
            .param("ssa_flag", "is_fromtrack")
            .param("version", PLAY_URL_VERSION)
            .param("page_id", "967177915")
            .param("quality", quality)
            .param("album_audio_id", 0)
            .param("behavior", "play")
            .param("pid", 411)
            .param("cmd", 26)
            .param("pidversion", 3001)
            .param("IsFreePart", 0)
            .param("ppage_id", "356753938,823673182,967485191")
            .param("cdnBackup", 1)
            .param("kcard", 0)
            .param("module", "")
            .router("trackercdn.kugou.com")
            .signature(SignatureScheme::PlayUrlV5)
            .dfid(random_dfid);
        self.transport.send(request).await
    }

    /// 热搜榜。
    #[instrument(skip(self))]
    pub async fn search_hot(&self) -> Result<Value> {
        let request = KgRequest::get("/api/v3/search/hot_tab")
            .param("navid", 1)
            .param("plat", 2)
            .router("msearch.kugou.com");
        self.transport.send(request).await
    }

    /// 歌手的歌曲列表。`sort` 为 `"hot"` 时按热度，否则按发行时间。
    #[instrument(skip(self))]
    pub async fn get_singer_songs(
        &self,
        dfid: &str,
        author_id: &str,
        page: u32,
        pagesize: u32,
        sort: &str,
    ) -> Result<Value> {
        let clienttime = now_secs();
        let body = json!({
            "appid": APP_ID,
            "clientver": CLIENT_VER,
            "mid": calc_mid(dfid),
            "clienttime": clienttime,
            "key": sign_login_key(&clienttime.to_string()),
            "author_id": author_id,
            "pagesize": pagesize,
            "page": page,
            "sort": if sort == "hot" { 1 } else { 2 },
            "area_code": "all",
        });
        let request = KgRequest::post("/kmr/v1/audio_group/author")
            .host(OPENAPI_HOST)
            .router("openapi.kugou.com")
            .header("kg-tid", "220")
            .json(body);
        self.transport.send(request).await
    }
}
