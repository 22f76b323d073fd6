//! 发现页接口：推荐歌单、新歌速递和每日推荐。

use serde_json::{Value, json};
use tracing::instrument;

use super::now_secs;
use crate::{
    crypto::md5_hex,
    error::Result,
    session::ANONYMOUS_DFID,
    signature::{APP_ID, CLIENT_VER, sign_login_key},
    transport::{KgRequest, Transport},
};

/// 发现页相关的原始接口。
#[derive(Debug, Clone)]
pub struct DiscoveryApi {
    transport: Transport,
}

impl DiscoveryApi {
    /// 创建接口实例。
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// 推荐歌单。`category_id` 为 0 时是综合推荐，11292 为 Hi-Res。
    #[instrument(skip(self))]
    pub async fn get_recommended_playlists(
        &self,
        userid: &str,
        dfid: &str,
        category_id: i64,
        page: u32,
        pagesize: u32,
    ) -> Result<Value> {
        let clienttime = now_secs();
        let dfid = if dfid.is_empty() { ANONYMOUS_DFID } else { dfid };
        let body = json!({
            "appid": APP_ID,
            "mid": md5_hex(dfid),
            "clientver": CLIENT_VER,
            "platform": "android",
            "clienttime": clienttime,
            "userid": userid,
            "module_id": 1,
            "page": page,
            "pagesize": pagesize,
            "key": sign_login_key(&clienttime.to_string()),
            "special_recommend": {
                "withtag": 1,
                "withsong": 1,
                "sort": 1,
                "ugc": 1,
                "is_selected": 0,
                "withrecommend": 1,
                "area_code": 1,
                "categoryid": category_id,
            },
            "req_multi": 1,
            "retrun_min": 5,
            "return_special_falg": 1,
        });
        let request = KgRequest::post("/v2/special_recommend")
            .router("specialrec.service.kugou.com")
            .json(body);
        self.transport.send(request).await
    }

    /// 新歌速递。
    #[instrument(skip(self))]
    pub async fn get_new_songs(
        &self,
        userid: &str,
        rank_id: i64,
        page: u32,
        pagesize: u32,
    ) -> Result<Value> {
        let request = KgRequest::post("/musicadservice/container/v1/newsong_publish").json(json!({
            "rank_id": rank_id,
            "userid": userid,
            "page": page,
            "pagesize": pagesize,
            "tags": [],
        }));
        self.transport.send(request).await
    }

    /// 每日推荐歌曲。
    #[instrument(skip(self))]
    pub async fn get_everyday_recommend(&self, userid: &str) -> Result<Value> {
        let request = KgRequest::post("/everyday_song_recommend")
            .router("everydayrec.service.kugou.com")
            .json(json!({ "platform": "android", "userid": userid }));
        self.transport.send(request).await
    }

    /// 每日风格推荐。
    #[instrument(skip(self))]
    pub async fn get_style_recommend(&self) -> Result<Value> {
        let request = KgRequest::post("/everydayrec.service/everyday_style_recommend")
            .param("tagids", "")
            .json(json!({ "platform": "android" }));
        self.transport.send(request).await
    }
}
