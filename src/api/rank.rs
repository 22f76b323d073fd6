//! 排行榜接口。

use serde_json::{Value, json};
use tracing::instrument;

use crate::{
    error::Result,
    transport::{KgRequest, Transport},
};

/// 排行榜相关的原始接口。
#[derive(Debug, Clone)]
pub struct RankApi {
    transport: Transport,
}

impl RankApi {
    /// 创建接口实例。
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// 排行榜中的歌曲。
    #[instrument(skip(self))]
    pub async fn get_rank_audio(
        &self,
        rank_id: i64,
        rank_cid: Option<i64>,
        page: u32,
        pagesize: u32,
    ) -> Result<Value> {
        let request = KgRequest::post("/openapi/kmr/v2/rank/audio")
            .header("kg-tid", "369")
            .json(json!({
                "show_portrait_mv": 1,
                "show_type_total": 1,
                "filter_original_remarks": 1,
                "area_code": 1,
                "pagesize": pagesize,
                "rank_cid": rank_cid.unwrap_or(0),
                "type": 1,
                "page": page,
                "rank_id": rank_id,
            }));
        self.transport.send(request).await
    }

    /// 全部排行榜。`with_song` 为 1 时附带每个榜单的前几首歌。
    #[instrument(skip(self))]
    pub async fn get_rank_list(&self, with_song: i64) -> Result<Value> {
        let request = KgRequest::get("/ocean/v6/rank/list")
            .param("plat", 2)
            .param("withsong", with_song)
            .param("parentid", 0);
        self.transport.send(request).await
    }

    /// 推荐排行榜。
    #[instrument(skip(self))]
    pub async fn get_rank_top(&self) -> Result<Value> {
        let request = KgRequest::get("/mobileservice/api/v5/rank/rec_rank_list");
        self.transport.send(request).await
    }

    /// 排行榜的往期列表。
    #[instrument(skip(self))]
    pub async fn get_rank_vol(&self, rank_id: i64, rank_cid: Option<i64>) -> Result<Value> {
        let request = KgRequest::get("/ocean/v6/rank/vol")
            .param("rank_cid", rank_cid.unwrap_or(0))
            .param("rank_id", rank_id)
            .param("ranktype", 0)
            .param("type", 0)
            .param("plat", 2);
        self.transport.send(request).await
    }
}
