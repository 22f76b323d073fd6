//! 用户中心接口。

use serde_json::{Value, json};
use tracing::instrument;

use super::{now_secs, token_proof};
use crate::{
    error::Result,
    transport::{KgRequest, Transport},
};

/// 用户相关的原始接口。
#[derive(Debug, Clone)]
pub struct UserApi {
    transport: Transport,
}

impl UserApi {
    /// 创建接口实例。
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// 用户资料。
    #[instrument(skip(self, token))]
    pub async fn get_user_detail(&self, userid: &str, token: &str) -> Result<Value> {
        let clienttime = now_secs();
        let p = token_proof(token, clienttime)?;
        let userid_value = userid
            .parse::<i64>()
            .map_or_else(|_| Value::String(userid.to_string()), Value::from);

        let request = KgRequest::post("/v3/get_my_info")
            .host("https://gateway.kugou.com")
            .param("plat", 1)
            .param("clienttime", clienttime)
            .router("usercenter.kugou.com")
            .json(json!({
                "visit_time": clienttime,
                "usertype": 1,
                "p": p,
                "userid": userid_value,
            }));
        self.transport.send(request).await
    }

    /// 会员详情。
    #[instrument(skip(self))]
    pub async fn get_vip_detail(&self) -> Result<Value> {
        let request = KgRequest::get("/v1/get_union_vip")
            .host("https://kugouvip.kugou.com")
            .param("busi_type", "concept");
        self.transport.send(request).await
    }

    /// 用户创建和收藏的歌单。
    #[instrument(skip(self, token))]
    pub async fn get_all_list(
        &self,
        userid: &str,
        token: &str,
        page: u32,
        pagesize: u32,
    ) -> Result<Value> {
        let request = KgRequest::post("/v7/get_all_list")
            .param("plat", 1)
            .param("userid", userid)
            .param("token", token)
            .router("cloudlist.service.kugou.com")
            .json(json!({
                "userid": userid,
                "token": token,
                "total_ver": 979,
                "type": 2,
                "page": page,
                "pagesize": pagesize,
            }));
        self.transport.send(request).await
    }

    /// 听歌历史。`bp` 是上一页返回的游标。
    #[instrument(skip(self, token))]
    pub async fn get_play_history(
        &self,
        userid: &str,
        token: &str,
        bp: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({
            "token": token,
            "userid": userid,
            "source_classify": "app",
            "to_subdivide_sr": 1,
        });
        if let Some(bp) = bp.filter(|bp| !bp.is_empty()) {
            body["bp"] = Value::String(bp.to_string());
        }
        let request = KgRequest::post("/playhistory/v1/get_songs").json(body);
        self.transport.send(request).await
    }

    /// 听歌排行。
    #[instrument(skip(self, token))]
    pub async fn get_listen_list(&self, userid: &str, token: &str, list_type: i64) -> Result<Value> {
        let p = token_proof(token, now_secs())?;
        let request = KgRequest::post("/v2/get_list")
            .host("https://listenservice.kugou.com")
            .param("plat", 0)
            .json(json!({
                "t_userid": userid,
                "userid": userid,
                "list_type": list_type,
                "area_code": 1,
                "cover": 2,
                "p": p,
            }));
        self.transport.send(request).await
    }

    /// 关注的歌手。
    #[instrument(skip(self, token))]
    pub async fn get_follow_singers(&self, userid: &str, token: &str) -> Result<Value> {
        let p = token_proof(token, now_secs())?;
        let request = KgRequest::post("/v4/follow_list")
            .param("plat", 1)
            .router("relationuser.kugou.com")
            .json(json!({
                "merge": 2,
                "need_iden_type": 1,
                "ext_params": "k_pic,jumptype,singerid,score",
                "userid": userid,
                "type": 0,
                "id_type": 0,
                "p": p,
            }));
        self.transport.send(request).await
    }

    /// 领取当天的听歌 VIP。
    #[instrument(skip(self))]
    pub async fn receive_one_day_vip(&self) -> Result<Value> {
        let receive_day = chrono::Local::now().format("%Y-%m-%d").to_string();
        let request = KgRequest::post("/youth/v1/recharge/receive_vip_listen_song")
            .param("source_id", 90139)
            .param("receive_day", receive_day);
        self.transport.send(request).await
    }

    /// 领取升级 VIP 奖励。
    #[instrument(skip(self))]
    pub async fn upgrade_vip_reward(&self, userid: &str) -> Result<Value> {
        let request = KgRequest::post("/youth/v1/listen_song/upgrade_vip_reward")
            .param("kugouid", userid)
            .param("ad_type", 1);
        self.transport.send(request).await
    }

    /// 当月的 VIP 领取记录。
    #[instrument(skip(self))]
    pub async fn get_vip_record(&self) -> Result<Value> {
        let request =
            KgRequest::get("/youth/v1/activity/get_month_vip_record").param("latest_limit", 100);
        self.transport.send(request).await
    }
}
