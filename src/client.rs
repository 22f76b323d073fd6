//! 面向调用者的 [`KugouClient`]。
//!
//! 客户端持有会话和所有原始接口，负责登录检查、分页换算、
//! 把原始 JSON 解析为模型，以及在登录、刷新和设备注册成功后写回会话。

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::cookie::Jar;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    api::{
        DeviceApi, DiscoveryApi, LoginApi, LyricApi, PlaylistApi, RankApi, SearchApi, UserApi,
        playlist::SongToAdd,
    },
    config::ClientConfig,
    crypto::decode_lyric_blob,
    envelope,
    error::{KugouError, Result},
    lyrics::{LyricDocument, parse_krc},
    models::{
        AudioQuality, DailyRecommendResponse, OneDayVipModel, PlayUrlData, PlaylistInfo,
        PlaylistSong, PlaylistSongResponse, RefreshTokenResponse, SearchHotResponse,
        SearchResultData, SongInfo, UpgradeVipModel, UserDetailModel, UserPlaylistItem,
        UserPlaylistResponse, UserVipResponse, VipReceiveHistoryResponse, de::as_i64,
    },
    session::{AuthUpdate, Session, SessionManager},
    transport::{HttpSender, ReqwestSender, Transport},
};

/// 搜索接口的默认每页条数。
const SEARCH_PAGE_SIZE: u32 = 30;
/// 二维码状态中表示“已确认登录”的值。
const QR_CONFIRMED: i64 = 4;

/// 歌单详情和歌曲列表。
#[derive(Debug, Clone, Default)]
pub struct PlaylistDetail {
    /// 歌单信息，接口失败时为 `None`。
    pub info: Option<PlaylistInfo>,
    /// 当前页的歌曲。
    pub songs: Vec<PlaylistSong>,
}

/// [`KugouClient::get_lyric`] 的结果。
#[derive(Debug, Clone, Default)]
pub struct LyricResult {
    /// 响应中原始的 `content` 字段。
    pub raw_content: Option<String>,
    /// 解码后的歌词文本。
    pub decoded_content: Option<String>,
    /// 解码后的 `trans` 字段。
    pub decoded_translation: Option<String>,
    /// KRC 格式时解析出的歌词。
    pub document: Option<LyricDocument>,
    /// 完整的原始响应。
    pub raw_json: Value,
}

/// 酷狗概念版客户端。
#[derive(Debug, Clone)]
pub struct KugouClient {
    session: Arc<SessionManager>,
    login_api: LoginApi,
    device_api: DeviceApi,
    search_api: SearchApi,
    playlist_api: PlaylistApi,
    user_api: UserApi,
    lyric_api: LyricApi,
    rank_api: RankApi,
    discovery_api: DiscoveryApi,
}

impl KugouClient {
    /// 加载会话并创建一个使用 `reqwest` 的客户端。
    pub fn new(config: ClientConfig) -> Result<Self> {
        let cookies = Arc::new(Jar::default());
        let session = Arc::new(SessionManager::bootstrap(&config, Arc::clone(&cookies))?);
        let sender: Arc<dyn HttpSender> = Arc::new(ReqwestSender::new(cookies)?);
        Ok(Self::assemble(&config, session, sender))
    }

    /// 使用自定义的 [`HttpSender`] 创建客户端。
    pub fn with_sender(config: ClientConfig, sender: Arc<dyn HttpSender>) -> Result<Self> {
        let session = Arc::new(SessionManager::bootstrap(
            &config,
            Arc::new(Jar::default()),
        )?);
        Ok(Self::assemble(&config, session, sender))
    }

    fn assemble(
        config: &ClientConfig,
        session: Arc<SessionManager>,
        sender: Arc<dyn HttpSender>,
    ) -> Self {
        let transport = Transport::new(
            sender,
            Arc::clone(&session),
            config.gateway.clone(),
            config.user_agent.clone(),
        );
        Self {
            session,
            login_api: LoginApi::new(transport.clone()),
            device_api: DeviceApi::new(transport.clone()),
            search_api: SearchApi::new(transport.clone()),
            playlist_api: PlaylistApi::new(transport.clone()),
            user_api: UserApi::new(transport.clone()),
            lyric_api: LyricApi::new(transport.clone()),
            rank_api: RankApi::new(transport.clone()),
            discovery_api: DiscoveryApi::new(transport),
        }
    }

    /// 当前会话的快照。
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    /// 共享的会话管理器。
    #[must_use]
    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// 已登录时返回 `(userid, token)`。
    fn credentials(&self) -> Option<(String, String)> {
        let session = self.session.snapshot();
        session
            .is_logged_in()
            .then(|| (session.userid, session.token))
    }

    fn require_login(&self) -> Result<(String, String)> {
        self.credentials().ok_or(KugouError::LoginRequired)
    }

    // =================================================================
    // 认证与设备
    // =================================================================

    /// 发送短信验证码。
    #[instrument(skip(self, mobile))]
    pub async fn send_sms_code(&self, mobile: &str) -> Result<Value> {
        self.login_api.send_sms_code(mobile).await
    }

    /// 手机验证码登录。成功拿到令牌时写回会话。
    #[instrument(skip(self, mobile, code))]
    pub async fn login_by_mobile(&self, mobile: &str, code: &str) -> Result<Value> {
        let response = self.login_api.login_by_mobile(mobile, code).await?;
        if let Some(auth) = auth_from_response(&response, true) {
            info!(userid = %auth.userid, "短信登录成功");
            self.session.update_auth(auth)?;
        }
        Ok(response)
    }

    /// 申请登录二维码，`data.qrcode` 是用于轮询的 key。
    #[instrument(skip(self))]
    pub async fn get_qr_code(&self) -> Result<Value> {
        self.login_api.get_qr_key().await
    }

    /// 轮询二维码状态。`data.status` 为 4 时表示登录成功，此时会写回会话。
    ///
    /// 扫码登录不会返回 `t1`，登录后应调用一次 [`Self::refresh_session`]。
    #[instrument(skip(self))]
    pub async fn check_qr_status(&self, key: &str) -> Result<Value> {
        let response = self.login_api.check_qr_status(key).await?;
        let confirmed = response.pointer("/data/status").and_then(as_i64) == Some(QR_CONFIRMED);
        if confirmed && let Some(auth) = auth_from_response(&response, false) {
            info!(userid = %auth.userid, "扫码登录成功");
            self.session.update_auth(auth)?;
        }
        Ok(response)
    }

    /// 刷新令牌。匿名会话直接返回一个空结果，不发请求。
    #[instrument(skip(self))]
    pub async fn refresh_session(&self) -> Result<RefreshTokenResponse> {
        let Some((userid, token)) = self.credentials() else {
            info!("本地没有有效的令牌，跳过刷新。");
            return Ok(RefreshTokenResponse::default());
        };

        let response = self.login_api.refresh_token(&userid, &token).await?;
        let Some(refreshed) = envelope::parse::<RefreshTokenResponse>(&response) else {
            return Ok(RefreshTokenResponse::default());
        };

        if refreshed.status == Some(1) && !refreshed.token.is_empty() {
            self.session.update_auth(AuthUpdate {
                userid: refreshed.userid.clone(),
                token: refreshed.token.clone(),
                vip_type: refreshed.is_vip.to_string(),
                vip_token: String::new(),
                t1: refreshed.t1.clone(),
            })?;
            info!(userid = %refreshed.userid, "令牌刷新成功");
        } else {
            warn!(
                status = ?refreshed.status,
                error_code = ?refreshed.error_code,
                "令牌刷新失败"
            );
        }
        Ok(refreshed)
    }

    /// 退出登录。
    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }

    /// 确保设备已注册。
    ///
    /// 本地已有设备 ID 时直接返回；否则注册一次，并发调用只会发出一个请求。
    ///
    /// # 返回
    /// 调用结束时会话是否持有有效的设备 ID。
    #[instrument(skip(self))]
    pub async fn init_device(&self) -> Result<bool> {
        let device_api = self.device_api.clone();
        self.session
            .register_device_with(|session| async move {
                let response = device_api
                    .register_dev(&session.userid, &session.token)
                    .await?;
                Ok::<_, KugouError>(dfid_from_response(&response))
            })
            .await?;
        Ok(!self.session.snapshot().needs_device_registration())
    }

    // =================================================================
    // 搜索与播放
    // =================================================================

    /// 搜索歌曲。失败时返回空列表。
    #[instrument(skip(self))]
    pub async fn search(&self, keyword: &str, page: u32) -> Result<Vec<SongInfo>> {
        let response = self
            .search_api
            .search_song(keyword, page, SEARCH_PAGE_SIZE)
            .await?;
        Ok(envelope::parse::<SearchResultData>(&response)
            .map(|data| data.songs)
            .unwrap_or_default())
    }

    /// 获取播放链接。
    ///
    /// 这个接口不使用通用外壳，直接按根节点解析；无法解析时返回 `status = 0` 的结果。
    #[instrument(skip(self))]
    pub async fn get_play_info(&self, hash: &str, quality: AudioQuality) -> Result<PlayUrlData> {
        let response = self
            .search_api
            .get_play_url(hash, &quality.to_string())
            .await?;
        Ok(serde_json::from_value::<PlayUrlData>(response).unwrap_or_else(|e| {
            warn!("解析播放链接失败: {e}");
            PlayUrlData {
                status: Some(0),
                ..PlayUrlData::default()
            }
        }))
    }

    /// 热搜榜。
    #[instrument(skip(self))]
    pub async fn get_search_hot(&self) -> Result<Option<SearchHotResponse>> {
        let response = self.search_api.search_hot().await?;
        Ok(envelope::parse(&response))
    }

    /// 歌手的歌曲。`sort` 为 `"hot"` 时按热度排序。
    #[instrument(skip(self))]
    pub async fn get_singer_songs(
        &self,
        author_id: &str,
        page: u32,
        pagesize: u32,
        sort: &str,
    ) -> Result<Value> {
        let dfid = self.session.snapshot().dfid;
        self.search_api
            .get_singer_songs(&dfid, author_id, page, pagesize, sort)
            .await
    }

    // =================================================================
    // 歌单
    // =================================================================

    /// 并发获取歌单详情和某一页的歌曲。
    #[instrument(skip(self))]
    pub async fn get_playlist(
        &self,
        playlist_id: &str,
        page: u32,
        pagesize: u32,
    ) -> Result<PlaylistDetail> {
        let (info, songs) = futures::try_join!(
            self.get_playlist_info(playlist_id),
            self.get_playlist_songs(playlist_id, page, pagesize),
        )?;
        Ok(PlaylistDetail { info, songs })
    }

    /// 歌单中的歌曲。`page` 从 1 开始。
    #[instrument(skip(self))]
    pub async fn get_playlist_songs(
        &self,
        playlist_id: &str,
        page: u32,
        pagesize: u32,
    ) -> Result<Vec<PlaylistSong>> {
        let begin_idx = page.saturating_sub(1).saturating_mul(pagesize);
        let response = self
            .playlist_api
            .get_playlist_songs(playlist_id, begin_idx, pagesize)
            .await?;
        Ok(envelope::parse::<PlaylistSongResponse>(&response)
            .map(|data| data.songs)
            .unwrap_or_default())
    }

    /// 歌单详情。匿名会话也可以调用。
    #[instrument(skip(self))]
    pub async fn get_playlist_info(&self, playlist_id: &str) -> Result<Option<PlaylistInfo>> {
        let session = self.session.snapshot();
        let response = self
            .playlist_api
            .get_playlist_info(playlist_id, &session.userid, &session.token)
            .await?;
        Ok(envelope::parse::<Vec<PlaylistInfo>>(&response).and_then(|list| list.into_iter().next()))
    }

    /// 歌单分类。
    #[instrument(skip(self))]
    pub async fn get_playlist_tags(&self) -> Result<Value> {
        self.playlist_api.get_playlist_tags().await
    }

    /// 收藏别人的歌单（`kind = 1`）或新建歌单（`kind = 0`）。需要登录。
    #[instrument(skip(self))]
    pub async fn collect_playlist(
        &self,
        name: &str,
        source_userid: &str,
        source_listid: &str,
        source_gid: &str,
        kind: i64,
    ) -> Result<Value> {
        let (userid, token) = self.require_login()?;
        self.playlist_api
            .collect_playlist(
                &userid,
                &token,
                source_userid,
                source_listid,
                source_gid,
                name,
                kind,
            )
            .await
    }

    /// 删除或取消收藏歌单。`listid` 是用户歌单的数字 ID。需要登录。
    #[instrument(skip(self))]
    pub async fn delete_playlist(&self, listid: &str) -> Result<Value> {
        let (userid, token) = self.require_login()?;
        self.playlist_api
            .delete_playlist(&userid, &token, listid)
            .await
    }

    /// 向歌单添加歌曲。需要登录，`songs` 为空时不发请求。
    #[instrument(skip(self, songs), fields(count = songs.len()))]
    pub async fn add_songs(&self, listid: &str, songs: &[SongToAdd]) -> Result<Option<Value>> {
        let (userid, token) = self.require_login()?;
        if songs.is_empty() {
            return Ok(None);
        }
        self.playlist_api
            .add_songs(&userid, &token, listid, songs)
            .await
            .map(Some)
    }

    /// 从歌单删除歌曲。需要登录，`file_ids` 为空时不发请求。
    #[instrument(skip(self))]
    pub async fn remove_songs(&self, listid: &str, file_ids: &[i64]) -> Result<Option<Value>> {
        let (userid, token) = self.require_login()?;
        if file_ids.is_empty() {
            return Ok(None);
        }
        self.playlist_api
            .remove_songs(&userid, &token, listid, file_ids)
            .await
            .map(Some)
    }

    // =================================================================
    // 歌词
    // =================================================================

    /// 搜索歌词候选。
    #[instrument(skip(self))]
    pub async fn search_lyric(
        &self,
        hash: Option<&str>,
        album_audio_id: Option<&str>,
        keyword: Option<&str>,
        man: Option<&str>,
    ) -> Result<Value> {
        self.lyric_api
            .search_lyric(hash, album_audio_id, keyword, man)
            .await
    }

    /// 下载歌词。
    ///
    /// `decode` 为真时解码 `content` 与 `trans`：`fmt` 为 `lrc` 或 `contenttype` 非 0 时
    /// `content` 只是 Base64 文本，否则按 KRC 数据块解密并解析。
    #[instrument(skip(self, access_key))]
    pub async fn get_lyric(
        &self,
        id: &str,
        access_key: &str,
        fmt: &str,
        decode: bool,
    ) -> Result<LyricResult> {
        let response = self.lyric_api.download_lyric(id, access_key, fmt).await?;
        Ok(decode_lyric_response(response, fmt, decode))
    }

    // =================================================================
    // 用户
    // =================================================================

    /// 用户资料。未登录时返回 `None`。
    #[instrument(skip(self))]
    pub async fn get_user_info(&self) -> Result<Option<UserDetailModel>> {
        let Some((userid, token)) = self.credentials() else {
            return Ok(None);
        };
        let response = self.user_api.get_user_detail(&userid, &token).await?;
        Ok(envelope::parse(&response))
    }

    /// 会员状态。
    #[instrument(skip(self))]
    pub async fn get_vip_info(&self) -> Result<Option<UserVipResponse>> {
        let response = self.user_api.get_vip_detail().await?;
        Ok(envelope::parse(&response))
    }

    /// 用户的歌单。未登录时返回 `None`，解析失败时返回空列表。
    #[instrument(skip(self))]
    pub async fn get_user_playlists(
        &self,
        page: u32,
        pagesize: u32,
    ) -> Result<Option<Vec<UserPlaylistItem>>> {
        let Some((userid, token)) = self.credentials() else {
            return Ok(None);
        };
        let response = self
            .user_api
            .get_all_list(&userid, &token, page, pagesize)
            .await?;
        Ok(Some(
            envelope::parse::<UserPlaylistResponse>(&response)
                .map(|data| data.playlists)
                .unwrap_or_default(),
        ))
    }

    /// 听歌历史。未登录时返回 `None`。
    #[instrument(skip(self))]
    pub async fn get_play_history(&self, bp: Option<&str>) -> Result<Option<Value>> {
        let Some((userid, token)) = self.credentials() else {
            return Ok(None);
        };
        self.user_api
            .get_play_history(&userid, &token, bp)
            .await
            .map(Some)
    }

    /// 听歌排行，`list_type = 0` 为全部时间。未登录时返回 `None`。
    #[instrument(skip(self))]
    pub async fn get_listen_rank(&self, list_type: i64) -> Result<Option<Value>> {
        let Some((userid, token)) = self.credentials() else {
            return Ok(None);
        };
        self.user_api
            .get_listen_list(&userid, &token, list_type)
            .await
            .map(Some)
    }

    /// 关注的歌手。未登录时返回 `None`。
    #[instrument(skip(self))]
    pub async fn get_followed_singers(&self) -> Result<Option<Value>> {
        let Some((userid, token)) = self.credentials() else {
            return Ok(None);
        };
        self.user_api
            .get_follow_singers(&userid, &token)
            .await
            .map(Some)
    }

    /// 领取当天的听歌 VIP。未登录时返回 `None`。
    #[instrument(skip(self))]
    pub async fn receive_one_day_vip(&self) -> Result<Option<OneDayVipModel>> {
        if self.credentials().is_none() {
            return Ok(None);
        }
        let response = self.user_api.receive_one_day_vip().await?;
        Ok(envelope::parse(&response))
    }

    /// 领取升级 VIP 奖励。未登录时返回 `None`。
    #[instrument(skip(self))]
    pub async fn upgrade_vip_reward(&self) -> Result<Option<UpgradeVipModel>> {
        let Some((userid, _)) = self.credentials() else {
            return Ok(None);
        };
        let response = self.user_api.upgrade_vip_reward(&userid).await?;
        Ok(envelope::parse(&response))
    }

    /// 当月的 VIP 领取记录。未登录时返回 `None`。
    #[instrument(skip(self))]
    pub async fn get_vip_record(&self) -> Result<Option<VipReceiveHistoryResponse>> {
        if self.credentials().is_none() {
            return Ok(None);
        }
        let response = self.user_api.get_vip_record().await?;
        Ok(envelope::parse(&response))
    }

    // =================================================================
    // 排行榜
    // =================================================================

    /// 全部排行榜。`with_song` 为 1 时附带每个榜单的前几首歌。
    #[instrument(skip(self))]
    pub async fn get_all_ranks(&self, with_song: i64) -> Result<Value> {
        self.rank_api.get_rank_list(with_song).await
    }

    /// 推荐排行榜。
    #[instrument(skip(self))]
    pub async fn get_recommended_ranks(&self) -> Result<Value> {
        self.rank_api.get_rank_top().await
    }

    /// 某个排行榜的歌曲。
    #[instrument(skip(self))]
    pub async fn get_rank_songs(
        &self,
        rank_id: i64,
        page: u32,
        pagesize: u32,
        rank_cid: Option<i64>,
    ) -> Result<Value> {
        self.rank_api
            .get_rank_audio(rank_id, rank_cid, page, pagesize)
            .await
    }

    /// 排行榜的往期列表。
    #[instrument(skip(self))]
    pub async fn get_rank_history(&self, rank_id: i64, rank_cid: Option<i64>) -> Result<Value> {
        self.rank_api.get_rank_vol(rank_id, rank_cid).await
    }

    // =================================================================
    // 发现
    // =================================================================

    /// 推荐歌单。`category_id` 为 0 时是综合推荐。
    #[instrument(skip(self))]
    pub async fn get_recommended_playlists(
        &self,
        category_id: i64,
        page: u32,
        pagesize: u32,
    ) -> Result<Value> {
        let session = self.session.snapshot();
        self.discovery_api
            .get_recommended_playlists(&session.userid, &session.dfid, category_id, page, pagesize)
            .await
    }

    /// 新歌速递。常用的 `rank_id` 是 21608。
    #[instrument(skip(self))]
    pub async fn get_new_songs(&self, rank_id: i64, page: u32, pagesize: u32) -> Result<Value> {
        let userid = self.session.snapshot().userid;
        self.discovery_api
            .get_new_songs(&userid, rank_id, page, pagesize)
            .await
    }

    /// 每日推荐歌曲。
    #[instrument(skip(self))]
    pub async fn get_daily_recommend(&self) -> Result<Option<DailyRecommendResponse>> {
        let userid = self.session.snapshot().userid;
        let response = self.discovery_api.get_everyday_recommend(&userid).await?;
        Ok(envelope::parse(&response))
    }

    /// 每日风格推荐。
    #[instrument(skip(self))]
    pub async fn get_style_recommend(&self) -> Result<Value> {
        self.discovery_api.get_style_recommend().await
    }
}

/// 从登录类响应的 `data` 中提取凭据。令牌为空时返回 `None`。
fn auth_from_response(response: &Value, keep_t1: bool) -> Option<AuthUpdate> {
    let data = response.get("data")?;
    let token = data.get("token").and_then(Value::as_str)?;
    if token.is_empty() {
        return None;
    }
    let userid = match data.get("userid") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => as_i64(other)?.to_string(),
        None => return None,
    };
    let t1 = if keep_t1 {
        data.get("t1")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    } else {
        String::new()
    };

    Some(AuthUpdate {
        userid,
        token: token.to_string(),
        vip_type: "0".to_string(),
        vip_token: String::new(),
        t1,
    })
}

/// 设备注册成功时的 `data.dfid`。
fn dfid_from_response(response: &Value) -> Option<String> {
    if response.get("status").and_then(as_i64) != Some(1) {
        warn!("设备注册失败: {response}");
        return None;
    }
    response
        .pointer("/data/dfid")
        .and_then(Value::as_str)
        .filter(|dfid| !dfid.is_empty())
        .map(str::to_string)
}

fn decode_base64_text(encoded: &str) -> Option<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| warn!("歌词不是有效的 Base64: {e}"))
        .ok()?;
    String::from_utf8(bytes)
        .map_err(|e| warn!("歌词不是有效的 UTF-8: {e}"))
        .ok()
}

fn decode_lyric_response(response: Value, fmt: &str, decode: bool) -> LyricResult {
    let raw_content = response
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut result = LyricResult {
        raw_content,
        ..LyricResult::default()
    };

    if decode {
        if let Some(content) = result.raw_content.as_deref().filter(|c| !c.is_empty()) {
            let content_type = response.get("contenttype").and_then(as_i64).unwrap_or(0);
            if fmt == "lrc" || content_type != 0 {
                result.decoded_content = decode_base64_text(content);
            } else {
                let krc = decode_lyric_blob(content);
                result.document = Some(parse_krc(&krc));
                result.decoded_content = Some(krc);
            }
        }

        result.decoded_translation = response
            .get("trans")
            .and_then(Value::as_str)
            .and_then(decode_base64_text);
    }

    result.raw_json = response;
    result
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const KRC_BLOB: &str = "a3JjMTjb6jlygH4OfBh4AEQ35F+QdlVHbrrBdoEHBB0e496aCIrQdu8SyNstGDEZUN5j";

    #[test]
    fn test_auth_from_response() {
        let response = json!({
            "status": 1,
            "data": { "userid": 10086, "token": "tok", "t1": "t1v" }
        });
        let auth = auth_from_response(&response, true).unwrap();
        assert_eq!(auth.userid, "10086");
        assert_eq!(auth.token, "tok");
        assert_eq!(auth.vip_type, "0");
        assert_eq!(auth.t1, "t1v");

        assert!(auth_from_response(&response, false).unwrap().t1.is_empty());
        assert!(auth_from_response(&json!({ "data": { "userid": 1, "token": "" } }), true).is_none());
        assert!(auth_from_response(&json!({ "status": 0, "error_code": 20028 }), true).is_none());
    }

    #[test]
    fn test_dfid_from_response() {
        assert_eq!(
            dfid_from_response(&json!({ "status": 1, "data": { "dfid": "abc" } })).as_deref(),
            Some("abc")
        );
        assert!(dfid_from_response(&json!({ "status": 0, "data": { "dfid": "abc" } })).is_none());
        assert!(dfid_from_response(&json!({ "status": 1, "data": {} })).is_none());
    }

    #[test]
    fn test_decode_krc_response() {
        let response = json!({ "status": 200, "content": KRC_BLOB, "contenttype": 0, "fmt": "krc" });
        let result = decode_lyric_response(response, "krc", true);

        assert_eq!(result.raw_content.as_deref(), Some(KRC_BLOB));
        assert_eq!(
            result.decoded_content.as_deref(),
            Some("[ar:Tester]\n[0,1000]<0,500,0>Hel<500,500,0>lo\n")
        );
        let document = result.document.unwrap();
        assert_eq!(document.lines[0].text, "Hello");
        assert_eq!(document.metadata.get("ar").map(String::as_str), Some("Tester"));
        assert!(result.decoded_translation.is_none());
    }

    #[test]
    fn test_decode_plain_lrc_response() {
        let content = STANDARD.encode("[00:01.00]你好");
        let trans = STANDARD.encode("hello");
        let response = json!({ "content": content, "contenttype": 2, "trans": trans });
        let result = decode_lyric_response(response, "krc", true);
        assert_eq!(result.decoded_content.as_deref(), Some("[00:01.00]你好"));
        assert_eq!(result.decoded_translation.as_deref(), Some("hello"));
        assert!(result.document.is_none());

        let lrc = json!({ "content": STANDARD.encode("x") });
        assert_eq!(
            decode_lyric_response(lrc, "lrc", true).decoded_content.as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_decode_disabled_or_broken() {
        let response = json!({ "content": KRC_BLOB });
        let result = decode_lyric_response(response.clone(), "krc", false);
        assert!(result.decoded_content.is_none());
        assert_eq!(result.raw_json, response);

        let broken = json!({ "content": "%%%", "contenttype": 1 });
        assert!(decode_lyric_response(broken, "krc", true).decoded_content.is_none());
    }
}
