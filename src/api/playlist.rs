//! 歌单接口：读取、收藏、删除、增删歌曲与分类。

use serde_json::{Value, json};
use tracing::{instrument, warn};

use super::{now_secs, open_opaque};
use crate::{
    crypto::recipe::{KeyWrap, Recipe, Sealed},
    error::Result,
    signature::{APP_ID, CLIENT_VER, sign_login_key},
    transport::{KgRequest, Transport},
};

const CLOUDLIST_ROUTER: &str = "cloudlist.service.kugou.com";
const LAST_AREA: &str = "gztx";

/// 加入歌单的一首歌。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongToAdd {
    /// 歌名
    pub name: String,
    /// 文件哈希
    pub hash: String,
    /// 专辑 ID
    pub album_id: String,
    /// 混合 ID
    pub mix_song_id: String,
}

/// 歌单相关的原始接口。
#[derive(Debug, Clone)]
pub struct PlaylistApi {
    transport: Transport,
}

impl PlaylistApi {
    /// 创建接口实例。
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// 获取歌单中的歌曲。`begin_idx` 是起始下标而不是页码。
    #[instrument(skip(self))]
    pub async fn get_playlist_songs(
        &self,
        playlist_id: &str,
        begin_idx: u32,
        pagesize: u32,
    ) -> Result<Value> {
        let request = KgRequest::get("/pubsongs/v2/get_other_list_file_nofilt")
            .param("area_code", 1)
            .param("begin_idx", begin_idx)
            .param("plat", 1)
            .param("type", 1)
            .param("mode", 1)
            .param("personal_switch", 1)
            .param("extend_fields", "abtags,hot_cmt,popularization")
            .param("pagesize", pagesize)
            .param("global_collection_id", playlist_id);
        self.transport.send(request).await
    }

    /// 获取歌单详情。
    #[instrument(skip(self, token))]
    pub async fn get_playlist_info(
        &self,
        playlist_id: &str,
        userid: &str,
        token: &str,
    ) -> Result<Value> {
        let body = json!({
            "data": [{ "global_collection_id": playlist_id }],
            "userid": userid,
            "token": token,
        });
        let request = KgRequest::post("/v3/get_list_info")
            .router("pubsongs.kugou.com")
            .json(body);
        self.transport.send(request).await
    }

    /// 收藏（`kind = 1`）或创建（`kind = 0`）歌单。
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, token))]
    pub async fn collect_playlist(
        &self,
        userid: &str,
        token: &str,
        list_create_userid: &str,
        list_create_listid: &str,
        list_create_gid: &str,
        name: &str,
        kind: i64,
    ) -> Result<Value> {
        let body = json!({
            "userid": userid,
            "token": token,
            "total_ver": 0,
            "name": name,
            "type": kind,
            "source": 1,
            "is_pri": 0,
            "list_create_userid": list_create_userid,
            "list_create_listid": list_create_listid,
            "list_create_gid": list_create_gid,
            "from_shupinmv": 0,
        });
        let request = KgRequest::post("/cloudlist.service/v5/add_list")
            .param("last_time", now_secs())
            .param("last_area", LAST_AREA)
            .param("userid", userid)
            .param("token", token)
            .json(body);
        self.transport.send(request).await
    }

    /// 删除或取消收藏歌单。
    ///
    /// 请求体用歌单 AES 变体加密，响应也用同一密钥加密；无法解密时返回原始响应。
    #[instrument(skip(self, token))]
    pub async fn delete_playlist(&self, userid: &str, token: &str, listid: &str) -> Result<Value> {
        let listid_value = listid
            .parse::<i64>()
            .map_or_else(|_| Value::String(listid.to_string()), Value::from);
        let payload = json!({ "listid": listid_value, "total_ver": 0, "type": 1 });

        let sealed = Recipe::PlaylistAes.seal(&payload.to_string())?;
        self.send_delete(userid, token, sealed).await
    }

    /// 发送已加密的删除请求，并用同一密钥解开响应。
    async fn send_delete(&self, userid: &str, token: &str, sealed: Sealed) -> Result<Value> {
        let clienttime = now_secs();
        let p = KeyWrap::Pkcs1.wrap(&json!({ "aes": sealed.key, "uid": userid, "token": token }))?;

        let request = KgRequest::post("/v2/delete_list")
            .param("clienttime", clienttime)
            .param("key", sign_login_key(&clienttime.to_string()))
            .param("last_area", LAST_AREA)
            .param("clientver", CLIENT_VER)
            .param("appid", APP_ID)
            .param("last_time", clienttime)
            .param("p", p)
            .router(CLOUDLIST_ROUTER)
            .raw(sealed.ciphertext, "text/plain");

        let response = self.transport.send(request).await?;
        Ok(open_opaque(&response, Recipe::PlaylistAes, &sealed.key).unwrap_or_else(|| {
            warn!("删除歌单的响应无法解密，返回原始响应");
            response
        }))
    }

    /// 歌单分类。
    #[instrument(skip(self))]
    pub async fn get_playlist_tags(&self) -> Result<Value> {
        let request = KgRequest::post("/pubsongs/v1/get_tags_by_type").json(json!({
            "tag_type": "collection",
            "tag_id": 0,
            "source": 3,
        }));
        self.transport.send(request).await
    }

    /// 向歌单添加歌曲。
    #[instrument(skip(self, token, songs), fields(count = songs.len()))]
    pub async fn add_songs(
        &self,
        userid: &str,
        token: &str,
        listid: &str,
        songs: &[SongToAdd],
    ) -> Result<Value> {
        let resources: Vec<Value> = songs
            .iter()
            .map(|song| {
                json!({
                    "number": 1,
                    "name": song.name,
                    "hash": song.hash,
                    "size": 0,
                    "sort": 0,
                    "timelen": 0,
                    "bitrate": 0,
                    "album_id": song.album_id.parse::<i64>().unwrap_or(0),
                    "mixsongid": song.mix_song_id.parse::<i64>().unwrap_or(0),
                })
            })
            .collect();

        let body = json!({
            "userid": userid,
            "token": token,
            "listid": listid,
            "list_ver": 0,
            "type": 0,
            "slow_upload": 1,
            "scene": "false;null",
            "data": resources,
        });
        let request = KgRequest::post("/cloudlist.service/v6/add_song")
            .param("last_time", now_secs())
            .param("last_area", LAST_AREA)
            .param("userid", userid)
            .param("token", token)
            .json(body);
        self.transport.send(request).await
    }

    /// 从歌单删除歌曲。`file_ids` 是歌单内的 `fileid`，不是哈希。
    #[instrument(skip(self, token))]
    pub async fn remove_songs(
        &self,
        userid: &str,
        token: &str,
        listid: &str,
        file_ids: &[i64],
    ) -> Result<Value> {
        let data: Vec<Value> = file_ids.iter().map(|id| json!({ "fileid": id })).collect();
        let body = json!({
            "listid": listid,
            "userid": userid,
            "data": data,
            "type": 0,
            "token": token,
            "list_ver": 0,
        });
        let request = KgRequest::post("/v4/delete_songs")
            .router(CLOUDLIST_ROUTER)
            .json(body);
        self.transport.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{api::test_support::canned_transport, crypto::playlist_aes_encrypt_with_key};

    fn sealed_delete() -> Sealed {
        let payload = r#"{"listid":7,"total_ver":0,"type":1}"#;
        Sealed {
            ciphertext: playlist_aes_encrypt_with_key(payload, "k3y9ab").unwrap(),
            key: "k3y9ab".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_reply_is_decrypted_from_raw_body() {
        let reply = playlist_aes_encrypt_with_key(
            r#"{"status":1,"error_code":0,"data":{"listid":7}}"#,
            "k3y9ab",
        )
        .unwrap();
        let (transport, sender) = canned_transport(reply);
        let api = PlaylistApi::new(transport);

        let response = api.send_delete("10086", "tok", sealed_delete()).await.unwrap();
        assert_eq!(response, json!({ "status": 1, "error_code": 0, "data": { "listid": 7 } }));

        let requests = sender.requests.lock().unwrap();
        let (body, content_type) = requests[0].body.clone().unwrap();
        assert_eq!(content_type, "text/plain");
        assert_eq!(body, sealed_delete().ciphertext);
    }

    #[tokio::test]
    async fn test_delete_reply_is_decrypted_from_json_string() {
        let reply = playlist_aes_encrypt_with_key(r#"{"status":1}"#, "k3y9ab").unwrap();
        let (transport, _) = canned_transport(Value::String(reply).to_string());
        let api = PlaylistApi::new(transport);

        let response = api.send_delete("10086", "tok", sealed_delete()).await.unwrap();
        assert_eq!(response, json!({ "status": 1 }));
    }

    #[tokio::test]
    async fn test_undecryptable_delete_reply_is_returned_as_is() {
        let (transport, _) = canned_transport(r#"{"status":0,"error_code":20017}"#);
        let api = PlaylistApi::new(transport);

        let response = api.send_delete("10086", "tok", sealed_delete()).await.unwrap();
        assert_eq!(response, json!({ "status": 0, "error_code": 20017 }));
    }
}
