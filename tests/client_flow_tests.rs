//! 使用进程内假发送器驱动 `KugouClient` 的集成测试。

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::{Value, json};

use kugou_helper_rs::{
    AudioQuality, AuthUpdate, ClientConfig, HttpReply, HttpSender, KugouClient, KugouError,
    PreparedRequest,
    crypto::{aes_decrypt_with_iv, calc_mid},
    signature::{signature_android_params, signature_web_params},
};

const KRC_BLOB: &str = "a3JjMTjb6jlygH4OfBh4AEQ35F+QdlVHbrrBdoEHBB0e496aCIrQdu8SyNstGDEZUN5j";

type Responder = Box<dyn Fn(&PreparedRequest) -> HttpReply + Send + Sync>;

/// 按路径后缀返回预设响应，并记录所有发出的请求。
#[derive(Default)]
struct FakeSender {
    routes: Vec<(&'static str, Responder)>,
    requests: Mutex<Vec<PreparedRequest>>,
    delay: Option<Duration>,
}

impl FakeSender {
    fn new() -> Self {
        Self::default()
    }

    fn reply(
        mut self,
        path: &'static str,
        f: impl Fn(&PreparedRequest) -> HttpReply + Send + Sync + 'static,
    ) -> Self {
        self.routes.push((path, Box::new(f)));
        self
    }

    fn json(self, path: &'static str, body: Value) -> Self {
        self.reply(path, move |_| HttpReply {
            status: 200,
            body: body.to_string().into_bytes(),
        })
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| url_path(&r.url).ends_with(path))
            .count()
    }

    fn last(&self, path: &str) -> PreparedRequest {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| url_path(&r.url).ends_with(path))
            .unwrap_or_else(|| panic!("没有发往 {path} 的请求"))
    }
}

#[async_trait]
impl HttpSender for FakeSender {
    async fn execute(&self, request: PreparedRequest) -> kugou_helper_rs::Result<HttpReply> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let path = url_path(&request.url);
        let reply = self
            .routes
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix))
            .map_or(
                HttpReply {
                    status: 404,
                    body: Vec::new(),
                },
                |(_, responder)| responder(&request),
            );
        Ok(reply)
    }
}

fn url_path(url: &str) -> String {
    Url::parse(url).unwrap().path().to_string()
}

fn query(request: &PreparedRequest) -> BTreeMap<String, String> {
    Url::parse(&request.url)
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn header<'a>(request: &'a PreparedRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn body_json(request: &PreparedRequest) -> Value {
    let (text, _) = request.body.as_ref().expect("请求没有请求体");
    serde_json::from_str(text).unwrap()
}

fn temp_config() -> ClientConfig {
    let dir: PathBuf = std::env::temp_dir().join(format!(
        "kugou-helper-it-{}",
        uuid::Uuid::new_v4().simple()
    ));
    ClientConfig::with_session_path(dir.join("session.json"))
}

fn client_with(sender: &Arc<FakeSender>) -> KugouClient {
    KugouClient::with_sender(temp_config(), sender.clone()).unwrap()
}

fn log_in(client: &KugouClient) {
    client
        .session_manager()
        .update_auth(AuthUpdate {
            userid: "10086".to_string(),
            token: "token-abc".to_string(),
            vip_type: "0".to_string(),
            vip_token: String::new(),
            t1: "previous-t1".to_string(),
        })
        .unwrap();
}

#[test_log::test(tokio::test)]
async fn test_get_requests_are_signed() {
    let sender = Arc::new(FakeSender::new().json("/api/v3/search/hot_tab", json!({ "status": 1 })));
    let client = client_with(&sender);

    client.get_search_hot().await.unwrap();

    let request = sender.last("/api/v3/search/hot_tab");
    assert_eq!(request.method, Method::GET);
    assert!(request.body.is_none());

    let mut params = query(&request);
    let signature = params.remove("signature").expect("缺少 signature");
    assert_eq!(params["appid"], "3116");
    assert_eq!(params["clientver"], "11436");
    assert_eq!(params["dfid"], "-");
    assert_eq!(params["mid"], calc_mid("-"));
    assert_eq!(params["userid"], "0");
    assert!(!params.contains_key("token"));
    assert_eq!(signature, signature_android_params(&params, ""));

    assert_eq!(header(&request, "x-router"), Some("msearch.kugou.com"));
    assert_eq!(header(&request, "dfid"), Some("-"));
    assert_eq!(header(&request, "kg-rc"), Some("1"));
    assert!(header(&request, "User-Agent").is_some());
}

#[test_log::test(tokio::test)]
async fn test_post_signature_covers_body() {
    let sender = Arc::new(FakeSender::new().json("/pubsongs/v1/get_tags_by_type", json!({})));
    let client = client_with(&sender);

    client.get_playlist_tags().await.unwrap();

    let request = sender.last("/pubsongs/v1/get_tags_by_type");
    let (text, content_type) = request.body.clone().unwrap();
    assert_eq!(content_type, "application/json");

    let mut params = query(&request);
    let signature = params.remove("signature").unwrap();
    assert_eq!(signature, signature_android_params(&params, &text));
}

#[test_log::test(tokio::test)]
async fn test_login_updates_session() {
    let sender = Arc::new(FakeSender::new().json(
        "/v7/login_by_verifycode",
        json!({
            "status": 1,
            "error_code": 0,
            "data": { "userid": 10086, "token": "fresh-token", "t1": "fresh-t1" }
        }),
    ));
    let client = client_with(&sender);

    let response = client.login_by_mobile("13800138000", "1234").await.unwrap();
    assert_eq!(response["data"]["token"], "fresh-token");

    let session = client.session();
    assert!(session.is_logged_in());
    assert_eq!(session.userid, "10086");
    assert_eq!(session.token, "fresh-token");
    assert_eq!(session.t1, "fresh-t1");

    let request = sender.last("/v7/login_by_verifycode");
    assert!(request.url.starts_with("https://loginserviceretry.kugou.com/"));
    assert_eq!(header(&request, "x-router"), Some("login.user.kugou.com"));
    assert_eq!(header(&request, "support-calm"), Some("1"));

    let body = body_json(&request);
    assert_eq!(body["mobile"], "13*****0");
    assert_eq!(body["dfid"], "-");
    assert!(body.get("userid").is_none());
    assert_eq!(body["pk"].as_str().unwrap().len(), 256);
    assert!(body["pk"].as_str().unwrap().chars().all(|c| !c.is_ascii_lowercase()));
}

#[test_log::test(tokio::test)]
async fn test_failed_login_leaves_session_alone() {
    let sender = Arc::new(FakeSender::new().json(
        "/v7/login_by_verifycode",
        json!({ "status": 0, "error_code": 34175, "data": { "token": "" } }),
    ));
    let client = client_with(&sender);

    client.login_by_mobile("13800138000", "0000").await.unwrap();
    assert!(!client.session().is_logged_in());
}

#[test_log::test(tokio::test)]
async fn test_confirmed_qr_scan_updates_and_saves_session() {
    let sender = Arc::new(FakeSender::new().json(
        "/v2/get_userinfo_qrcode",
        json!({
            "status": 1,
            "error_code": 0,
            "data": { "status": 4, "userid": 10086, "token": "qr-token", "nickname": "tester" }
        }),
    ));
    let config = temp_config();
    let client = KugouClient::with_sender(config.clone(), sender.clone()).unwrap();

    let response = client.check_qr_status("qr-key").await.unwrap();
    assert_eq!(response["data"]["status"], 4);

    let session = client.session();
    assert!(session.is_logged_in());
    assert_eq!(session.userid, "10086");
    assert_eq!(session.token, "qr-token");
    assert!(session.t1.is_empty());

    let reloaded = KugouClient::with_sender(config, sender.clone()).unwrap();
    assert_eq!(reloaded.session().token, "qr-token");

    let request = sender.last("/v2/get_userinfo_qrcode");
    assert!(request.url.starts_with("https://login-user.kugou.com/"));
    let mut params = query(&request);
    let signature = params.remove("signature").unwrap();
    assert_eq!(params["qrcode"], "qr-key");
    assert_eq!(signature, signature_web_params(&params));
}

#[test_log::test(tokio::test)]
async fn test_pending_qr_scan_leaves_session_alone() {
    let sender = Arc::new(
        FakeSender::new().reply("/v2/get_userinfo_qrcode", |request| {
            // 第一次轮询等待扫码，之后已扫码但尚未确认
            let status = if query(request)["qrcode"] == "waiting" { 0 } else { 1 };
            HttpReply {
                status: 200,
                body: json!({
                    "status": 1,
                    "data": { "status": status, "userid": 10086, "token": "not-yet" }
                })
                .to_string()
                .into_bytes(),
            }
        }),
    );
    let client = client_with(&sender);

    client.check_qr_status("waiting").await.unwrap();
    client.check_qr_status("scanned").await.unwrap();

    let session = client.session();
    assert!(!session.is_logged_in());
    assert!(session.token.is_empty());
    assert_eq!(sender.count("/v2/get_userinfo_qrcode"), 2);
}

#[test_log::test(tokio::test)]
async fn test_refresh_chains_previous_t1() {
    let sender = Arc::new(FakeSender::new().json(
        "/v5/login_by_token",
        json!({
            "status": 1,
            "error_code": 0,
            "data": { "userid": "10086", "token": "token-new", "is_vip": 1, "t1": "t1-new" }
        }),
    ));
    let client = client_with(&sender);

    // 匿名会话不发请求
    let skipped = client.refresh_session().await.unwrap();
    assert!(skipped.status.is_none());
    assert_eq!(sender.count("/v5/login_by_token"), 0);

    log_in(&client);
    let refreshed = client.refresh_session().await.unwrap();
    assert_eq!(refreshed.status, Some(1));
    assert_eq!(refreshed.token, "token-new");

    let session = client.session();
    assert_eq!(session.token, "token-new");
    assert_eq!(session.vip_type, "1");
    assert_eq!(session.t1, "t1-new");

    let body = body_json(&sender.last("/v5/login_by_token"));
    assert_eq!(body["userid"], "10086");
    let t1 = aes_decrypt_with_iv(
        body["t1"].as_str().unwrap(),
        "5e4ef500e9597fe004bd09a46d8add98",
        "04bd09a46d8add98",
    )
    .unwrap();
    assert!(t1.starts_with("previous-t1|"), "t1 明文为 {t1}");
}

#[test_log::test(tokio::test)]
async fn test_concurrent_init_device_registers_once() {
    let sender = Arc::new(
        FakeSender::new()
            .json(
                "/risk/v2/r_register_dev",
                json!({ "status": 1, "data": { "dfid": "server-dfid" } }),
            )
            .with_delay(Duration::from_millis(20)),
    );
    let client = client_with(&sender);

    let results = futures::future::join_all((0..6).map(|_| client.init_device())).await;
    assert!(results.into_iter().all(|r| r.unwrap()));
    assert_eq!(sender.count("/risk/v2/r_register_dev"), 1);

    let session = client.session();
    assert_eq!(session.dfid, "server-dfid");
    assert_eq!(session.mid, calc_mid("server-dfid"));

    assert!(client.init_device().await.unwrap());
    assert_eq!(sender.count("/risk/v2/r_register_dev"), 1);

    let request = sender.last("/risk/v2/r_register_dev");
    assert!(request.url.starts_with("https://userservice.kugou.com/"));
    let (_, content_type) = request.body.clone().unwrap();
    assert_eq!(content_type, "text/plain");
    assert_eq!(query(&request)["p"].len(), 256);
}

#[test_log::test(tokio::test)]
async fn test_failed_registration_keeps_placeholder() {
    let sender = Arc::new(FakeSender::new().json(
        "/risk/v2/r_register_dev",
        json!({ "status": 0, "error_code": 20001 }),
    ));
    let client = client_with(&sender);

    assert!(!client.init_device().await.unwrap());
    assert_eq!(client.session().dfid, "-");
}

#[test_log::test(tokio::test)]
async fn test_search_parses_envelope() {
    let sender = Arc::new(FakeSender::new().json(
        "/v3/search/song",
        json!({
            "status": 1,
            "error_code": 0,
            "data": {
                "total": 1,
                "lists": [{
                    "FileHash": "ABCDEF",
                    "FileName": "周杰伦 - 晴天",
                    "SingerName": "周杰伦",
                    "AlbumID": "960399",
                    "Duration": 269
                }]
            }
        }),
    ));
    let client = client_with(&sender);

    let songs = client.search("晴天", 1).await.unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].hash, "ABCDEF");
    assert_eq!(songs[0].duration, 269);

    let params = query(&sender.last("/v3/search/song"));
    assert_eq!(params["keyword"], "晴天");
    assert_eq!(params["pagesize"], "30");
}

#[test_log::test(tokio::test)]
async fn test_search_failure_is_empty() {
    let sender = Arc::new(FakeSender::new().json(
        "/v3/search/song",
        json!({ "status": 0, "error_code": 20010, "data": null }),
    ));
    let client = client_with(&sender);
    assert!(client.search("x", 1).await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_play_info() {
    let sender = Arc::new(FakeSender::new().json(
        "/v5/url",
        json!({
            "status": 1,
            "url": ["http://fs.example.com/a.flac"],
            "hash": "abcdef",
            "priv_status": 0
        }),
    ));
    let client = client_with(&sender);

    let play = client
        .get_play_info("ABCDEF", AudioQuality::Lossless)
        .await
        .unwrap();
    assert!(play.is_success());
    assert!(!play.requires_vip());
    assert_eq!(play.urls[0], "http://fs.example.com/a.flac");

    let request = sender.last("/v5/url");
    let params = query(&request);
    assert_eq!(params["hash"], "abcdef");
    assert_eq!(params["quality"], "flac");
    assert_eq!(params["key"].len(), 32);
    assert_eq!(params["dfid"].len(), 24);
    assert_eq!(header(&request, "x-router"), Some("trackercdn.kugou.com"));
}

#[test_log::test(tokio::test)]
async fn test_play_info_requires_vip() {
    let sender = Arc::new(FakeSender::new().json(
        "/v5/url",
        json!({ "status": 2, "error_code": 20018, "priv_status": 1 }),
    ));
    let client = client_with(&sender);

    let play = client
        .get_play_info("abc", AudioQuality::default())
        .await
        .unwrap();
    assert!(!play.is_success());
    assert!(play.requires_vip());
}

#[test_log::test(tokio::test)]
async fn test_locked_song_with_empty_url_reports_vip() {
    let sender = Arc::new(FakeSender::new().json(
        "/v5/url",
        json!({ "status": 2, "error_code": 0, "url": "", "priv_status": 1, "hash": "abc" }),
    ));
    let client = client_with(&sender);

    let play = client
        .get_play_info("abc", AudioQuality::High)
        .await
        .unwrap();
    assert_eq!(play.status, Some(2));
    assert_eq!(play.hash, "abc");
    assert!(play.urls.is_empty());
    assert!(play.requires_vip());
}

#[test_log::test(tokio::test)]
async fn test_http_status_is_an_error() {
    let sender = Arc::new(FakeSender::new().reply("/v3/search/song", |_| HttpReply {
        status: 502,
        body: b"bad gateway".to_vec(),
    }));
    let client = client_with(&sender);

    match client.search("x", 1).await {
        Err(KugouError::HttpStatus { status, url }) => {
            assert_eq!(status, 502);
            assert!(url.contains("/v3/search/song"));
        }
        other => panic!("预期 HttpStatus 错误，实际为 {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_non_json_body_is_wrapped() {
    let sender = Arc::new(FakeSender::new().reply("/mobileservice/api/v5/rank/rec_rank_list", |_| {
        HttpReply {
            status: 200,
            body: b"plain".to_vec(),
        }
    }));
    let client = client_with(&sender);

    let value = client.get_recommended_ranks().await.unwrap();
    assert_eq!(value, json!({ "__raw_base64__": "cGxhaW4=" }));
}

#[test_log::test(tokio::test)]
async fn test_login_required_short_circuits() {
    let sender = Arc::new(FakeSender::new());
    let client = client_with(&sender);

    assert!(matches!(
        client.delete_playlist("1").await,
        Err(KugouError::LoginRequired)
    ));
    assert!(matches!(
        client.collect_playlist("n", "1", "2", "", 1).await,
        Err(KugouError::LoginRequired)
    ));
    assert!(matches!(
        client.remove_songs("1", &[1]).await,
        Err(KugouError::LoginRequired)
    ));
    assert!(client.get_user_info().await.unwrap().is_none());
    assert!(client.get_user_playlists(1, 30).await.unwrap().is_none());
    assert!(client.get_play_history(None).await.unwrap().is_none());
    assert!(client.receive_one_day_vip().await.unwrap().is_none());

    assert!(sender.requests().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_empty_song_lists_skip_the_request() {
    let sender = Arc::new(FakeSender::new());
    let client = client_with(&sender);
    log_in(&client);

    assert!(client.add_songs("1", &[]).await.unwrap().is_none());
    assert!(client.remove_songs("1", &[]).await.unwrap().is_none());
    assert!(sender.requests().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_logged_in_requests_carry_token() {
    let sender = Arc::new(FakeSender::new().json(
        "/v7/get_all_list",
        json!({
            "status": 1,
            "error_code": 0,
            "data": {
                "userid": 10086,
                "list_count": 1,
                "info": [{ "name": "我喜欢", "listid": 2, "count": 10, "is_def": 2 }]
            }
        }),
    ));
    let client = client_with(&sender);
    log_in(&client);

    let playlists = client.get_user_playlists(1, 30).await.unwrap().unwrap();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0].name, "我喜欢");

    let params = query(&sender.last("/v7/get_all_list"));
    assert_eq!(params["userid"], "10086");
    assert_eq!(params["token"], "token-abc");
}

#[test_log::test(tokio::test)]
async fn test_get_playlist_joins_info_and_songs() {
    let sender = Arc::new(
        FakeSender::new()
            .json(
                "/v3/get_list_info",
                json!({
                    "status": 1,
                    "error_code": 0,
                    "data": [{ "listid": 7, "global_collection_id": "collection_3_1_7_0", "name": "测试歌单", "count": 2 }]
                }),
            )
            .json(
                "/pubsongs/v2/get_other_list_file_nofilt",
                json!({
                    "status": 1,
                    "error_code": 0,
                    "data": {
                        "count": 2,
                        "songs": [
                            { "name": "A - 1", "hash": "H1", "timelen": 1000 },
                            { "name": "B - 2", "hash": "H2", "timelen": 2000 }
                        ]
                    }
                }),
            ),
    );
    let client = client_with(&sender);

    let detail = client
        .get_playlist("collection_3_1_7_0", 2, 30)
        .await
        .unwrap();
    let info = detail.info.unwrap();
    assert_eq!(info.name, "测试歌单");
    assert_eq!(info.id, 7);
    assert_eq!(detail.songs.len(), 2);
    assert_eq!(detail.songs[1].hash, "H2");

    let params = query(&sender.last("/pubsongs/v2/get_other_list_file_nofilt"));
    assert_eq!(params["begin_idx"], "30");
    assert_eq!(params["global_collection_id"], "collection_3_1_7_0");
}

#[test_log::test(tokio::test)]
async fn test_get_lyric_decodes_krc() {
    let sender = Arc::new(FakeSender::new().json(
        "/download",
        json!({ "status": 200, "info": "OK", "fmt": "krc", "contenttype": 0, "content": KRC_BLOB }),
    ));
    let client = client_with(&sender);

    let lyric = client.get_lyric("123", "ACCESS", "krc", true).await.unwrap();
    assert_eq!(
        lyric.decoded_content.as_deref(),
        Some("[ar:Tester]\n[0,1000]<0,500,0>Hel<500,500,0>lo\n")
    );
    let document = lyric.document.unwrap();
    assert_eq!(document.lines.len(), 1);
    assert_eq!(document.lines[0].text, "Hello");

    let request = sender.last("/download");
    assert!(request.url.starts_with("https://lyrics.kugou.com/download?"));
    let params = query(&request);
    assert_eq!(params["accesskey"], "ACCESS");
    assert_eq!(params["fmt"], "krc");
}

#[test_log::test(tokio::test)]
async fn test_logout_resets_session() {
    let sender = Arc::new(FakeSender::new().json(
        "/risk/v2/r_register_dev",
        json!({ "status": 1, "data": { "dfid": "server-dfid" } }),
    ));
    let client = client_with(&sender);
    client.init_device().await.unwrap();
    log_in(&client);
    let install_guid = client.session().install_guid;

    client.logout().unwrap();
    let session = client.session();
    assert!(!session.is_logged_in());
    assert_eq!(session.dfid, "-");
    assert!(session.t1.is_empty());
    assert_eq!(session.install_guid, install_guid);
}
