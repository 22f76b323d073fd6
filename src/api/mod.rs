//! 原始协议接口层。
//!
//! 每个接口只负责描述请求、按需加解密负载，然后把 JSON 原样交还给调用者，
//! 从不直接签名。只有传输层的失败会以 `Err` 返回。

pub mod device;
pub mod discovery;
pub mod login;
pub mod lyric;
pub mod playlist;
pub mod rank;
pub mod search;
pub mod user;

pub use device::DeviceApi;
pub use discovery::DiscoveryApi;
pub use login::LoginApi;
pub use lyric::LyricApi;
pub use playlist::PlaylistApi;
pub use rank::RankApi;
pub use search::SearchApi;
pub use user::UserApi;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use tracing::warn;

use crate::{
    crypto::recipe::{KeyWrap, Recipe},
    error::Result,
    transport::RAW_BASE64_KEY,
};

/// 当前 Unix 时间戳（毫秒）。
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 当前 Unix 时间戳（秒）。
pub(crate) fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 用户类接口共用的 `p` 字段：`{"clienttime","token"}` 的无填充 RSA。
pub(crate) fn token_proof(token: &str, clienttime: i64) -> Result<String> {
    KeyWrap::NoPadding.wrap(&json!({ "clienttime": clienttime, "token": token }))
}

/// 解密一个不透明的加密响应。
///
/// 密文可能位于 [`RAW_BASE64_KEY`] 字段、字符串形式的 `data`，或者响应本身就是字符串。
/// 由于传输层会把非 JSON 的响应体再做一次 Base64，这里先直接解密，失败后再解开一层重试。
/// 任何一步失败都返回 `None`。
pub(crate) fn open_opaque(response: &Value, recipe: Recipe, key: &str) -> Option<Value> {
    let candidate = match response {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map
            .get(RAW_BASE64_KEY)
            .or_else(|| map.get("data"))
            .and_then(Value::as_str)?,
        _ => return None,
    };
    if candidate.is_empty() {
        return None;
    }

    let plaintext = recipe.open(candidate, key).or_else(|| {
        let inner = STANDARD.decode(candidate.trim()).ok()?;
        let inner = String::from_utf8(inner).ok()?;
        recipe.open(inner.trim(), key)
    });

    let Some(plaintext) = plaintext else {
        warn!("解密加密响应失败");
        return None;
    };

    match serde_json::from_str(&plaintext) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("解密后的响应不是合法 JSON: {e}");
            None
        }
    }
}

/// 登录与刷新令牌的响应中，`data.secu_params` 是用随机密钥加密的 JSON 对象，
/// 解密后逐键合并回 `data`。不满足条件时原样返回。
pub(crate) fn merge_secu_params(mut response: Value, key: &str) -> Value {
    if response.get("status").and_then(Value::as_i64) != Some(1) {
        return response;
    }
    let Some(data) = response.get_mut("data").and_then(Value::as_object_mut) else {
        return response;
    };
    let Some(secu) = data.get("secu_params").and_then(Value::as_str) else {
        return response;
    };

    let decrypted = Recipe::AesRandomKey
        .open(secu, key)
        .and_then(|text| serde_json::from_str::<Value>(&text).ok());
    match decrypted {
        Some(Value::Object(fields)) => {
            for (k, v) in fields {
                data.insert(k, v);
            }
        }
        _ => warn!("解密 secu_params 失败"),
    }
    response
}

/// 在进程内替代网络的发送器，供各接口的单元测试使用。
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use reqwest::cookie::Jar;

    use crate::{
        config::ClientConfig,
        error::Result,
        session::SessionManager,
        transport::{HttpReply, HttpSender, PreparedRequest, Transport},
    };

    /// 对所有请求返回同一个响应体，并记录发出的请求。
    pub(crate) struct CannedSender {
        body: Vec<u8>,
        pub requests: Mutex<Vec<PreparedRequest>>,
    }

    #[async_trait]
    impl HttpSender for CannedSender {
        async fn execute(&self, request: PreparedRequest) -> Result<HttpReply> {
            self.requests.lock().unwrap().push(request);
            Ok(HttpReply {
                status: 200,
                body: self.body.clone(),
            })
        }
    }

    pub(crate) fn canned_transport(body: impl Into<Vec<u8>>) -> (Transport, Arc<CannedSender>) {
        let config = ClientConfig::with_session_path(
            std::env::temp_dir()
                .join(format!("kugou-helper-api-{}", uuid::Uuid::new_v4().simple()))
                .join("session.json"),
        );
        let session =
            Arc::new(SessionManager::bootstrap(&config, Arc::new(Jar::default())).unwrap());
        let sender = Arc::new(CannedSender {
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        });
        let transport = Transport::new(
            sender.clone(),
            session,
            config.gateway,
            config.user_agent,
        );
        (transport, sender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{aes_encrypt, playlist_aes_encrypt_with_key};

    #[test]
    fn test_merge_secu_params() {
        let sealed = aes_encrypt(r#"{"token":"new","t1":"abc"}"#, None, None).unwrap();
        let response = json!({
            "status": 1,
            "data": { "userid": 10086, "token": "", "secu_params": sealed.hex }
        });
        let merged = merge_secu_params(response, &sealed.key);
        assert_eq!(merged["data"]["token"], "new");
        assert_eq!(merged["data"]["t1"], "abc");
        assert_eq!(merged["data"]["userid"], 10086);
    }

    #[test]
    fn test_merge_secu_params_leaves_failures_alone() {
        let failed = json!({ "status": 0, "data": { "secu_params": "00" } });
        assert_eq!(merge_secu_params(failed.clone(), "k"), failed);

        let garbage = json!({ "status": 1, "data": { "secu_params": "zz" } });
        assert_eq!(merge_secu_params(garbage.clone(), "k"), garbage);
    }

    #[test]
    fn test_open_opaque_variants() {
        let cipher = playlist_aes_encrypt_with_key(r#"{"status":1}"#, "abcdef").unwrap();

        let bare = Value::String(cipher.clone());
        assert_eq!(
            open_opaque(&bare, Recipe::PlaylistAes, "abcdef"),
            Some(json!({ "status": 1 }))
        );

        let wrapped = json!({ RAW_BASE64_KEY: STANDARD.encode(cipher.as_bytes()) });
        assert_eq!(
            open_opaque(&wrapped, Recipe::PlaylistAes, "abcdef"),
            Some(json!({ "status": 1 }))
        );

        let data = json!({ "data": cipher });
        assert!(open_opaque(&data, Recipe::PlaylistAes, "abcdef").is_some());

        assert_eq!(open_opaque(&json!({ "status": 1 }), Recipe::PlaylistAes, "abcdef"), None);
        assert_eq!(open_opaque(&bare, Recipe::PlaylistAes, "wrong!"), None);
    }
}
