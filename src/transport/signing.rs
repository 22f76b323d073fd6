//! 请求签名中间件：补齐身份参数、计算签名、附加酷狗客户端的请求头。
//!
//! 这是唯一负责请求真实性的环节，接口层从不直接签名。

use tracing::trace;

use super::request::{KgRequest, SignatureScheme};
use crate::{
    crypto::{calc_mid, calc_uuid},
    session::{ANONYMOUS_DFID, Session},
    signature::{
        APP_ID, CLIENT_VER, sign_play_url_key, signature_android_params, signature_web_params,
    },
};

/// 签名后的请求：参数已补齐并附带 `signature`，请求头已按顺序排好。
#[derive(Debug, Clone)]
pub(crate) struct SignedRequest {
    pub request: KgRequest,
    pub headers: Vec<(String, String)>,
}

/// 对请求进行签名。
///
/// # 参数
/// * `request` - 待签名的请求
/// * `session` - 当前会话快照，提供 `userid` 和 `token`
/// * `user_agent` - User-Agent
/// * `clienttime` - 当前 Unix 时间戳（秒）
pub(crate) fn sign_request(
    mut request: KgRequest,
    session: &Session,
    user_agent: &str,
    clienttime: i64,
) -> SignedRequest {
    let dfid = request
        .dfid
        .clone()
        .unwrap_or_else(|| ANONYMOUS_DFID.to_string());
    let mid = calc_mid(&dfid);
    let uuid = calc_uuid(&dfid, &mid);

    let params = &mut request.params;
    params
        .entry("appid".to_string())
        .or_insert_with(|| APP_ID.to_string());
    params
        .entry("clientver".to_string())
        .or_insert_with(|| CLIENT_VER.to_string());
    params
        .entry("dfid".to_string())
        .or_insert_with(|| dfid.clone());
    params
        .entry("mid".to_string())
        .or_insert_with(|| mid.clone());
    params.entry("uuid".to_string()).or_insert(uuid);
    params
        .entry("userid".to_string())
        .or_insert_with(|| session.userid.clone());
    params
        .entry("clienttime".to_string())
        .or_insert_with(|| clienttime.to_string());
    if !session.token.is_empty() {
        params
            .entry("token".to_string())
            .or_insert_with(|| session.token.clone());
    }

    if request.signature == SignatureScheme::PlayUrlV5
        && let Some(hash) = params.get("hash")
    {
        let userid = params.get("userid").map_or("", String::as_str);
        let param_mid = params.get("mid").map_or(mid.as_str(), String::as_str);
        let key = sign_play_url_key(hash, userid, param_mid);
        params.insert("key".to_string(), key);
    }

    // GET 请求不携带请求体，也不参与签名
    let body = if request.method == reqwest::Method::POST {
        request.body.signing_text()
    } else {
        String::new()
    };
    let signature = match request.signature {
        SignatureScheme::WebQr => Some(signature_web_params(params)),
        SignatureScheme::Default | SignatureScheme::PlayUrlV5 => {
            Some(signature_android_params(params, &body))
        }
        SignatureScheme::None => None,
    };
    if let Some(signature) = signature {
        trace!(path = %request.path, %signature, "请求已签名");
        params.insert("signature".to_string(), signature);
    }

    let clienttime_header = params
        .get("clienttime")
        .cloned()
        .unwrap_or_else(|| clienttime.to_string());

    let mut headers = vec![
        ("User-Agent".to_string(), user_agent.to_string()),
        ("dfid".to_string(), dfid),
        ("mid".to_string(), mid),
        ("clienttime".to_string(), clienttime_header),
        ("kg-rc".to_string(), "1".to_string()),
        ("kg-thash".to_string(), "5d816a0".to_string()),
        ("kg-rec".to_string(), "1".to_string()),
        (
            "kg-rf".to_string(),
            "B9EDA08A64250DEFFBCADDEE00F8F25F".to_string(),
        ),
    ];
    if let Some(router) = &request.router {
        headers.push(("x-router".to_string(), router.clone()));
    }
    // 同名请求头以调用方的值为准
    for (name, value) in std::mem::take(&mut request.headers) {
        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => headers.push((name, value)),
        }
    }

    SignedRequest { request, headers }
}
