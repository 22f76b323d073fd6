//! 此模块包含为酷狗概念版 API 请求生成签名和派生密钥的函数。
//!
//! 所有函数都是纯函数，且对拼接顺序敏感：任何顺序上的偏差都会让服务器
//! 拒绝请求，并且只会得到一个笼统的失败，不会有签名相关的提示。

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::crypto::md5_hex;

/// 概念版的 appid。
pub const APP_ID: &str = "3116";
/// 概念版的客户端版本号。
pub const CLIENT_VER: &str = "11436";

const KUGOU_LITE_ANDROID_SALT: &str = "LnT6xpN3khm36zse0QzvmgTZ3waWdRSA";
const KUGOU_WEB_SALT: &str = "NVPh5oo715z5DIWAeQlhMDsWXXQV4hwt";
const KUGOU_LITE_SIGN_KEY_SALT: &str = "185672dd44712f60bb1736df5a377e82";

fn salted_params_signature(salt: &str, params: &BTreeMap<String, String>, body: &str) -> String {
    // BTreeMap 的迭代器已经按 key 的字典序排好序
    let mut string_to_sign = String::with_capacity(salt.len() * 2 + params.len() * 16 + body.len());
    string_to_sign.push_str(salt);
    for (k, v) in params {
        let _ = write!(&mut string_to_sign, "{k}={v}");
    }
    string_to_sign.push_str(body);
    string_to_sign.push_str(salt);

    md5_hex(&string_to_sign)
}

/// 为酷狗概念版 API 请求生成 `signature`。
///
/// # 参数
/// * `params` - 一个包含所有 URL 查询参数的 `BTreeMap`。
/// * `body` - POST 请求的请求体字符串。对于 GET 请求，应传入空字符串。
///
/// # 返回
/// 返回计算出的 32 位小写 MD5 签名字符串。
#[must_use]
pub fn signature_android_params(params: &BTreeMap<String, String>, body: &str) -> String {
    salted_params_signature(KUGOU_LITE_ANDROID_SALT, params, body)
}

/// 为网页端二维码登录接口生成 `signature`。算法与安卓版相同，但盐不同且没有请求体。
#[must_use]
pub fn signature_web_params(params: &BTreeMap<String, String>) -> String {
    salted_params_signature(KUGOU_WEB_SALT, params, "")
}

/// 为 `/v5/url` 生成 `key` 参数。
#[must_use]
pub fn sign_play_url_key(hash: &str, userid: &str, mid: &str) -> String {
    md5_hex(&format!(
        "{hash}{KUGOU_LITE_SIGN_KEY_SALT}{APP_ID}{mid}{userid}"
    ))
}

/// 生成登录、删除歌单等接口 body 中的 `key` 参数。
#[must_use]
pub fn sign_login_key(clienttime: &str) -> String {
    md5_hex(&format!(
        "{APP_ID}{KUGOU_LITE_ANDROID_SALT}{CLIENT_VER}{clienttime}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_params() -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("keyword".to_string(), "晴天".to_string());
        params.insert("clienttime".to_string(), "1700000000".to_string());
        params.insert("appid".to_string(), APP_ID.to_string());
        params.insert("clientver".to_string(), CLIENT_VER.to_string());
        params
    }

    #[test]
    fn test_signature() {
        let body = r#"{"data":[{"global_collection_id":"collection_3_1_2_0"}]}"#;
        assert_eq!(
            signature_android_params(&search_params(), body),
            "6ba8643ec2fe50008d0b8bbfc1ef0048"
        );
        assert_eq!(
            signature_android_params(&search_params(), ""),
            "c7aafff630765d7d3ed4d8f5b4d35e5e"
        );
    }

    #[test]
    fn test_signature_ignores_insertion_order() {
        let forward = search_params();
        let reversed: BTreeMap<String, String> = forward
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        assert_eq!(
            signature_android_params(&forward, ""),
            signature_android_params(&reversed, "")
        );
    }

    #[test]
    fn test_web_signature() {
        let mut params = BTreeMap::new();
        params.insert("type".to_string(), "1".to_string());
        params.insert("appid".to_string(), "1001".to_string());
        params.insert("clienttime".to_string(), "1700000000".to_string());
        params.insert("clientver".to_string(), "11040".to_string());
        assert_eq!(
            signature_web_params(&params),
            "d1ca62224e46d6bdfc71830efa8d47a1"
        );
    }

    #[test]
    fn test_sign_play_url_key() {
        assert_eq!(
            sign_play_url_key("abcdef0123456789", "0", "mid123"),
            "863e1bbf94240402537590d812b3b29d"
        );
    }

    #[test]
    fn test_sign_login_key() {
        assert_eq!(
            sign_login_key("1700000000000"),
            "7b5b61bb4574aa511915e89f337059c4"
        );
    }
}
