//! 登录接口：短信验证码登录、二维码登录和令牌刷新。

use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{merge_secu_params, now_millis};
use crate::{
    crypto::recipe::{KeyWrap, Recipe},
    error::Result,
    session::{ANONYMOUS_DFID, ANONYMOUS_USERID, Session},
    signature::sign_login_key,
    transport::{KgRequest, SignatureScheme, Transport},
};

const LITE_T1: Recipe = Recipe::AesFixedKey {
    key: "5e4ef500e9597fe004bd09a46d8add98",
    iv: "04bd09a46d8add98",
};
const LITE_T2: Recipe = Recipe::AesFixedKey {
    key: "fd14b35e3f81af3817a20ae7adae7020",
    iv: "17a20ae7adae7020",
};
/// 概念版专用的应用密钥，用于刷新令牌时的 `p3`。
const LITE_APP: Recipe = Recipe::AesFixedKey {
    key: "c24f74ca2820225badc01946dba4fdf7",
    iv: "adc01946dba4fdf7",
};
const T2_FIXED_HASH: &str = "0f607264fc6318a92b9e13c65db7cd3c";
const T3_FIXED: &str = "MCwwLDAsMCwwLDAsMCwwLDA=";
const GIT_VERSION: &str = "5f0b7c4";

const API_HOST: &str = "http://login.user.kugou.com";
const LOGIN_ROUTER: &str = "login.user.kugou.com";
const LOGIN_RETRY_HOST: &str = "https://loginserviceretry.kugou.com";
const WEB_HOST: &str = "https://login-user.kugou.com";

const WEB_APP_ID: &str = "1001";
const WEB_CLIENT_VER: &str = "11040";
const QR_SRC_APP_ID: &str = "2919";
const QR_CODE_TXT: &str = "https://h5.kugou.com/apps/loginQRCode/html/index.html?appid=3116&";

/// 登录相关的原始接口。
#[derive(Debug, Clone)]
pub struct LoginApi {
    transport: Transport,
}

impl LoginApi {
    /// 创建接口实例。
    #[must_use]
    pub const fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// 发送短信验证码。
    #[instrument(skip(self, mobile))]
    pub async fn send_sms_code(&self, mobile: &str) -> Result<Value> {
        let request = KgRequest::post("/v7/send_mobile_code")
            .host(API_HOST)
            .router(LOGIN_ROUTER)
            .json(json!({ "businessid": 5, "mobile": mobile, "plat": 3 }));
        self.transport.send(request).await
    }

    /// 手机号加验证码登录。
    ///
    /// 成功时 `data.secu_params` 已被解密并合并进 `data`，其中包含 `token` 与 `t1`。
    #[instrument(skip(self, mobile, code))]
    pub async fn login_by_mobile(&self, mobile: &str, code: &str) -> Result<Value> {
        let session = self.transport.session().snapshot();
        let now = now_millis();

        let t1 = LITE_T1.seal(&format!("|{now}"))?.ciphertext;
        let t2 = seal_t2(&session, now)?;

        let params = Recipe::AesRandomKey.seal(&json!({ "mobile": mobile, "code": code }).to_string())?;
        let pk = KeyWrap::NoPadding.wrap(&json!({ "clienttime_ms": now, "key": params.key }))?;

        let mut body = json!({
            "plat": 1,
            "support_multi": 1,
            "t1": t1,
            "t2": t2,
            "clienttime_ms": now,
            "mobile": mask_mobile(mobile),
            "key": sign_login_key(&now.to_string()),
            "pk": pk,
            "params": params.ciphertext,
            "dfid": ANONYMOUS_DFID,
            "dev": session.install_dev,
            "gitversion": GIT_VERSION,
        });
        if session.userid != ANONYMOUS_USERID {
            body["userid"] = Value::String(session.userid.clone());
        }

        let request = KgRequest::post("/v7/login_by_verifycode")
            .host(LOGIN_RETRY_HOST)
            .router(LOGIN_ROUTER)
            .header("support-calm", "1")
            .json(body);
        let response = self.transport.send(request).await?;
        Ok(merge_secu_params(response, &params.key))
    }

    /// 申请登录二维码。
    #[instrument(skip(self))]
    pub async fn get_qr_key(&self) -> Result<Value> {
        let request = KgRequest::get("/v2/qrcode")
            .host(WEB_HOST)
            .param("appid", WEB_APP_ID)
            .param("clientver", WEB_CLIENT_VER)
            .param("type", 1)
            .param("plat", 4)
            .param("srcappid", QR_SRC_APP_ID)
            .param("qrcode_txt", QR_CODE_TXT)
            .signature(SignatureScheme::WebQr);
        self.transport.send(request).await
    }

    /// 轮询二维码状态。`data.status`：0 等待，1 已扫码，2 过期，4 登录成功。
    #[instrument(skip(self))]
    pub async fn check_qr_status(&self, key: &str) -> Result<Value> {
        let request = KgRequest::get("/v2/get_userinfo_qrcode")
            .host(WEB_HOST)
            .param("plat", 4)
            .param("appid", crate::signature::APP_ID)
            .param("srcappid", QR_SRC_APP_ID)
            .param("qrcode", key)
            .signature(SignatureScheme::WebQr);
        self.transport.send(request).await
    }

    /// 用现有令牌换取新令牌。`t1` 会串联会话中上一次保存的值。
    #[instrument(skip(self, token))]
    pub async fn refresh_token(&self, userid: &str, token: &str) -> Result<Value> {
        let session = self.transport.session().snapshot();
        let now = now_millis();

        let t1 = LITE_T1.seal(&format!("{}|{now}", session.t1))?.ciphertext;
        let t2 = seal_t2(&session, now)?;
        let p3 = LITE_APP
            .seal(&json!({ "clienttime": now / 1000, "token": token }).to_string())?
            .ciphertext;
        let params = Recipe::AesRandomKey.seal("{}")?;
        let pk = KeyWrap::NoPadding.wrap(&json!({ "clienttime_ms": now, "key": params.key }))?;
        debug!(chained = !session.t1.is_empty(), "刷新令牌");

        let body = json!({
            "dfid": ANONYMOUS_DFID,
            "p3": p3,
            "plat": 1,
            "t1": t1,
            "t2": t2,
            "t3": T3_FIXED,
            "pk": pk,
            "params": params.ciphertext,
            "userid": userid,
            "clienttime_ms": now,
            "dev": session.install_dev,
        });

        let request = KgRequest::post("/v5/login_by_token")
            .host(API_HOST)
            .router(LOGIN_ROUTER)
            .json(body);
        let response = self.transport.send(request).await?;
        Ok(merge_secu_params(response, &params.key))
    }
}

fn seal_t2(session: &Session, now: i64) -> Result<String> {
    let plain = format!(
        "{}|{T2_FIXED_HASH}|{}|{}|{now}",
        session.install_guid, session.install_mac, session.install_dev
    );
    Ok(LITE_T2.seal(&plain)?.ciphertext)
}

/// 超过 10 位的手机号只保留前两位和第 11 位。
fn mask_mobile(mobile: &str) -> String {
    let chars: Vec<char> = mobile.chars().collect();
    if chars.len() > 10 {
        let head: String = chars[..2].iter().collect();
        format!("{head}*****{}", chars[10])
    } else {
        mobile.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_mobile() {
        assert_eq!(mask_mobile("13800138000"), "13*****0");
        assert_eq!(mask_mobile("13800138009"), "13*****9");
        assert_eq!(mask_mobile("1380013800"), "1380013800");
        assert_eq!(mask_mobile(""), "");
    }

    #[test]
    fn test_t1_matches_known_vector() {
        let t1 = LITE_T1.seal("|1700000000000").unwrap().ciphertext;
        assert_eq!(t1, "7586bc68c78aa9b94609abd54a220dbe");
        assert_eq!(
            LITE_T1.open(&t1, "").as_deref(),
            Some("|1700000000000")
        );
    }

    #[test]
    fn test_t2_layout() {
        let session = Session {
            install_guid: "guid".to_string(),
            install_mac: "mac".to_string(),
            install_dev: "DEV".to_string(),
            ..Session::default()
        };
        let t2 = seal_t2(&session, 42).unwrap();
        assert_eq!(
            LITE_T2.open(&t2, "").as_deref(),
            Some("guid|0f607264fc6318a92b9e13c65db7cd3c|mac|DEV|42")
        );
    }
}
