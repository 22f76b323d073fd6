//! 会话状态：登录凭据、设备指纹和首次安装时生成的标识。
//!
//! 所有写操作都经由 [`SessionManager`] 完成，并在同一把锁下串行化；
//! 读操作返回一份克隆的快照。设备注册额外由一把异步锁保护，
//! 保证同一进程内并发调用时最多只发起一次注册。

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Url, cookie::Jar};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::{self, ClientConfig},
    crypto::{calc_mid, calc_uuid, generate_guid, random_string},
    error::Result,
};

/// 未注册设备时 `dfid` 的占位值。
pub const ANONYMOUS_DFID: &str = "-";
/// 匿名用户的 `userid`。
pub const ANONYMOUS_USERID: &str = "0";

/// 旧版算法生成的 `mid` 较短，低于此长度时重新计算。
const MIN_MID_LEN: usize = 30;

const COOKIE_DOMAINS: [&str; 3] = ["kugou.com", "login-user.kugou.com", "gateway.kugou.com"];

/// 持久化的会话记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Session {
    /// 用户 ID，`"0"` 表示匿名。
    #[serde(rename = "UserId")]
    pub userid: String,
    /// 登录令牌。
    pub token: String,
    /// VIP 类型。
    pub vip_type: String,
    /// VIP 令牌。
    pub vip_token: String,
    /// 服务器下发的风控设备 ID。
    pub dfid: String,
    /// 由 `dfid` 或安装 GUID 派生的指纹。
    pub mid: String,
    /// `md5(dfid + mid)`。
    pub uuid: String,
    /// 安装时生成的设备名替身。
    pub install_dev: String,
    /// 安装时生成的 MAC 替身。
    pub install_mac: String,
    /// 安装时生成的 GUID。
    pub install_guid: String,
    /// 最近一次登录或刷新返回的 `t1`。
    pub t1: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            userid: ANONYMOUS_USERID.to_string(),
            token: String::new(),
            vip_type: "0".to_string(),
            vip_token: String::new(),
            dfid: ANONYMOUS_DFID.to_string(),
            mid: ANONYMOUS_DFID.to_string(),
            uuid: ANONYMOUS_DFID.to_string(),
            install_dev: String::new(),
            install_mac: String::new(),
            install_guid: String::new(),
            t1: String::new(),
        }
    }
}

impl Session {
    /// 当前会话是否已登录。
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty() && self.userid != ANONYMOUS_USERID
    }

    /// 当前会话是否仍未注册设备。
    #[must_use]
    pub fn needs_device_registration(&self) -> bool {
        self.dfid.is_empty() || self.dfid == ANONYMOUS_DFID
    }

    /// 补齐首次运行时缺失的标识。
    fn fill_install_identity(&mut self) {
        if self.install_guid.is_empty() {
            self.install_guid = generate_guid();
        }

        if self.mid.is_empty() || self.mid == ANONYMOUS_DFID || self.mid.len() < MIN_MID_LEN {
            self.mid = calc_mid(&self.install_guid);
        }

        if self.needs_device_registration() {
            self.dfid = ANONYMOUS_DFID.to_string();
            self.uuid = ANONYMOUS_DFID.to_string();
        }

        if self.install_mac.is_empty() {
            self.install_mac = generate_guid();
        }
        if self.install_dev.is_empty() {
            self.install_dev = random_string(16);
        }
    }
}

/// 登录、刷新或扫码成功后写入的凭据。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthUpdate {
    /// 用户 ID
    pub userid: String,
    /// 登录令牌
    pub token: String,
    /// VIP 类型
    pub vip_type: String,
    /// VIP 令牌
    pub vip_token: String,
    /// 新的 `t1`。
    pub t1: String,
}

/// 会话的唯一持有者。
#[derive(Debug)]
pub struct SessionManager {
    state: RwLock<Session>,
    path: PathBuf,
    cookies: Arc<Jar>,
    registration: tokio::sync::Mutex<()>,
}

impl SessionManager {
    /// 加载或创建会话，补齐缺失的安装标识，保存并同步 Cookie。
    pub fn bootstrap(config: &ClientConfig, cookies: Arc<Jar>) -> Result<Self> {
        let mut session = config::load_session(&config.session_path).unwrap_or_default();
        session.fill_install_identity();

        config::save_session(&config.session_path, &session)?;

        let manager = Self {
            state: RwLock::new(session),
            path: config.session_path.clone(),
            cookies,
            registration: tokio::sync::Mutex::new(()),
        };
        manager.sync_cookies();
        Ok(manager)
    }

    /// 返回当前会话的快照。
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 会话文件路径。
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// 会话所使用的 Cookie 容器。
    #[must_use]
    pub fn cookies(&self) -> Arc<Jar> {
        Arc::clone(&self.cookies)
    }

    fn mutate<F>(&self, f: F) -> Result<Session>
    where
        F: FnOnce(&mut Session),
    {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
        config::save_session(&self.path, &guard)?;
        Ok(guard.clone())
    }

    /// 覆盖登录凭据，保存并重新同步 Cookie。
    pub fn update_auth(&self, auth: AuthUpdate) -> Result<()> {
        self.mutate(|s| {
            s.userid = auth.userid;
            s.token = auth.token;
            s.vip_type = auth.vip_type;
            s.vip_token = auth.vip_token;
            s.t1 = auth.t1;
        })?;
        self.sync_cookies();
        info!("登录凭据已更新。");
        Ok(())
    }

    /// 写入服务器下发的 `dfid`，并由它派生 `mid` 与 `uuid`。
    pub fn apply_device_id(&self, dfid: &str) -> Result<()> {
        self.mutate(|s| {
            s.dfid = dfid.to_string();
            s.mid = calc_mid(dfid);
            s.uuid = calc_uuid(dfid, &s.mid);
        })?;
        info!("设备已注册，DFID: {}", dfid);
        Ok(())
    }

    /// 退出登录：删除会话文件，清空凭据和 `dfid`，保留安装标识。
    pub fn logout(&self) -> Result<()> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        config::clear_session(&self.path)?;
        self.set_cookie("userid", "");
        self.set_cookie("token", "");

        guard.userid = ANONYMOUS_USERID.to_string();
        guard.token.clear();
        guard.vip_type = "0".to_string();
        guard.vip_token.clear();
        guard.t1.clear();
        guard.dfid = ANONYMOUS_DFID.to_string();

        config::save_session(&self.path, &guard)?;
        info!("已退出登录。");
        Ok(())
    }

    /// 在 `dfid` 仍为占位值时执行一次设备注册。
    ///
    /// 并发调用者会等待同一次注册完成；注册成功后再进入的调用者会直接返回。
    /// `register` 接收当前会话快照，返回服务器下发的 `dfid`（失败时为 `None`）。
    ///
    /// # 返回
    /// 本次调用是否实际执行了注册并写入了新的 `dfid`。
    pub async fn register_device_with<F, Fut>(&self, register: F) -> Result<bool>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<Option<String>>>,
    {
        let _guard = self.registration.lock().await;

        let session = self.snapshot();
        if !session.needs_device_registration() {
            debug!("设备已注册，跳过。");
            return Ok(false);
        }

        match register(session).await? {
            Some(dfid) if !dfid.is_empty() => {
                self.apply_device_id(&dfid)?;
                Ok(true)
            }
            _ => {
                warn!("设备注册未返回 DFID。");
                Ok(false)
            }
        }
    }

    fn sync_cookies(&self) {
        let session = self.snapshot();
        self.set_cookie("userid", &session.userid);
        self.set_cookie("token", &session.token);
        self.set_cookie("vip_type", &session.vip_type);
        self.set_cookie("vip_token", &session.vip_token);
    }

    fn set_cookie(&self, name: &str, value: &str) {
        for domain in COOKIE_DOMAINS {
            match Url::parse(&format!("https://{domain}/")) {
                Ok(url) => self
                    .cookies
                    .add_cookie_str(&format!("{name}={value}; Domain={domain}; Path=/"), &url),
                Err(e) => warn!("无法为 {} 设置 Cookie: {}", domain, e),
            }
        }
    }
}
