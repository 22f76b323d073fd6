//! 负责处理客户端配置和会话文件的持久化。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;
use crate::session::Session;

/// 应用配置目录下的子目录名。
const APP_DIR_NAME: &str = "kugou-helper";
/// 会话文件名。
const SESSION_FILE_NAME: &str = "session.json";

/// 酷狗概念版的默认 API 网关。
pub const DEFAULT_GATEWAY: &str = "https://gateway.kugou.com";
/// 概念版安卓客户端的 User-Agent。
pub const DEFAULT_USER_AGENT: &str = "Android15-1070-11083-46-0-DiscoveryDRADProtocol-wifi";

/// 客户端配置。
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 会话文件的完整路径。
    pub session_path: PathBuf,
    /// 未显式指定主机的请求所使用的网关。
    pub gateway: String,
    /// 每个请求携带的 User-Agent。
    pub user_agent: String,
}

impl ClientConfig {
    /// 使用指定的会话文件路径和默认网关创建配置。
    pub fn with_session_path(session_path: impl Into<PathBuf>) -> Self {
        Self {
            session_path: session_path.into(),
            gateway: DEFAULT_GATEWAY.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// 使用系统配置目录下的 `kugou-helper/session.json` 创建配置。
    pub fn from_default_dir() -> Result<Self> {
        Ok(Self::with_session_path(get_config_file_path(
            SESSION_FILE_NAME,
        )?))
    }
}

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "session.json"。
pub(crate) fn get_config_file_path(filename: &str) -> Result<PathBuf> {
    if let Some(mut config_dir) = dirs::config_dir() {
        config_dir.push(APP_DIR_NAME);
        fs::create_dir_all(&config_dir)?;
        config_dir.push(filename);
        Ok(config_dir)
    } else {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "无法找到用户配置目录").into())
    }
}

/// 从文件加载会话。文件不存在或内容损坏时返回 `None`。
pub(crate) fn load_session(path: &Path) -> Option<Session> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("会话文件不存在，将创建新的会话。");
            return None;
        }
        Err(e) => {
            warn!("读取会话文件失败: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<Session>(&content) {
        Ok(session) => {
            info!("已从缓存加载会话，用户 ID: {}", session.userid);
            Some(session)
        }
        Err(e) => {
            warn!("会话文件已损坏，将忽略: {}", e);
            None
        }
    }
}

/// 将会话序列化为 JSON 并保存到文件。
pub(crate) fn save_session(path: &Path, session: &Session) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    let content = serde_json::to_string_pretty(session)?;
    fs::write(path, content)?;
    info!("会话已保存。");
    Ok(())
}

/// 删除会话文件。文件不存在时什么也不做。
pub(crate) fn clear_session(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("会话文件已删除。");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("kugou-helper-config-{}", uuid::Uuid::new_v4().simple()))
            .join("session.json")
    }

    #[test]
    fn test_missing_and_corrupt_files_load_as_none() {
        let path = temp_path();
        assert!(load_session(&path).is_none());

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(load_session(&path).is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let path = temp_path();
        let session = Session {
            userid: "42".to_string(),
            token: "tok".to_string(),
            ..Session::default()
        };
        save_session(&path, &session).unwrap();
        assert_eq!(load_session(&path), Some(session));

        clear_session(&path).unwrap();
        assert!(!path.exists());
        clear_session(&path).unwrap();
    }
}
