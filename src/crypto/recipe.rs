//! 各接口使用的具名加密方案。
//!
//! 酷狗不同接口的加密方式各不相同，这里把它们收拢为一个封闭的枚举，
//! 接口层只需按名称选择方案，而不在调用处拼装原语。

use serde_json::Value;

use super::{
    aes_decrypt, aes_decrypt_with_iv, aes_encrypt, playlist_aes_decrypt, playlist_aes_encrypt,
    rsa_encrypt_no_padding, rsa_encrypt_pkcs1,
};
use crate::error::Result;

/// 对称加密方案。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    /// 不加密，原样传输。
    Plain,
    /// AES-256-CBC，随机密钥经 MD5 派生，十六进制输出。
    AesRandomKey,
    /// AES-CBC，固定密钥和 IV，十六进制输出。
    AesFixedKey {
        /// 密钥原文
        key: &'static str,
        /// IV 原文
        iv: &'static str,
    },
    /// 歌单接口的 AES-128-CBC 变体，6 位随机密钥，Base64 输出。
    PlaylistAes,
}

/// 加密结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// 密文
    pub ciphertext: String,
    /// 用于解密响应的原始密钥。固定密钥和明文方案下为空。
    pub key: String,
}

impl Recipe {
    /// 按本方案加密明文。
    pub fn seal(&self, plaintext: &str) -> Result<Sealed> {
        match self {
            Self::Plain => Ok(Sealed {
                ciphertext: plaintext.to_string(),
                key: String::new(),
            }),
            Self::AesRandomKey => {
                let out = aes_encrypt(plaintext, None, None)?;
                Ok(Sealed {
                    ciphertext: out.hex,
                    key: out.key,
                })
            }
            Self::AesFixedKey { key, iv } => {
                let out = aes_encrypt(plaintext, Some(*key), Some(*iv))?;
                Ok(Sealed {
                    ciphertext: out.hex,
                    key: String::new(),
                })
            }
            Self::PlaylistAes => {
                let (ciphertext, key) = playlist_aes_encrypt(plaintext)?;
                Ok(Sealed { ciphertext, key })
            }
        }
    }

    /// 按本方案解密。`key` 是 `seal` 返回的原始密钥；失败时返回 `None`。
    #[must_use]
    pub fn open(&self, ciphertext: &str, key: &str) -> Option<String> {
        match self {
            Self::Plain => Some(ciphertext.to_string()),
            Self::AesRandomKey => aes_decrypt(ciphertext, key),
            Self::AesFixedKey { key, iv } => aes_decrypt_with_iv(ciphertext, key, iv),
            Self::PlaylistAes => playlist_aes_decrypt(ciphertext, key),
        }
    }
}

/// RSA 密钥封装方式，用于 `pk` 与 `p` 字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyWrap {
    /// 教科书式 RSA，登录、刷新令牌和用户类接口使用。
    NoPadding,
    /// PKCS#1 v1.5，设备注册和删除歌单使用。
    Pkcs1,
}

impl KeyWrap {
    /// 把 JSON 负载紧凑序列化后用 RSA 加密，返回大写十六进制。
    pub fn wrap(&self, payload: &Value) -> Result<String> {
        let text = serde_json::to_string(payload)?;
        let hex = match self {
            Self::NoPadding => rsa_encrypt_no_padding(&text)?,
            Self::Pkcs1 => rsa_encrypt_pkcs1(&text)?,
        };
        Ok(hex.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_every_recipe_opens_what_it_seals() {
        let recipes = [
            Recipe::Plain,
            Recipe::AesRandomKey,
            Recipe::AesFixedKey {
                key: "fd14b35e3f81af3817a20ae7adae7020",
                iv: "17a20ae7adae7020",
            },
            Recipe::PlaylistAes,
        ];
        let plaintext = r#"{"listid":"42","total_ver":0,"type":1}"#;
        for recipe in recipes {
            let sealed = recipe.seal(plaintext).unwrap();
            assert_eq!(
                recipe.open(&sealed.ciphertext, &sealed.key).as_deref(),
                Some(plaintext),
                "{recipe:?}"
            );
        }
    }

    #[test]
    fn test_key_wrap_is_uppercase_hex() {
        let payload = json!({ "clienttime_ms": 1, "key": "abc" });
        for wrap in [KeyWrap::NoPadding, KeyWrap::Pkcs1] {
            let out = wrap.wrap(&payload).unwrap();
            assert_eq!(out.len(), 256);
            assert!(out.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }
}
