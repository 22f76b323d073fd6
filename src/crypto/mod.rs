//! 本模块包含酷狗概念版协议所需的全部加密原语。
//! 本实现仅用于构造酷狗 API 请求，不应用于实际安全目的。
//!
//! 上层代码不直接组合这些原语，而是通过 [`recipe`] 中的具名加密方案使用。

pub mod recipe;

use std::io::Read;

use aes::{Aes128, Aes256};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use block_padding::Pkcs7;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use flate2::read::ZlibDecoder;
use md5::{Digest, Md5};
use num_bigint::BigUint;
use rand::Rng;
use rsa::{
    Pkcs1v15Encrypt, RsaPublicKey, pkcs8::DecodePublicKey, rand_core::OsRng,
    traits::PublicKeyParts,
};
use tracing::warn;

use crate::error::{KugouError, Result};

/// 酷狗概念版使用的 RSA 公钥。
pub(crate) const PUBLIC_LITE_KEY: &str = "-----BEGIN PUBLIC KEY-----
MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQDECi0Np2UR87scwrvTr72L6oO0
1rBbbBPriSDFPxr3Z5syug0O24QyQO8bg27+0+4kBzTBTBOZ/WWU0WryL1JSXRTX
LgFVxtzIY41Pe7lPOgsfTCn5kZcvKhYKJesKnnJDNr5/abvTGf+rHG3YRwsCHcQ0
8/q6ifSioBszvb3QiwIDAQAB
-----END PUBLIC KEY-----";

/// 无填充 RSA 的分组长度（1024 位密钥）。
const RSA_BLOCK_SIZE: usize = 128;

/// KRC 歌词解密所使用的固定16字节密钥。
const KRC_DECRYPT_KEY: [u8; 16] = [
    0x40, 0x47, 0x61, 0x77, 0x5E, 0x32, 0x74, 0x47, 0x51, 0x36, 0x31, 0x2D, 0xCE, 0xD2, 0x6E, 0x69,
];

const RANDOM_CHARSET: &[u8] = b"1234567890ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `aes_encrypt` 的输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AesOutput {
    /// 小写十六进制密文。
    pub hex: String,
    /// 派生密钥前的原始密钥字符串。显式传入 key 和 iv 时为空。
    pub key: String,
}

/// 计算 MD5 并返回 32 位小写十六进制字符串。
#[must_use]
pub fn md5_hex(input: impl AsRef<[u8]>) -> String {
    hex::encode(Md5::digest(input.as_ref()))
}

/// 生成一个由数字和大写字母组成的随机字符串。
#[must_use]
pub fn random_string(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(RANDOM_CHARSET[rng.random_range(0..RANDOM_CHARSET.len())]))
        .collect()
}

/// 生成一个不带连字符的 32 位 GUID。
#[must_use]
pub fn generate_guid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 由任意字符串派生 `mid`：MD5 摘要按大端无符号整数解释后的十进制表示。
#[must_use]
pub fn calc_mid(source: &str) -> String {
    BigUint::from_bytes_be(&Md5::digest(source.as_bytes())).to_str_radix(10)
}

/// `uuid = md5(dfid + mid)`。
#[must_use]
pub fn calc_uuid(dfid: &str, mid: &str) -> String {
    md5_hex(format!("{dfid}{mid}"))
}

fn cbc_encrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let msg_len = data.len();
    let mut buffer = data.to_vec();
    buffer.resize((msg_len / 16 + 1) * 16, 0);

    let ciphertext_len = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|e| KugouError::Encryption(format!("AES 密钥或 IV 长度无效: {e}")))?
            .encrypt_padded_mut::<Pkcs7>(&mut buffer, msg_len)
            .map_err(|e| KugouError::Encryption(format!("AES CBC 模式加密失败: {e:?}")))?
            .len(),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|e| KugouError::Encryption(format!("AES 密钥或 IV 长度无效: {e}")))?
            .encrypt_padded_mut::<Pkcs7>(&mut buffer, msg_len)
            .map_err(|e| KugouError::Encryption(format!("AES CBC 模式加密失败: {e:?}")))?
            .len(),
        other => {
            return Err(KugouError::Encryption(format!(
                "AES 密钥长度必须为 16 或 32 字节，当前为 {other}"
            )));
        }
    };
    buffer.truncate(ciphertext_len);
    Ok(buffer)
}

fn cbc_decrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Option<Vec<u8>> {
    let mut buffer = data.to_vec();
    let plaintext_len = match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .ok()?
            .decrypt_padded_mut::<Pkcs7>(&mut buffer)
            .ok()?
            .len(),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .ok()?
            .decrypt_padded_mut::<Pkcs7>(&mut buffer)
            .ok()?
            .len(),
        _ => return None,
    };
    buffer.truncate(plaintext_len);
    Some(buffer)
}

/// 由原始密钥字符串派生 AES-256 的密钥与 IV。
///
/// 密钥为原始字符串的 MD5 十六进制（32 字节），IV 为其后 16 个字符。
fn derive_key_iv(raw_key: &str) -> (String, String) {
    let digest = md5_hex(raw_key);
    let iv = digest[16..].to_string();
    (digest, iv)
}

/// AES-CBC 加密，输出小写十六进制。
///
/// # 参数
/// * `plaintext` - 明文。
/// * `key` / `iv` - 两者都提供时按 UTF-8 字节原样作为密钥和 IV 使用；
///   否则以 `key`（缺省时生成 16 位随机小写字符串）派生密钥和 IV。
pub fn aes_encrypt(plaintext: &str, key: Option<&str>, iv: Option<&str>) -> Result<AesOutput> {
    if let (Some(key), Some(iv)) = (key, iv) {
        let ciphertext = cbc_encrypt(key.as_bytes(), iv.as_bytes(), plaintext.as_bytes())?;
        return Ok(AesOutput {
            hex: hex::encode(ciphertext),
            key: String::new(),
        });
    }

    let raw_key = key.map_or_else(|| random_string(16).to_lowercase(), str::to_string);
    let (derived_key, derived_iv) = derive_key_iv(&raw_key);
    let ciphertext = cbc_encrypt(
        derived_key.as_bytes(),
        derived_iv.as_bytes(),
        plaintext.as_bytes(),
    )?;
    Ok(AesOutput {
        hex: hex::encode(ciphertext),
        key: raw_key,
    })
}

/// 解密 `aes_encrypt` 以派生方式产生的十六进制密文。失败时返回 `None`。
#[must_use]
pub fn aes_decrypt(hex_ciphertext: &str, key: &str) -> Option<String> {
    let (derived_key, derived_iv) = derive_key_iv(key);
    aes_decrypt_with_iv(hex_ciphertext, &derived_key, &derived_iv)
}

/// 使用显式密钥和 IV 解密十六进制密文。失败时返回 `None`。
#[must_use]
pub fn aes_decrypt_with_iv(hex_ciphertext: &str, key: &str, iv: &str) -> Option<String> {
    let data = hex::decode(hex_ciphertext.trim()).ok()?;
    let plaintext = cbc_decrypt(key.as_bytes(), iv.as_bytes(), &data)?;
    String::from_utf8(plaintext).ok()
}

/// 歌单接口的 AES 变体：6 位随机密钥，MD5 后前 16 位作密钥、后 16 位作 IV，
/// AES-128-CBC，Base64 输出。
///
/// # 返回
/// `(Base64 密文, 原始密钥)`
pub fn playlist_aes_encrypt(plaintext: &str) -> Result<(String, String)> {
    let raw_key = random_string(6).to_lowercase();
    let ciphertext = playlist_aes_encrypt_with_key(plaintext, &raw_key)?;
    Ok((ciphertext, raw_key))
}

pub(crate) fn playlist_aes_encrypt_with_key(plaintext: &str, raw_key: &str) -> Result<String> {
    let digest = md5_hex(raw_key);
    let ciphertext = cbc_encrypt(
        &digest.as_bytes()[..16],
        &digest.as_bytes()[16..32],
        plaintext.as_bytes(),
    )?;
    Ok(STANDARD.encode(ciphertext))
}

/// 解密歌单 AES 变体产生的 Base64 密文。失败时返回 `None`。
#[must_use]
pub fn playlist_aes_decrypt(base64_ciphertext: &str, raw_key: &str) -> Option<String> {
    let data = STANDARD.decode(base64_ciphertext.trim()).ok()?;
    let digest = md5_hex(raw_key);
    let plaintext = cbc_decrypt(&digest.as_bytes()[..16], &digest.as_bytes()[16..32], &data)?;
    String::from_utf8(plaintext).ok()
}

fn lite_public_key() -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(PUBLIC_LITE_KEY)
        .map_err(|e| KugouError::Encryption(format!("无法解析 RSA 公钥: {e}")))
}

/// 无填充 RSA（教科书式 RSA），使用概念版公钥。输出小写十六进制。
pub fn rsa_encrypt_no_padding(payload: &str) -> Result<String> {
    let key = lite_public_key()?;
    let n = BigUint::from_bytes_be(&key.n().to_bytes_be());
    let e = BigUint::from_bytes_be(&key.e().to_bytes_be());
    rsa_encrypt_no_padding_with(payload, &n, &e)
}

/// 无填充 RSA 的核心逻辑。
///
/// 明文的 UTF-8 字节被左对齐写入一个 128 字节的零缓冲区，
/// 按大端无符号整数做模幂运算，结果补齐或截取为 128 字节。
pub(crate) fn rsa_encrypt_no_padding_with(
    payload: &str,
    modulus: &BigUint,
    exponent: &BigUint,
) -> Result<String> {
    let bytes = payload.as_bytes();
    if bytes.len() > RSA_BLOCK_SIZE {
        return Err(KugouError::Encryption(format!(
            "RSA 明文长度 {} 超过了 {RSA_BLOCK_SIZE} 字节",
            bytes.len()
        )));
    }

    let mut block = [0u8; RSA_BLOCK_SIZE];
    block[..bytes.len()].copy_from_slice(bytes);

    let encrypted = BigUint::from_bytes_be(&block)
        .modpow(exponent, modulus)
        .to_bytes_be();

    let mut output = [0u8; RSA_BLOCK_SIZE];
    if encrypted.len() >= RSA_BLOCK_SIZE {
        output.copy_from_slice(&encrypted[encrypted.len() - RSA_BLOCK_SIZE..]);
    } else {
        output[RSA_BLOCK_SIZE - encrypted.len()..].copy_from_slice(&encrypted);
    }
    Ok(hex::encode(output))
}

/// PKCS#1 v1.5 RSA，使用概念版公钥。输出小写十六进制。
pub fn rsa_encrypt_pkcs1(payload: &str) -> Result<String> {
    let key = lite_public_key()?;
    let encrypted = key
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, payload.as_bytes())
        .map_err(|e| KugouError::Encryption(format!("RSA 加密失败: {e}")))?;
    Ok(hex::encode(encrypted))
}

/// 解码酷狗的 KRC 歌词数据块。
///
/// Base64 解码后去掉 4 字节头部，与固定密钥循环异或，再经 Zlib 解压并按 UTF-8 解码。
/// 任何一步失败都返回空字符串。
#[must_use]
pub fn decode_lyric_blob(base64_content: &str) -> String {
    if base64_content.is_empty() {
        return String::new();
    }

    let Ok(mut data) = STANDARD.decode(base64_content.trim().as_bytes()) else {
        warn!("KRC 数据不是有效的 Base64");
        return String::new();
    };

    if data.len() <= 4 {
        return String::new();
    }

    let payload = &mut data[4..];
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= KRC_DECRYPT_KEY[i % KRC_DECRYPT_KEY.len()];
    }

    let mut decoder = ZlibDecoder::new(&*payload);
    let mut decompressed = Vec::new();
    if let Err(e) = decoder.read_to_end(&mut decompressed) {
        warn!("KRC 数据解压失败: {e}");
        return String::new();
    }

    String::from_utf8(decompressed).unwrap_or_default()
}
