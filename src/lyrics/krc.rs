//! # KRC 格式解析器
//!
//! 解析分两遍进行：第一遍收集 `[language:...]` 中的翻译、音译以及元数据标签，
//! 第二遍解析 `[start,duration]` 开头的歌词行，并按行号挂上翻译和音译。

use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{LyricDocument, LyricLine, WordSpan};

/// 匹配 KRC 行级时间戳 `[start,duration]`
static KRC_LINE_TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<start>\d+),(?P<duration>\d+)\](?P<rest>.*)$")
        .expect("编译 KRC_LINE_TIMESTAMP_REGEX 失败")
});

/// 匹配逐字时间戳和文本 `<offset,duration,N>text`
static KRC_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?P<offset>\d+),(?P<duration>\d+),\d+>(?P<text>[^<]+)")
        .expect("编译 KRC_WORD_REGEX 失败")
});

/// 匹配元数据标签 `[key:value]`
static KRC_METADATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<key>[a-zA-Z]+):(?P<value>.*)\]$").expect("编译 KRC_METADATA_REGEX 失败")
});

const LANGUAGE_TAG_PREFIX: &str = "[language:";

/// 翻译区块的 `type`。
const CONTENT_TYPE_TRANSLATION: u8 = 1;
/// 音译区块的 `type`。
const CONTENT_TYPE_ROMANIZATION: u8 = 0;

#[derive(Debug, Deserialize)]
struct KrcJson {
    #[serde(default)]
    content: Vec<KrcContentEntry>,
}

#[derive(Debug, Deserialize)]
struct KrcContentEntry {
    #[serde(rename = "lyricContent", default)]
    lyric_content: Option<Vec<Vec<String>>>,
    #[serde(rename = "type")]
    content_type: u8,
}

#[derive(Debug, Default)]
struct AuxiliaryContent {
    translations: Option<Vec<Vec<String>>>,
    romanizations: Option<Vec<Vec<String>>>,
}

/// 解析解密后的 KRC 文本。
///
/// 永远不会失败：无法识别的行被跳过，损坏的 `[language:...]` 标签被忽略。
#[must_use]
pub fn parse_krc(content: &str) -> LyricDocument {
    let mut document = LyricDocument::default();
    let mut aux = AuxiliaryContent::default();

    for line in content.lines().filter(|line| !line.is_empty()) {
        if let Some(encoded) = line.strip_prefix(LANGUAGE_TAG_PREFIX) {
            let encoded = encoded.strip_suffix(']').unwrap_or(encoded);
            match decode_language_tag(encoded) {
                Some(parsed) => aux = parsed,
                None => warn!("KRC 的 language 标签无法解析，已忽略"),
            }
            continue;
        }

        if let Some(caps) = KRC_METADATA_REGEX.captures(line) {
            document
                .metadata
                .insert(caps["key"].to_string(), caps["value"].to_string());
        }
    }

    for line in content.lines().filter(|line| !line.is_empty()) {
        let Some(caps) = KRC_LINE_TIMESTAMP_REGEX.captures(line) else {
            continue;
        };
        let (Ok(start_ms), Ok(duration_ms)) =
            (caps["start"].parse::<u64>(), caps["duration"].parse::<u64>())
        else {
            debug!("KRC 行时间戳超出范围: {line}");
            continue;
        };

        let rest = &caps["rest"];
        let words: Vec<WordSpan> = KRC_WORD_REGEX
            .captures_iter(rest)
            .filter_map(|word| {
                Some(WordSpan {
                    offset_ms: word["offset"].parse().ok()?,
                    duration_ms: word["duration"].parse().ok()?,
                    text: word["text"].to_string(),
                })
            })
            .collect();

        let text = if words.is_empty() {
            rest.to_string()
        } else {
            words.iter().map(|w| w.text.as_str()).collect()
        };

        let index = document.lines.len();
        let translation = aux
            .translations
            .as_ref()
            .and_then(|list| list.get(index))
            .and_then(|entry| entry.first())
            .cloned();
        let romanization = aux
            .romanizations
            .as_ref()
            .and_then(|list| list.get(index))
            .map(|entry| entry.concat());

        document.lines.push(LyricLine {
            start_ms,
            duration_ms,
            text,
            translation,
            romanization,
            words,
        });
    }

    document
}

/// 解码 `[language:...]` 标签中的 Base64 JSON，兼容 URL 安全字母表和缺失的填充。
fn decode_language_tag(encoded: &str) -> Option<AuxiliaryContent> {
    let mut normalized = encoded.trim().replace('-', "+").replace('_', "/");
    let remainder = normalized.len() % 4;
    if remainder > 0 {
        normalized.push_str(&"=".repeat(4 - remainder));
    }

    let bytes = general_purpose::STANDARD.decode(normalized).ok()?;
    let json: KrcJson = serde_json::from_slice(&bytes).ok()?;

    let pick = |kind: u8| {
        json.content
            .iter()
            .find(|entry| entry.content_type == kind)
            .and_then(|entry| entry.lyric_content.clone())
    };

    Some(AuxiliaryContent {
        translations: pick(CONTENT_TYPE_TRANSLATION),
        romanizations: pick(CONTENT_TYPE_ROMANIZATION),
    })
}
