//! KRC 歌词的数据模型与解析器。

pub mod krc;

use std::collections::HashMap;

pub use krc::parse_krc;

/// 一个逐字时间片。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSpan {
    /// 相对于所在行开始时间的偏移（毫秒）。
    pub offset_ms: u64,
    /// 持续时间（毫秒）。
    pub duration_ms: u64,
    /// 文本
    pub text: String,
}

impl WordSpan {
    /// 该片段在整首歌中的绝对开始时间。
    #[must_use]
    pub const fn absolute_start_ms(&self, line: &LyricLine) -> u64 {
        line.start_ms + self.offset_ms
    }
}

/// 一行歌词。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricLine {
    /// 开始时间（毫秒）。
    pub start_ms: u64,
    /// 持续时间（毫秒）。
    pub duration_ms: u64,
    /// 整行文本，有逐字信息时为各片段文本的拼接。
    pub text: String,
    /// 按行号对应的翻译。
    pub translation: Option<String>,
    /// 按行号对应的音译。
    pub romanization: Option<String>,
    /// 逐字信息，纯文本行为空。
    pub words: Vec<WordSpan>,
}

/// 解析后的整首歌词。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricDocument {
    /// `[ar:...]`、`[ti:...]` 等元数据标签。
    pub metadata: HashMap<String, String>,
    /// 按出现顺序排列的歌词行。
    pub lines: Vec<LyricLine>,
}

impl LyricDocument {
    /// 是否没有任何歌词行。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 是否含有翻译。
    #[must_use]
    pub fn has_translation(&self) -> bool {
        self.lines.iter().any(|line| line.translation.is_some())
    }
}
