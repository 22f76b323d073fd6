#![warn(missing_docs)]

//! # Kugou Helper RS
//!
//! 酷狗概念版移动端协议的 Rust 客户端库。
//!
//! ## 主要功能
//!
//! - **登录**: 短信验证码登录、二维码登录，以及串联 `t1` 的令牌刷新。
//! - **设备注册**: 首次使用时向风控服务注册设备，并发调用只注册一次。
//! - **曲库**: 搜索、播放链接、歌单、排行榜、每日推荐和用户中心。
//! - **歌词**: 下载并解密 KRC 歌词，解析逐字时间、翻译和音译。
//!
//! 请求签名、加密和会话持久化都在库内部完成，调用者只需要使用 [`KugouClient`]。
//!
//! ## 搜索并获取播放链接
//!
//! ```rust,no_run
//! use kugou_helper_rs::{AudioQuality, ClientConfig, KugouClient};
//!
//! async {
//!     let client = KugouClient::new(ClientConfig::from_default_dir().unwrap()).unwrap();
//!     client.init_device().await.unwrap();
//!
//!     let songs = client.search("晴天", 1).await.unwrap();
//!     if let Some(song) = songs.first() {
//!         let play = client.get_play_info(&song.hash, AudioQuality::High).await.unwrap();
//!         match play.urls.first() {
//!             Some(url) => println!("{} => {}", song.name, url),
//!             None if play.requires_vip() => println!("需要 VIP"),
//!             None => println!("没有可用的播放地址"),
//!         }
//!     }
//! };
//! ```
//!
//! ## 解析 KRC 歌词
//!
//! ```rust
//! use kugou_helper_rs::lyrics::parse_krc;
//!
//! let document = parse_krc("[ar:Tester]\n[0,1000]<0,500,0>Hel<500,500,0>lo");
//! assert_eq!(document.lines[0].text, "Hello");
//! assert_eq!(document.lines[0].words.len(), 2);
//! ```
pub mod api;
pub mod client;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod lyrics;
pub mod models;
pub mod session;
pub mod signature;
pub mod transport;

pub use crate::{
    client::{KugouClient, LyricResult, PlaylistDetail},
    config::ClientConfig,
    error::{KugouError, Result},
    lyrics::{LyricDocument, LyricLine, WordSpan},
    models::AudioQuality,
    session::{AuthUpdate, Session, SessionManager},
    transport::{HttpReply, HttpSender, PreparedRequest},
};
