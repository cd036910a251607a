//! 媒体元素抽象。
//!
//! 容器组件只通过 [`MediaHandle`] 观察媒体元素（网络状态与生命周期事件），
//! 控制栏通过 [`PlaybackControl`] 操作播放。[`VideoElement`] 是两者的进程内实现。

mod element;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::error::MediaError;
use crate::events::PlayerEvent;

pub use element::VideoElement;

/// 媒体资源的网络状态（对应 HTMLMediaElement.networkState）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NetworkState {
    /// 尚未初始化
    Empty = 0,
    /// 已选定资源，当前无网络活动
    Idle = 1,
    /// 正在加载
    Loading = 2,
    /// 找不到可用的资源
    NoSource = 3,
}

impl NetworkState {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(NetworkState::Empty),
            1 => Some(NetworkState::Idle),
            2 => Some(NetworkState::Loading),
            3 => Some(NetworkState::NoSource),
            _ => None,
        }
    }

    /// 媒体元素是否从未开始加载
    pub fn is_uninitialized(self) -> bool {
        self == NetworkState::Empty
    }
}

/// 一个候选视频源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub src: String,
    pub mime: &'static str,
}

impl MediaSource {
    pub const MIME_TYPES: [&'static str; 3] = ["video/mp4", "video/ogg", "video/webm"];

    /// 同一地址按 mp4、ogg、webm 的顺序生成候选源
    pub fn variants(src: &str) -> Vec<MediaSource> {
        Self::MIME_TYPES
            .into_iter()
            .map(|mime| MediaSource {
                src: src.to_string(),
                mime,
            })
            .collect()
    }
}

/// 事件监听函数
pub type Listener = Arc<dyn Fn(PlayerEvent) + Send + Sync + 'static>;

/// 监听器注册标识，用于注销
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// 容器组件可观察的媒体句柄
pub trait MediaHandle: Send + Sync {
    fn network_state(&self) -> NetworkState;

    fn add_event_listener(&self, event: PlayerEvent, listener: Listener) -> ListenerId;

    /// 返回 false 表示该监听器已被注销
    fn remove_event_listener(&self, id: ListenerId) -> bool;
}

pub trait PlaybackControl {
    fn play(&self);
    fn pause(&self);
    fn seek(&self, position: Duration) -> Result<(), MediaError>;
    fn set_playback_rate(&self, rate: f32) -> Result<(), MediaError>;
    fn set_looped(&self, looped: bool);
    fn capture_frame(&self) -> Result<Bytes, MediaError>;

    fn paused(&self) -> bool;
    fn position(&self) -> Duration;
    fn playback_rate(&self) -> f32;
    fn looped(&self) -> bool;
}
