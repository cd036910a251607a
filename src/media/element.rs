use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};

use super::{Listener, ListenerId, MediaHandle, MediaSource, NetworkState, PlaybackControl};
use crate::error::MediaError;
use crate::events::PlayerEvent;

struct ElementControl {
    paused: bool,
    position: Duration,
    playback_rate: f32,
    looped: bool,
    /// 最近一帧画面，供截图使用
    frame: Option<Bytes>,
}

impl Default for ElementControl {
    fn default() -> Self {
        Self {
            paused: true,
            position: Duration::ZERO,
            playback_rate: 1.0,
            looped: false,
            frame: None,
        }
    }
}

struct Registration {
    id: ListenerId,
    event: PlayerEvent,
    listener: Listener,
}

/// 进程内的视频元素
pub struct VideoElement {
    sources: Vec<MediaSource>,
    network_state: RwLock<NetworkState>,
    control: RwLock<ElementControl>,
    listeners: Mutex<Vec<Registration>>,
    next_listener_id: AtomicU64,
}

impl VideoElement {
    pub fn new(sources: Vec<MediaSource>) -> Self {
        Self {
            sources,
            network_state: RwLock::new(NetworkState::Empty),
            control: RwLock::new(ElementControl::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    pub fn sources(&self) -> &[MediaSource] {
        &self.sources
    }

    /// 开始加载资源
    pub fn load(&self) {
        if self.sources.is_empty() {
            self.set_network_state(NetworkState::NoSource);
            self.dispatch(PlayerEvent::Error);
            return;
        }
        self.set_network_state(NetworkState::Loading);
        self.dispatch(PlayerEvent::LoadStart);
    }

    pub fn set_network_state(&self, state: NetworkState) {
        *self.network_state.write() = state;
    }

    /// 更新最近一帧画面
    pub fn set_frame(&self, frame: Bytes) {
        self.control.write().frame = Some(frame);
    }

    /// 通知所有监听该事件的监听器
    pub fn dispatch(&self, event: PlayerEvent) {
        // 在锁外调用，监听器内可以注销自身
        let matched: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .filter(|reg| reg.event == event)
            .map(|reg| reg.listener.clone())
            .collect();

        tracing::trace!(%event, listeners = matched.len(), "dispatch media event");
        for listener in matched {
            listener(event);
        }
    }

    /// 已注册的监听器数量
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl MediaHandle for VideoElement {
    fn network_state(&self) -> NetworkState {
        *self.network_state.read()
    }

    fn add_event_listener(&self, event: PlayerEvent, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(Registration {
            id,
            event,
            listener,
        });
        id
    }

    fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|reg| reg.id != id);
        listeners.len() != before
    }
}

impl PlaybackControl for VideoElement {
    fn play(&self) {
        self.control.write().paused = false;
        self.dispatch(PlayerEvent::Play);
    }

    fn pause(&self) {
        self.control.write().paused = true;
        self.dispatch(PlayerEvent::Pause);
    }

    fn seek(&self, position: Duration) -> Result<(), MediaError> {
        if self.network_state().is_uninitialized() {
            return Err(MediaError::NotLoaded);
        }
        self.dispatch(PlayerEvent::Seeking);
        self.control.write().position = position;
        self.dispatch(PlayerEvent::Seeked);
        Ok(())
    }

    fn set_playback_rate(&self, rate: f32) -> Result<(), MediaError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(MediaError::InvalidPlaybackRate(rate));
        }
        self.control.write().playback_rate = rate;
        self.dispatch(PlayerEvent::RateChange);
        Ok(())
    }

    fn set_looped(&self, looped: bool) {
        self.control.write().looped = looped;
    }

    fn capture_frame(&self) -> Result<Bytes, MediaError> {
        self.control.read().frame.clone().ok_or(MediaError::NoFrame)
    }

    fn paused(&self) -> bool {
        self.control.read().paused
    }

    fn position(&self) -> Duration {
        self.control.read().position
    }

    fn playback_rate(&self) -> f32 {
        self.control.read().playback_rate
    }

    fn looped(&self) -> bool {
        self.control.read().looped
    }
}
