//! 视频可用性与缓冲状态监测。
//!
//! 挂载后调度一个一次性定时器：到期时媒体元素仍处于 [`NetworkState::Empty`]，
//! 就认为视频不可用（`usable = false`，之后不会恢复）。同时监听 `waiting` /
//! `playing` 两个事件维护 `buffering` 开关。
//!
//! [`NetworkState::Empty`]: crate::media::NetworkState::Empty

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::PlayerError;
use crate::events::PlayerEvent;
use crate::media::{ListenerId, MediaHandle};
use crate::scheduler::{Scheduler, TimerHandle};

/// 挂载后等待视频开始加载的时长
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityState {
    /// 视频是否可播放
    pub usable: bool,
    /// 是否正在缓冲
    pub buffering: bool,
}

impl Default for AvailabilityState {
    fn default() -> Self {
        Self {
            usable: true,
            buffering: false,
        }
    }
}

type StateCallback = Arc<dyn Fn(AvailabilityState) + Send + Sync + 'static>;

/// 待通知的状态变化，按发生顺序排队
#[derive(Default)]
struct Delivery {
    pending: VecDeque<AvailabilityState>,
    running: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<AvailabilityState>,
    callback: Mutex<Option<StateCallback>>,
    delivery: Mutex<Delivery>,
}

impl Shared {
    fn update(&self, apply: impl FnOnce(&mut AvailabilityState)) {
        {
            let mut state = self.state.lock();
            let before = *state;
            apply(&mut state);
            if *state == before {
                return;
            }

            // 持有 state 锁入队，队列顺序与状态变化顺序一致
            let mut delivery = self.delivery.lock();
            delivery.pending.push_back(*state);
            if delivery.running {
                return;
            }
            delivery.running = true;
        }
        self.deliver();
    }

    /// 回调在所有锁之外执行；回调内再次引起的变化由当前循环继续通知
    fn deliver(&self) {
        loop {
            let next = {
                let mut delivery = self.delivery.lock();
                match delivery.pending.pop_front() {
                    Some(state) => state,
                    None => {
                        delivery.running = false;
                        return;
                    }
                }
            };

            let callback = self.callback.lock().clone();
            if let Some(cb) = callback {
                cb(next);
            }
        }
    }

    fn mark_unusable(&self) {
        self.update(|state| state.usable = false);
    }

    fn set_buffering(&self, buffering: bool) {
        self.update(|state| state.buffering = buffering);
    }
}

struct Attachment {
    media: Arc<dyn MediaHandle>,
    timer: TimerHandle,
    listeners: [ListenerId; 2],
}

pub struct AvailabilityWatchdog {
    shared: Arc<Shared>,
    grace_period: Duration,
    attachment: Option<Attachment>,
}

impl Default for AvailabilityWatchdog {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}

impl AvailabilityWatchdog {
    pub fn new(grace_period: Duration) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            grace_period,
            attachment: None,
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn state(&self) -> AvailabilityState {
        *self.shared.state.lock()
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// 设置状态变化回调
    ///
    /// 只在状态实际变化时调用；多次设置会替换之前的回调
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(AvailabilityState) + Send + Sync + 'static,
    {
        *self.shared.callback.lock() = Some(Arc::new(callback));
    }

    /// 开始监测媒体元素
    ///
    /// 媒体元素必须已经创建；重复挂载会返回 [`PlayerError::AlreadyAttached`]
    pub fn attach(
        &mut self,
        media: Arc<dyn MediaHandle>,
        scheduler: &dyn Scheduler,
    ) -> Result<(), PlayerError> {
        if self.attachment.is_some() {
            return Err(PlayerError::AlreadyAttached);
        }

        let timer = {
            let shared = Arc::downgrade(&self.shared);
            let media = Arc::downgrade(&media);
            scheduler.schedule(
                self.grace_period,
                Box::new(move || check_availability(&shared, &media)),
            )
        };

        let waiting = {
            let shared = Arc::downgrade(&self.shared);
            media.add_event_listener(
                PlayerEvent::Waiting,
                Arc::new(move |_: PlayerEvent| with_shared(&shared, |s| s.set_buffering(true))),
            )
        };
        let playing = {
            let shared = Arc::downgrade(&self.shared);
            media.add_event_listener(
                PlayerEvent::Playing,
                Arc::new(move |_: PlayerEvent| with_shared(&shared, |s| s.set_buffering(false))),
            )
        };

        tracing::debug!(grace_period = ?self.grace_period, "watchdog attached");
        self.attachment = Some(Attachment {
            media,
            timer,
            listeners: [waiting, playing],
        });
        Ok(())
    }

    /// 取消定时器并注销监听器，可重复调用
    pub fn detach(&mut self) {
        let Some(attachment) = self.attachment.take() else {
            return;
        };

        attachment.timer.cancel();
        for id in attachment.listeners {
            attachment.media.remove_event_listener(id);
        }
        tracing::debug!("watchdog detached");
    }
}

impl Drop for AvailabilityWatchdog {
    fn drop(&mut self) {
        self.detach();
    }
}

fn with_shared(shared: &Weak<Shared>, apply: impl FnOnce(&Shared)) {
    if let Some(shared) = shared.upgrade() {
        apply(&shared);
    }
}

fn check_availability(shared: &Weak<Shared>, media: &Weak<dyn MediaHandle>) {
    let (Some(shared), Some(media)) = (shared.upgrade(), media.upgrade()) else {
        return;
    };

    let network_state = media.network_state();
    if network_state.is_uninitialized() {
        tracing::warn!("can not find video source, marking player unusable");
        shared.mark_unusable();
    } else {
        tracing::debug!(?network_state, "video source started loading");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::media::{MediaSource, NetworkState, VideoElement};
    use crate::scheduler::ManualScheduler;

    fn video() -> Arc<VideoElement> {
        Arc::new(VideoElement::new(MediaSource::variants(
            "https://example.com/v.mp4",
        )))
    }

    #[test]
    fn initial_state_is_usable_and_not_buffering() {
        let watchdog = AvailabilityWatchdog::default();
        assert_eq!(
            watchdog.state(),
            AvailabilityState {
                usable: true,
                buffering: false
            }
        );
        assert_eq!(watchdog.grace_period(), Duration::from_millis(3000));
    }

    #[test]
    fn unloaded_media_becomes_unusable_after_grace_period() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        watchdog.attach(video.clone(), &scheduler).unwrap();

        scheduler.advance(Duration::from_millis(2999));
        assert!(watchdog.state().usable);

        scheduler.advance(Duration::from_millis(1));
        assert!(!watchdog.state().usable);

        // 之后开始加载也不会恢复
        video.load();
        scheduler.advance(Duration::from_secs(60));
        assert!(!watchdog.state().usable);
    }

    #[test]
    fn loading_media_stays_usable() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        watchdog.attach(video.clone(), &scheduler).unwrap();

        video.load();
        scheduler.advance(Duration::from_millis(3000));
        assert!(watchdog.state().usable);

        // 只检查一次，之后的退化不会被发现
        video.set_network_state(NetworkState::Empty);
        scheduler.advance(Duration::from_secs(60));
        assert!(watchdog.state().usable);
    }

    #[test]
    fn idle_and_no_source_count_as_started() {
        for state in [NetworkState::Idle, NetworkState::NoSource] {
            let scheduler = ManualScheduler::new();
            let video = video();
            video.set_network_state(state);
            let mut watchdog = AvailabilityWatchdog::default();
            watchdog.attach(video, &scheduler).unwrap();

            scheduler.advance(DEFAULT_GRACE_PERIOD);
            assert!(watchdog.state().usable, "{state:?}");
        }
    }

    #[test]
    fn buffering_follows_waiting_and_playing() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        watchdog.attach(video.clone(), &scheduler).unwrap();

        let sequence = [
            (PlayerEvent::Waiting, true),
            (PlayerEvent::Waiting, true),
            (PlayerEvent::Playing, false),
            (PlayerEvent::Playing, false),
            (PlayerEvent::Waiting, true),
            (PlayerEvent::Pause, true),
            (PlayerEvent::Playing, false),
        ];
        for (event, buffering) in sequence {
            video.dispatch(event);
            assert_eq!(watchdog.state().buffering, buffering, "after {event}");
        }
    }

    #[test]
    fn buffering_and_usable_are_independent() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        watchdog.attach(video.clone(), &scheduler).unwrap();

        video.dispatch(PlayerEvent::Waiting);
        scheduler.advance(DEFAULT_GRACE_PERIOD);
        assert_eq!(
            watchdog.state(),
            AvailabilityState {
                usable: false,
                buffering: true
            }
        );

        video.dispatch(PlayerEvent::Playing);
        assert_eq!(
            watchdog.state(),
            AvailabilityState {
                usable: false,
                buffering: false
            }
        );
    }

    #[test]
    fn detach_before_grace_period_cancels_timer_and_listeners() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = changes.clone();
        watchdog.set_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        watchdog.attach(video.clone(), &scheduler).unwrap();
        assert_eq!(video.listener_count(), 2);
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(Duration::from_millis(1500));
        watchdog.detach();
        assert_eq!(video.listener_count(), 0);
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(Duration::from_secs(10));
        video.dispatch(PlayerEvent::Waiting);
        assert_eq!(changes.load(Ordering::SeqCst), 0);
        assert_eq!(watchdog.state(), AvailabilityState::default());
    }

    #[test]
    fn detach_is_idempotent_and_allows_reattach() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();

        watchdog.detach();
        watchdog.attach(video.clone(), &scheduler).unwrap();
        watchdog.detach();
        watchdog.detach();
        assert!(!watchdog.is_attached());

        watchdog.attach(video.clone(), &scheduler).unwrap();
        assert_eq!(video.listener_count(), 2);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn attaching_twice_is_rejected() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        watchdog.attach(video.clone(), &scheduler).unwrap();

        assert!(matches!(
            watchdog.attach(video.clone(), &scheduler),
            Err(PlayerError::AlreadyAttached)
        ));
        assert_eq!(video.listener_count(), 2);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn drop_cleans_up() {
        let scheduler = ManualScheduler::new();
        let video = video();
        {
            let mut watchdog = AvailabilityWatchdog::default();
            watchdog.attach(video.clone(), &scheduler).unwrap();
        }
        assert_eq!(video.listener_count(), 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn callback_fires_only_on_change() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        watchdog.set_callback(move |state| sink.lock().push(state));
        watchdog.attach(video.clone(), &scheduler).unwrap();

        video.dispatch(PlayerEvent::Waiting);
        video.dispatch(PlayerEvent::Waiting);
        video.dispatch(PlayerEvent::Playing);
        scheduler.advance(DEFAULT_GRACE_PERIOD);

        assert_eq!(
            *seen.lock(),
            [
                AvailabilityState {
                    usable: true,
                    buffering: true
                },
                AvailabilityState {
                    usable: true,
                    buffering: false
                },
                AvailabilityState {
                    usable: false,
                    buffering: false
                },
            ]
        );
    }

    #[test]
    fn callback_may_drive_the_media_again() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let media = video.clone();
        watchdog.set_callback(move |state| {
            sink.lock().push(state.buffering);
            if state.buffering {
                media.dispatch(PlayerEvent::Playing);
            }
        });
        watchdog.attach(video.clone(), &scheduler).unwrap();

        video.dispatch(PlayerEvent::Waiting);
        assert!(!watchdog.state().buffering);
        assert_eq!(*seen.lock(), [true, false]);

        video.dispatch(PlayerEvent::Waiting);
        assert_eq!(*seen.lock(), [true, false, true, false]);
    }

    #[test]
    fn last_notification_matches_final_state_across_threads() {
        let scheduler = ManualScheduler::new();
        let video = video();
        let mut watchdog = AvailabilityWatchdog::default();
        let last = Arc::new(Mutex::new(None));
        let sink = last.clone();
        watchdog.set_callback(move |state| *sink.lock() = Some(state));
        watchdog.attach(video.clone(), &scheduler).unwrap();

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let video = video.clone();
                scope.spawn(move || {
                    for i in 0..500 {
                        let event = if (i + worker) % 2 == 0 {
                            PlayerEvent::Waiting
                        } else {
                            PlayerEvent::Playing
                        };
                        video.dispatch(event);
                    }
                });
            }
            scope.spawn(|| scheduler.advance(DEFAULT_GRACE_PERIOD));
        });

        assert_eq!(*last.lock(), Some(watchdog.state()));
    }
}
