use std::sync::Arc;

use crate::config::PlayerConfig;
use crate::controller::{ControlLabels, Controller};
use crate::error::PlayerError;
use crate::media::{MediaSource, VideoElement};
use crate::scheduler::Scheduler;
use crate::watchdog::{AvailabilityState, AvailabilityWatchdog};

/// 视频找不到时显示的提示
pub const NOT_FOUND_TIP: &str = "抱歉！视频找不到了 (｡ ́︿ ̀｡)";

/// 主体区域显示的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Video,
    NotFound(&'static str),
}

/// 一次渲染所需的全部状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub surface: Surface,
    /// 显示缓冲动画
    pub loading: bool,
    /// 显示关灯遮罩
    pub light_off: bool,
    pub labels: ControlLabels,
}

/// 视频播放器容器
pub struct JolPlayer {
    config: PlayerConfig,
    video: Arc<VideoElement>,
    watchdog: AvailabilityWatchdog,
    controller: Controller,
}

impl JolPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        let video = Arc::new(VideoElement::new(MediaSource::variants(&config.video_src)));
        let watchdog = AvailabilityWatchdog::new(config.grace_period());
        let controller = Controller::new(config.language);

        Self {
            config,
            video,
            watchdog,
            controller,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn video(&self) -> Arc<VideoElement> {
        self.video.clone()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn state(&self) -> AvailabilityState {
        self.watchdog.state()
    }

    pub fn is_mounted(&self) -> bool {
        self.watchdog.is_attached()
    }

    /// 设置可用性状态变化回调
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(AvailabilityState) + Send + Sync + 'static,
    {
        self.watchdog.set_callback(callback);
    }

    /// 挂载：开始监测视频是否可用以及缓冲状态
    pub fn mount(&mut self, scheduler: &dyn Scheduler) -> Result<(), PlayerError> {
        self.watchdog.attach(self.video.clone(), scheduler)?;
        tracing::info!(src = %self.config.video_src, "player mounted");
        Ok(())
    }

    /// 卸载：取消定时器并注销监听器，可重复调用
    pub fn unmount(&mut self) {
        if self.watchdog.is_attached() {
            self.watchdog.detach();
            tracing::info!("player unmounted");
        }
    }

    pub fn view(&self) -> PlayerView {
        let state = self.watchdog.state();
        PlayerView {
            surface: if state.usable {
                Surface::Video
            } else {
                Surface::NotFound(NOT_FOUND_TIP)
            },
            loading: state.buffering,
            light_off: self.controller.flow().lights_off,
            labels: self.controller.labels(),
        }
    }
}

impl Drop for JolPlayer {
    fn drop(&mut self) {
        self.unmount();
    }
}
