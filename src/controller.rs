//! 控制栏状态：倍速、循环、关灯、画中画、网页全屏、全屏、截图与重播。

use std::time::Duration;

use bytes::Bytes;

use crate::error::MediaError;
use crate::locale::{table, LabelKey, Language};
use crate::media::PlaybackControl;

/// 可选的播放倍速
pub const PLAYBACK_RATES: [f32; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// 控制栏共享的播放状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoFlow {
    pub playback_rate: f32,
    pub looped: bool,
    pub lights_off: bool,
    pub picture_in_picture: bool,
    pub web_fullscreen: bool,
    pub fullscreen: bool,
}

impl Default for VideoFlow {
    fn default() -> Self {
        Self {
            playback_rate: 1.0,
            looped: false,
            lights_off: false,
            picture_in_picture: false,
            web_fullscreen: false,
            fullscreen: false,
        }
    }
}

/// 控制栏各按钮当前显示的文案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLabels {
    pub multiple: &'static str,
    pub lights: &'static str,
    pub looped: &'static str,
    pub screenshots: &'static str,
    pub picture_in_picture: &'static str,
    pub web_fullscreen: &'static str,
    pub fullscreen: &'static str,
    pub replay: &'static str,
}

/// 截图结果
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotOutcome {
    pub frame: Result<Bytes, MediaError>,
    /// 截图下方的提示文案
    pub tip: &'static str,
}

#[derive(Debug, Default)]
pub struct Controller {
    language: Language,
    flow: VideoFlow,
}

impl Controller {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            flow: VideoFlow::default(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn flow(&self) -> VideoFlow {
        self.flow
    }

    pub fn label(&self, key: LabelKey) -> &'static str {
        table(self.language).get(key)
    }

    pub fn set_playback_rate(
        &mut self,
        media: &dyn PlaybackControl,
        rate: f32,
    ) -> Result<(), MediaError> {
        if !PLAYBACK_RATES.contains(&rate) {
            return Err(MediaError::InvalidPlaybackRate(rate));
        }
        media.set_playback_rate(rate)?;
        self.flow.playback_rate = rate;
        tracing::debug!(rate, "playback rate changed");
        Ok(())
    }

    pub fn toggle_loop(&mut self, media: &dyn PlaybackControl) -> bool {
        self.flow.looped = !self.flow.looped;
        media.set_looped(self.flow.looped);
        self.flow.looped
    }

    /// 切换关灯遮罩
    pub fn toggle_lights(&mut self) -> bool {
        self.flow.lights_off = !self.flow.lights_off;
        self.flow.lights_off
    }

    pub fn toggle_picture_in_picture(&mut self) -> bool {
        self.flow.picture_in_picture = !self.flow.picture_in_picture;
        self.flow.picture_in_picture
    }

    /// 网页全屏与全屏互斥
    pub fn toggle_web_fullscreen(&mut self) -> bool {
        self.flow.web_fullscreen = !self.flow.web_fullscreen;
        if self.flow.web_fullscreen {
            self.flow.fullscreen = false;
        }
        self.flow.web_fullscreen
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.flow.fullscreen = !self.flow.fullscreen;
        if self.flow.fullscreen {
            self.flow.web_fullscreen = false;
        }
        self.flow.fullscreen
    }

    pub fn screenshot(&self, media: &dyn PlaybackControl) -> ScreenshotOutcome {
        let frame = media.capture_frame();
        let tip = match &frame {
            Ok(_) => self.label(LabelKey::ScreenshotsSuccessText),
            Err(e) => {
                tracing::warn!("screenshot failed: {e}");
                self.label(LabelKey::ScreenshotsFailText)
            }
        };
        ScreenshotOutcome { frame, tip }
    }

    /// 从头开始播放
    pub fn replay(&self, media: &dyn PlaybackControl) -> Result<(), MediaError> {
        media.seek(Duration::ZERO)?;
        media.play();
        Ok(())
    }

    pub fn labels(&self) -> ControlLabels {
        let t = table(self.language);
        ControlLabels {
            multiple: t.multiple,
            lights: t.close_lights,
            looped: t.looped,
            screenshots: t.screenshots,
            picture_in_picture: if self.flow.picture_in_picture {
                t.close_picture
            } else {
                t.open_picture
            },
            web_fullscreen: if self.flow.web_fullscreen {
                t.close_web_fullscreen
            } else {
                t.web_fullscreen
            },
            fullscreen: if self.flow.fullscreen {
                t.close_full_screen
            } else {
                t.full_screen
            },
            replay: t.replay,
        }
    }
}
