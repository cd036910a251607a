use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::PlayerError;
use crate::locale::Language;
use crate::watchdog::DEFAULT_GRACE_PERIOD;

pub const DEFAULT_VIDEO_SRC: &str =
    "https://gs-files.oss-cn-hongkong.aliyuncs.com/okr/test/file/2021/07/01/haiwang.mp4";

/// 播放器配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// 视频地址
    pub video_src: String,
    /// 控制栏语言
    pub language: Language,
    /// 等待视频开始加载的时长（毫秒）
    pub grace_period_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            video_src: DEFAULT_VIDEO_SRC.to_string(),
            language: Language::default(),
            grace_period_ms: DEFAULT_GRACE_PERIOD.as_millis() as u64,
        }
    }
}

impl PlayerConfig {
    pub fn from_file(path: &Path) -> Result<Self, PlayerError> {
        let content = fs::read_to_string(path).map_err(|source| PlayerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| PlayerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}
