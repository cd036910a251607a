use std::path::PathBuf;

/// 播放器容器层的错误
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("watchdog is already attached to a media handle")]
    AlreadyAttached,

    #[error("no tokio runtime is available to drive timers")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 媒体元素操作失败
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MediaError {
    #[error("no decoded frame is available")]
    NoFrame,

    #[error("media source is not loaded")]
    NotLoaded,

    #[error("invalid playback rate {0}")]
    InvalidPlaybackRate(f32),
}
