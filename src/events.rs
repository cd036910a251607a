use std::fmt;
use std::str::FromStr;

/// 视频元素派发的生命周期事件，变体名对应 DOM 事件名（见 [`PlayerEvent::as_str`]）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerEvent {
    Play,
    Pause,
    /// 数据不足，画面停住等待（缓冲开始）
    Waiting,
    /// 数据就绪，画面重新走动（缓冲结束）
    Playing,
    Ended,
    DurationChange,
    VolumeChange,
    /// 倍速被修改
    RateChange,
    Seeking,
    Seeked,
    /// 网络状态离开 Empty
    LoadStart,
    LoadedData,
    LoadedMetadata,
    /// 资源被重置回 Empty
    Emptied,
    Error,
}

impl PlayerEvent {
    pub const ALL: [PlayerEvent; 15] = [
        PlayerEvent::Play,
        PlayerEvent::Pause,
        PlayerEvent::Waiting,
        PlayerEvent::Playing,
        PlayerEvent::Ended,
        PlayerEvent::DurationChange,
        PlayerEvent::VolumeChange,
        PlayerEvent::RateChange,
        PlayerEvent::Seeking,
        PlayerEvent::Seeked,
        PlayerEvent::LoadStart,
        PlayerEvent::LoadedData,
        PlayerEvent::LoadedMetadata,
        PlayerEvent::Emptied,
        PlayerEvent::Error,
    ];

    /// DOM 事件名
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerEvent::Play => "play",
            PlayerEvent::Pause => "pause",
            PlayerEvent::Waiting => "waiting",
            PlayerEvent::Playing => "playing",
            PlayerEvent::Ended => "ended",
            PlayerEvent::DurationChange => "durationchange",
            PlayerEvent::VolumeChange => "volumechange",
            PlayerEvent::RateChange => "ratechange",
            PlayerEvent::Seeking => "seeking",
            PlayerEvent::Seeked => "seeked",
            PlayerEvent::LoadStart => "loadstart",
            PlayerEvent::LoadedData => "loadeddata",
            PlayerEvent::LoadedMetadata => "loadedmetadata",
            PlayerEvent::Emptied => "emptied",
            PlayerEvent::Error => "error",
        }
    }
}

impl fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown media event `{0}`")]
pub struct UnknownEvent(pub String);

impl FromStr for PlayerEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dom_event_names() {
        assert_eq!("waiting".parse::<PlayerEvent>(), Ok(PlayerEvent::Waiting));
        assert_eq!("playing".parse::<PlayerEvent>(), Ok(PlayerEvent::Playing));
        assert_eq!(
            "stalled".parse::<PlayerEvent>(),
            Err(UnknownEvent("stalled".to_string()))
        );
    }

    #[test]
    fn event_names_are_distinct() {
        let mut names: Vec<_> = PlayerEvent::ALL.iter().map(|e| e.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PlayerEvent::ALL.len());
    }
}
