//! 控制栏文案（中文 / 英文）。
//!
//! 两种语言的文案表都是 [`LangTable`]，每个文案键对应一个字段，
//! 因此两张表的键集合在编译期就保持一致。

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// 控制栏语言，只区分中文与英文
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum Language {
    Zh,
    #[default]
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }
}

/// 除 `"zh"` 外的任何标签都按英文处理
impl From<&str> for Language {
    fn from(tag: &str) -> Self {
        if tag == "zh" {
            Language::Zh
        } else {
            Language::En
        }
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Language::from(tag.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 文案键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    Multiple,
    CloseLights,
    Loop,
    Screenshots,
    OpenPicture,
    ClosePicture,
    WebFullscreen,
    CloseWebFullscreen,
    FullScreen,
    CloseFullScreen,
    Replay,
    ScreenshotsSuccessText,
    ScreenshotsFailText,
}

impl LabelKey {
    pub const ALL: [LabelKey; 13] = [
        LabelKey::Multiple,
        LabelKey::CloseLights,
        LabelKey::Loop,
        LabelKey::Screenshots,
        LabelKey::OpenPicture,
        LabelKey::ClosePicture,
        LabelKey::WebFullscreen,
        LabelKey::CloseWebFullscreen,
        LabelKey::FullScreen,
        LabelKey::CloseFullScreen,
        LabelKey::Replay,
        LabelKey::ScreenshotsSuccessText,
        LabelKey::ScreenshotsFailText,
    ];

    /// 与前端文案表一致的键名
    pub fn as_str(self) -> &'static str {
        match self {
            LabelKey::Multiple => "multiple",
            LabelKey::CloseLights => "closeLights",
            LabelKey::Loop => "loop",
            LabelKey::Screenshots => "screenshots",
            LabelKey::OpenPicture => "openPicture",
            LabelKey::ClosePicture => "closePicture",
            LabelKey::WebFullscreen => "Fullscreen",
            LabelKey::CloseWebFullscreen => "closeFullscreen",
            LabelKey::FullScreen => "fullScreen",
            LabelKey::CloseFullScreen => "closefullScreen",
            LabelKey::Replay => "replay",
            LabelKey::ScreenshotsSuccessText => "screenshotsSucessText",
            LabelKey::ScreenshotsFailText => "screenshotsFailText",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label key `{0}`")]
pub struct UnknownLabelKey(pub String);

impl FromStr for LabelKey {
    type Err = UnknownLabelKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownLabelKey(s.to_string()))
    }
}

/// 一种语言的全部文案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LangTable {
    pub multiple: &'static str,
    pub close_lights: &'static str,
    pub looped: &'static str,
    pub screenshots: &'static str,
    pub open_picture: &'static str,
    pub close_picture: &'static str,
    pub web_fullscreen: &'static str,
    pub close_web_fullscreen: &'static str,
    pub full_screen: &'static str,
    pub close_full_screen: &'static str,
    pub replay: &'static str,
    pub screenshots_success_text: &'static str,
    pub screenshots_fail_text: &'static str,
}

impl LangTable {
    pub fn get(&self, key: LabelKey) -> &'static str {
        match key {
            LabelKey::Multiple => self.multiple,
            LabelKey::CloseLights => self.close_lights,
            LabelKey::Loop => self.looped,
            LabelKey::Screenshots => self.screenshots,
            LabelKey::OpenPicture => self.open_picture,
            LabelKey::ClosePicture => self.close_picture,
            LabelKey::WebFullscreen => self.web_fullscreen,
            LabelKey::CloseWebFullscreen => self.close_web_fullscreen,
            LabelKey::FullScreen => self.full_screen,
            LabelKey::CloseFullScreen => self.close_full_screen,
            LabelKey::Replay => self.replay,
            LabelKey::ScreenshotsSuccessText => self.screenshots_success_text,
            LabelKey::ScreenshotsFailText => self.screenshots_fail_text,
        }
    }
}

pub static ZH: LangTable = LangTable {
    multiple: "倍数",
    close_lights: "关灯",
    looped: "循环",
    screenshots: "截图",
    open_picture: "开启画中画",
    close_picture: "关闭画中画",
    web_fullscreen: "网页全屏",
    close_web_fullscreen: "关闭网页全屏",
    full_screen: "全屏",
    close_full_screen: "关闭全屏",
    replay: "重播",
    screenshots_success_text: "鼠标右键图片另存为",
    screenshots_fail_text: "截图加载失败，在点击下",
};

pub static EN: LangTable = LangTable {
    multiple: "speed",
    close_lights: "lights",
    looped: "loops",
    screenshots: "screenshots",
    open_picture: "open Picture",
    close_picture: "close Picture",
    web_fullscreen: "Full screen",
    close_web_fullscreen: "close Full screen",
    full_screen: "full Screen",
    close_full_screen: "close full Screen",
    replay: "Replay",
    screenshots_success_text: "Right mouse button to save the picture as",
    screenshots_fail_text: "The screenshot failed to load, click",
};

pub fn table(lang: Language) -> &'static LangTable {
    match lang {
        Language::Zh => &ZH,
        Language::En => &EN,
    }
}

/// 查找当前语言下的文案
pub fn il8n(lang: impl Into<Language>, key: LabelKey) -> &'static str {
    table(lang.into()).get(key)
}
