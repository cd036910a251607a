use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jol_player::events::PlayerEvent;
use jol_player::media::{Listener, MediaHandle, PlaybackControl};
use jol_player::player::{JolPlayer, Surface};
use jol_player::scheduler::TokioScheduler;
use jol_player::{AvailabilityState, Language, PlayerConfig};

#[derive(Debug, Parser)]
#[command(name = "jol-player", about = "JoL 视频播放器容器演示")]
struct Cli {
    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,
    /// 视频地址
    #[arg(long)]
    src: Option<String>,
    /// 控制栏语言（zh / en）
    #[arg(long)]
    lang: Option<String>,
    /// 模拟视频始终无法开始加载
    #[arg(long)]
    missing: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match cli.config {
        Some(ref path) => PlayerConfig::from_file(path)?,
        None => PlayerConfig::default(),
    };
    if let Some(src) = cli.src {
        config.video_src = src;
    }
    if let Some(lang) = cli.lang {
        config.language = Language::from(lang);
    }
    let grace_period = config.grace_period();

    // 初始化播放器
    let mut player = JolPlayer::new(config);
    let video = player.video();

    let (tx, rx) = crossbeam_channel::unbounded::<AvailabilityState>();
    player.set_callback(move |state| {
        let _ = tx.send(state);
    });

    // 设置事件监听器
    let logger: Listener = Arc::new(|event: PlayerEvent| match event {
        PlayerEvent::LoadStart => tracing::info!("[@LoadStart] 开始加载视频..."),
        PlayerEvent::Waiting => tracing::info!("[@Waiting] 缓冲中..."),
        PlayerEvent::Playing => tracing::info!("[@Playing] 正在播放"),
        PlayerEvent::Play => tracing::info!("[@Play] 播放开始"),
        PlayerEvent::RateChange => tracing::info!("[@RateChange] 倍速变化"),
        other => tracing::debug!("[@{other}]"),
    });
    let listener_ids: Vec<_> = PlayerEvent::ALL
        .into_iter()
        .map(|event| video.add_event_listener(event, logger.clone()))
        .collect();

    let scheduler = TokioScheduler::current()?;
    player.mount(&scheduler)?;

    if !cli.missing {
        tokio::time::sleep(Duration::from_millis(500)).await;
        video.load();
        video.play();
        video.dispatch(PlayerEvent::Waiting);
        tokio::time::sleep(Duration::from_millis(800)).await;
        video.dispatch(PlayerEvent::Playing);

        let controller = player.controller_mut();
        controller.set_playback_rate(video.as_ref(), 1.5)?;
        controller.toggle_lights();
        let shot = controller.screenshot(video.as_ref());
        tracing::info!("截图: {}", shot.tip);
    }

    tokio::time::sleep(grace_period + Duration::from_millis(200)).await;

    for state in rx.try_iter() {
        tracing::info!(
            usable = state.usable,
            buffering = state.buffering,
            "可用性状态变化"
        );
    }

    let view = player.view();
    match view.surface {
        Surface::Video => tracing::info!("视频可用"),
        Surface::NotFound(tip) => tracing::warn!("{tip}"),
    }
    tracing::info!(
        loading = view.loading,
        light_off = view.light_off,
        "控制栏: {} / {} / {}",
        view.labels.multiple,
        view.labels.picture_in_picture,
        view.labels.replay
    );

    player.unmount();
    for id in listener_ids {
        video.remove_event_listener(id);
    }

    tracing::info!("演示完成！");
    Ok(())
}
