//! Synchronization core demonstration
//!
//! Drives a simulated video element through a short session and prints every
//! snapshot a consumer receives. Volume and mute are stored in a JSON
//! settings file, so a second run starts from where the first one ended.
//!
//! Run with:
//! ```bash
//! cargo run -p core-playback --example sync_demo
//!
//! # JSON logs, more detail from the core
//! cargo run -p core-playback --example sync_demo -- json "core_playback=trace"
//! ```

use bridge_desktop::JsonSettingsStore;
use bridge_traits::{LogLevel, MediaElement, MediaEvent, MediaEventHandler};
use core_playback::{PreferenceKey, VideoSync, VideoSyncConfig};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use parking_lot::Mutex;
use std::env;
use std::sync::Arc;
use tracing::info;

/// Stands in for a browser `<video>`: reports every command back as an event.
struct SimulatedVideo {
    duration: f64,
    handler: Mutex<Option<MediaEventHandler>>,
}

impl SimulatedVideo {
    fn new(duration: f64) -> Self {
        Self {
            duration,
            handler: Mutex::new(None),
        }
    }

    fn emit(&self, event: MediaEvent) {
        let handler = self.handler.lock().clone();
        if let Some(handler) = handler {
            handler(event);
        }
    }

    /// Advance playback by `seconds` in one-second ticks.
    fn tick(&self, from: f64, seconds: u32) {
        for step in 1..=seconds {
            self.emit(MediaEvent::TimeUpdated(from + f64::from(step)));
        }
    }
}

impl MediaElement for SimulatedVideo {
    fn play(&self) {
        self.emit(MediaEvent::Started);
    }

    fn pause(&self) {
        self.emit(MediaEvent::Stopped);
    }

    fn set_current_time(&self, seconds: f64) {
        self.emit(MediaEvent::TimeUpdated(seconds.min(self.duration)));
    }

    fn set_volume(&self, volume: f64) {
        self.emit(MediaEvent::VolumeChanged(volume));
    }

    fn set_muted(&self, _muted: bool) {}

    fn duration(&self) -> Option<f64> {
        None
    }

    fn set_event_handler(&self, handler: Option<MediaEventHandler>) {
        *self.handler.lock() = handler;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut logging = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Debug);
    if let Some(filter) = args.get(2) {
        logging = logging.with_filter(filter.clone());
    }
    init_logging(logging)?;

    let path = env::temp_dir().join("video-sync-demo").join("settings.json");
    let store = Arc::new(JsonSettingsStore::open(&path)?);
    info!(path = %path.display(), "Using settings file");

    let config = VideoSyncConfig::builder()
        .persist_all([PreferenceKey::Mute, PreferenceKey::Volume])
        .settings_store(store)
        .build()?;
    let sync = VideoSync::new(config)?;

    let mut rx = sync.subscribe();
    let consumer = tokio::spawn(async move {
        let mut received = 0usize;
        while rx.changed().await.is_ok() {
            let line = match rx.get_and_update() {
                Some(value) => format!(
                    "v{:<3} {:>5.1}s / {:>5.1}s  paused={:<5} muted={:<5} volume={:.2}",
                    value.snapshot.version,
                    value.snapshot.now,
                    value.snapshot.duration,
                    value.snapshot.paused,
                    value.snapshot.muted,
                    value.snapshot.volume,
                ),
                None => "not ready".to_string(),
            };
            println!("{}", line);
            received += 1;
        }
        received
    });

    let video = Arc::new(SimulatedVideo::new(300.0));
    sync.attach(video.clone());
    video.emit(MediaEvent::DurationChanged(video.duration));

    let Some(controls) = sync.current().map(|value| value.controls) else {
        anyhow::bail!("snapshot should be available once the duration is known");
    };

    controls.play();
    tokio::task::yield_now().await;
    video.tick(0.0, 3);
    tokio::task::yield_now().await;

    if let Some(seeker) = controls.seeker() {
        seeker.seek(120.0);
    }
    tokio::task::yield_now().await;

    let volume = sync.state().volume;
    controls.set_volume((volume - 0.1).max(0.0));
    controls.mute(!sync.state().muted);
    tokio::task::yield_now().await;

    controls.pause();
    tokio::task::yield_now().await;

    drop(sync);
    let received = consumer.await?;
    info!(received, "Consumer finished");

    Ok(())
}
