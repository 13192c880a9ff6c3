//! Headless Player
//!
//! Mounts one player engine against a simulated media element, loads the
//! configured subtitle tracks and prints render snapshots as JSON lines
//! while playback advances. Key codes and simple commands typed on stdin
//! are routed the way a page would route them.

mod commands;
mod config;
mod config_file;
mod error;
mod media;

use player_core::{
    KeyPress, LoadOutcome, NoFullscreen, Player, PlayerSnapshot, ProgressTrack, ShortcutHub,
    SourceFetcher,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::Command;
use crate::config::HeadlessConfig;
use crate::error::Result;
use crate::media::SimulatedMedia;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "player-headless";

type HeadlessPlayer = Player<SimulatedMedia, NoFullscreen, SourceFetcher>;

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();
    if first.as_deref() == Some("--generate-config") {
        let path = args.next().unwrap_or_else(|| "config.toml".to_string());
        crate::config_file::generate_default_config(&path)?;
        println!("Wrote default configuration to {}", path);
        return Ok(());
    }

    // Load configuration
    let config_path = first.unwrap_or_else(|| "config.toml".to_string());
    let (config, config_error) = if std::path::Path::new(&config_path).exists() {
        match crate::config_file::ConfigFile::from_file(&config_path) {
            Ok(cf) => (cf.into_headless_config(), None),
            Err(e) => (HeadlessConfig::default(), Some(e)),
        }
    } else {
        (HeadlessConfig::default(), None)
    };

    init_logging(&config);
    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Some(e) = config_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }
    tracing::info!("Configuration loaded: {:?}", config);
    config.player.validate()?;

    let mut fetcher = SourceFetcher::new(config.player.fetch_timeout())?;
    if let Some(dir) = &config.subtitles.base_dir {
        fetcher = fetcher.with_base_dir(dir);
    }

    let media = Arc::new(SimulatedMedia::new(config.media.duration_secs));
    let hub = ShortcutHub::new();
    let player = Player::mount(media.clone(), NoFullscreen, fetcher, config.player.clone())
        .with_shortcuts(&hub);

    if let LoadOutcome::Applied(registry) = player
        .set_subtitle_sources(config.subtitles.track_sources())
        .await
    {
        for summary in registry.summaries() {
            tracing::info!(
                language = %summary.language,
                state = ?summary.load_state,
                cues = summary.cue_count,
                "Subtitle track"
            );
        }
    }

    let clock = media.spawn_clock(config.media.tick());
    if config.media.autoplay {
        player.toggle_play();
    }

    run(&player, &media, &hub).await?;

    clock.abort();
    player.unmount();
    tracing::info!("{} stopped", APP_NAME);
    Ok(())
}

/// Print snapshots until the media ends, stdin says quit, or Ctrl-C
async fn run(player: &HeadlessPlayer, media: &SimulatedMedia, hub: &ShortcutHub) -> Result<()> {
    let mut changes = player.changes();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let mut last = player.snapshot();
    print_snapshot(&last)?;

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match Command::parse(&line) {
                        Some(Command::Quit) => break,
                        Some(Command::Snapshot) => print_snapshot(&player.snapshot())?,
                        Some(command) => apply(player, hub, command),
                        None => tracing::warn!("Unknown command: {}", line.trim()),
                    },
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }

        let snapshot = player.snapshot();
        if worth_printing(&last, &snapshot) {
            if snapshot.active_cue_text != last.active_cue_text {
                tracing::debug!(
                    at = %player_core::format_timestamp(snapshot.current_time),
                    cue = ?snapshot.active_cue_text,
                    "Active cue changed"
                );
            }
            print_snapshot(&snapshot)?;
        }
        last = snapshot;

        if media.is_ended() && !last.is_playing {
            tracing::info!("Playback ended");
            break;
        }
    }
    Ok(())
}

fn apply(player: &HeadlessPlayer, hub: &ShortcutHub, command: Command) {
    match command {
        Command::Key(key) => {
            let handling = hub.dispatch(&KeyPress::global(key));
            tracing::debug!(?handling, "Key dispatched");
        }
        Command::Track(selection) => player.select_track(selection),
        Command::Seek(percentage) => {
            player.seek_to_pointer(percentage, ProgressTrack::new(0.0, 100.0))
        }
        Command::Menu => player.toggle_subtitle_menu(),
        Command::Snapshot | Command::Quit => {}
    }
}

/// Time ticks alone are not interesting; print on anything the viewer
/// would notice beyond the progress bar moving.
fn worth_printing(last: &PlayerSnapshot, next: &PlayerSnapshot) -> bool {
    last.active_cue_text != next.active_cue_text
        || last.is_playing != next.is_playing
        || last.ui != next.ui
        || last.tracks != next.tracks
        || last.duration != next.duration
}

fn print_snapshot(snapshot: &PlayerSnapshot) -> Result<()> {
    println!("{}", serde_json::to_string(snapshot)?);
    Ok(())
}

/// Initialize logging with tracing
fn init_logging(config: &HeadlessConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);

    // Snapshots own stdout
    if config.json_logs() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
