use anyhow::{Context, Result};
use census_timelapse::animation::YearCycleAnimator;
use census_timelapse::color::ColorScale;
use census_timelapse::config::AppConfig;
use census_timelapse::{render, scene};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one PNG frame per year of the population timelapse
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Drive the year cycle in real time, logging each transition
    Play {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        /// Full cycles to run before exiting (0 runs forever)
        #[arg(long, default_value_t = 1)]
        cycles: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { config } => {
            info!(config = %config.display(), "Rendering timelapse");
            let app_config = AppConfig::load_from_file(config)?;

            // 1. Load assets
            let dataset = Arc::new(scene::load_scene(&app_config).await?);
            let map_path = app_config.input.map_image.clone();
            let map = tokio::task::spawn_blocking(move || {
                image::open(&map_path)
                    .map(|img| img.to_rgba8())
                    .with_context(|| format!("Failed to decode map image: {:?}", map_path))
            })
            .await??;

            // 2. Render frames
            let frame_config = app_config.clone();
            let paths = tokio::task::spawn_blocking(move || {
                render::render_frames(&frame_config, dataset, &map)
            })
            .await??;

            info!(frames = paths.len(), dir = %app_config.output.frame_dir.display(), "Render complete");
        }
        Commands::Play { config, cycles } => {
            info!(config = %config.display(), "Playing timelapse");
            let app_config = AppConfig::load_from_file(config)?;
            let dataset = Arc::new(scene::load_scene(&app_config).await?);
            play(&app_config, dataset, *cycles).await?;
        }
    }

    Ok(())
}

/// Headless frame driver: ticks the animator at the configured frame rate.
async fn play(config: &AppConfig, dataset: Arc<scene::SceneDataset>, cycles: u32) -> Result<()> {
    let years = dataset.series.years().len();
    let mut animator = YearCycleAnimator::new(
        dataset,
        ColorScale::from(&config.color),
        config.animation.year_duration(),
    )?;

    let mut interval = time::interval(config.animation.frame_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let start = Instant::now();
    let mut shown = 0usize;

    loop {
        interval.tick().await;
        if let Some(transition) = animator.tick(start.elapsed()) {
            info!(
                year = transition.year,
                recolored = transition.recolored,
                overlay = animator.overlay_text(),
                "Year changed"
            );
            shown += 1;
            if cycles > 0 && shown >= years * cycles as usize {
                break;
            }
        }
    }

    Ok(())
}
