#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the scrolling platformer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use platformer_cli::{
    config,
    simulation::{self, GameLoop},
};
use platformer_rendering::RenderingBackend;
use platformer_rendering_macroquad::MacroquadBackend;
use platformer_system_bootstrap::Bootstrap;
use platformer_world::World;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "platformer", about = "Side-scrolling tile platformer")]
struct CliArgs {
    /// TOML file overriding the default game configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    vsync: Option<bool>,
    /// Simulate the given number of idle ticks without opening a window.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the platformer command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = config::resolve(args.config.as_deref())?;
    let bootstrap = Bootstrap::default();
    let grid = bootstrap
        .demo_level(config.tile_length)
        .context("failed to build the demo level")?;
    let respawn_point = bootstrap.respawn_point(config.respawn_point, &grid);
    let world = World::new(grid, respawn_point, &config);
    tracing::info!("{}", bootstrap.welcome_banner(&world));

    if let Some(ticks) = args.headless {
        let summary = simulation::run_headless(world, ticks);
        tracing::info!(
            ticks = summary.ticks,
            respawns = summary.respawns,
            position = ?summary.position,
            grounded = summary.grounded,
            "headless run finished"
        );
        return Ok(());
    }

    let presentation = simulation::presentation(&world);
    let mut game_loop = GameLoop::new(world);
    let backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    let backend = match args.vsync {
        Some(enabled) => backend.with_vsync(enabled),
        None => backend,
    };

    backend.run(presentation, move |frame, input, scene| {
        let _ = game_loop.frame(frame, input);
        game_loop.refresh_scene(scene);
    })
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
