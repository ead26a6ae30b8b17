use anyhow::{Context, Result, bail};
use serde::Serialize;
use tileworld_editor::config::{Command, EditorConfig};
use tileworld_editor::persistence;
use tileworld_editor::worldgen;
use tileworld_engine::codec::PaletteEntry;

fn main() {
    let config = EditorConfig::from_args(std::env::args());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let result = match config.command {
        Command::Resave => run_resave(&config),
        Command::Demo => run_demo(&config),
        Command::Info => run_info(&config),
    };
    if let Err(e) = result {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Open the world (generating one if there is no save yet) and save it back.
fn run_resave(config: &EditorConfig) -> Result<()> {
    let grid = match persistence::load_world(&config.world_dir)? {
        Some(grid) => grid,
        None => {
            tracing::info!(
                "No save in {}, generating a {}x{} chunk meadow",
                config.world_dir.display(),
                config.chunks,
                config.chunks
            );
            worldgen::generate_meadow(config.chunks, config.chunks, config.chunk_res, config.world_seed)
        }
    };
    persistence::save_world(&grid, &config.world_dir, &config.palette)?;
    Ok(())
}

/// Generate, save, reload and compare tile-for-tile.
fn run_demo(config: &EditorConfig) -> Result<()> {
    tracing::info!("tileworld -- palette image round-trip demo");
    let grid = worldgen::generate_meadow(config.chunks, config.chunks, config.chunk_res, config.world_seed);
    tracing::info!(
        "World ready: {}x{} tiles in {} chunks, {} tile types",
        grid.width(),
        grid.height(),
        grid.chunk_count(),
        grid.catalog().len()
    );

    let report = persistence::save_world(&grid, &config.world_dir, &config.palette)?;
    let loaded = persistence::load_world(&config.world_dir)?
        .context("save disappeared before it could be reloaded")?;

    if loaded != grid {
        bail!("reloaded world differs from the one that was saved");
    }
    tracing::info!(
        "Round trip OK: {} colors, {} bytes on disk",
        report.palette_len,
        report.bytes_written
    );
    Ok(())
}

#[derive(Serialize)]
struct WorldInfo<'a> {
    world: String,
    width: usize,
    height: usize,
    chunks_x: usize,
    chunks_y: usize,
    chunk_res_x: usize,
    chunk_res_y: usize,
    palette: &'a [PaletteEntry],
}

/// Print the descriptor of a save as JSON.
fn run_info(config: &EditorConfig) -> Result<()> {
    let Some(descriptor) = persistence::read_descriptor(&config.world_dir)? else {
        bail!("no save found in {}", config.world_dir.display());
    };
    let (Some(width), Some(height)) = (descriptor.width(), descriptor.height()) else {
        bail!("descriptor in {} has an impossible extent", config.world_dir.display());
    };
    let info = WorldInfo {
        world: config.world_dir.display().to_string(),
        width,
        height,
        chunks_x: descriptor.chunks_x,
        chunks_y: descriptor.chunks_y,
        chunk_res_x: descriptor.chunk_res_x,
        chunk_res_y: descriptor.chunk_res_y,
        palette: &descriptor.palette,
    };
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
