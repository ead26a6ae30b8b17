//! Command-line configuration for the `tileworld` binary.

use std::path::PathBuf;

use tileworld_engine::palette::{DEFAULT_FALLBACK_THRESHOLD, PaletteConfig};
use tileworld_engine::world::chunk::{ChunkRes, DEFAULT_CHUNK_RES};

/// Chunks per side of a freshly generated world.
pub const DEFAULT_CHUNKS: usize = 4;
/// Seed for freshly generated worlds.
pub const DEFAULT_WORLD_SEED: u64 = 1;

/// What the binary should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Load the save (or generate a world if there is none) and save it again.
    Resave,
    /// Generate a world, save it, load it back and compare.
    Demo,
    /// Print the descriptor of an existing save.
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub command: Command,
    pub world_dir: PathBuf,
    pub chunks: usize,
    pub chunk_res: ChunkRes,
    pub world_seed: u64,
    pub palette: PaletteConfig,
}

impl EditorConfig {
    /// Parse flags. Unknown flags are ignored and unparsable values fall back
    /// to their defaults.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let has = |flag: &str| args.iter().any(|a| a == flag);
        let value = |flag: &str| {
            args.iter()
                .skip_while(|a| *a != flag)
                .nth(1)
                .cloned()
        };

        let command = if has("--demo") {
            Command::Demo
        } else if has("--info") {
            Command::Info
        } else {
            Command::Resave
        };

        let world_dir: PathBuf = value("--world").unwrap_or_else(|| "world".into()).into();
        let chunks = value("--chunks")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CHUNKS);
        let chunk_res = value("--chunk-res")
            .and_then(|s| s.parse().ok())
            .map(ChunkRes::square)
            .unwrap_or_default();
        let world_seed = value("--world-seed")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_WORLD_SEED);

        let palette = PaletteConfig {
            fallback_threshold: value("--fallback-threshold")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FALLBACK_THRESHOLD),
            seed: value("--seed").and_then(|s| s.parse().ok()),
            sequential: has("--sequential"),
            ..PaletteConfig::new()
        };

        Self {
            command,
            world_dir,
            chunks,
            chunk_res,
            world_seed,
            palette,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: Command::Resave,
            world_dir: "world".into(),
            chunks: DEFAULT_CHUNKS,
            chunk_res: ChunkRes::square(DEFAULT_CHUNK_RES),
            world_seed: DEFAULT_WORLD_SEED,
            palette: PaletteConfig::default(),
        }
    }
}
