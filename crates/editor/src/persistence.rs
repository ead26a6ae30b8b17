//! World persistence: a background PNG plus a JSON descriptor per world.
//!
//! A save lives in its own directory, `<world>/background.png` and
//! `<world>/main.world`. The two files are only ever published together:
//! they are written and synced into `<world>.staging`, the old save is moved
//! aside to `<world>.previous`, and the staging directory is renamed into
//! place. A crash at any point leaves either the old pair or the new pair on
//! disk, never one file of each.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tileworld_engine::codec::{self, Descriptor};
use tileworld_engine::palette::PaletteConfig;
use tileworld_engine::world::WorldGrid;

use crate::raster;

/// Background image inside a world directory.
pub const IMAGE_FILE: &str = "background.png";
/// Descriptor inside a world directory.
pub const DESCRIPTOR_FILE: &str = "main.world";

const STAGING_SUFFIX: &str = ".staging";
const PREVIOUS_SUFFIX: &str = ".previous";

/// Both artifacts of a save, fully serialized and ready to write.
#[derive(Debug, Clone)]
pub struct WorldArtifacts {
    pub png: Vec<u8>,
    pub descriptor: String,
    pub palette_len: usize,
}

/// Summary of a completed save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub width: usize,
    pub height: usize,
    pub chunks: usize,
    pub palette_len: usize,
    pub bytes_written: usize,
}

// ── In-memory artifacts ──────────────────────────────────────────────────────

/// Encode a world into its two artifacts without touching the disk.
pub fn to_artifacts(grid: &WorldGrid, config: &PaletteConfig) -> Result<WorldArtifacts> {
    let (image, descriptor) = codec::save(grid, config).context("encoding world")?;
    let png = raster::encode_png(&image)?;
    let palette_len = descriptor.palette.len();
    let descriptor = serde_json::to_string_pretty(&descriptor).context("serializing descriptor")?;
    Ok(WorldArtifacts {
        png,
        descriptor,
        palette_len,
    })
}

/// Rebuild a world from the bytes of its two artifacts.
pub fn from_artifacts(png: &[u8], descriptor: &str) -> Result<WorldGrid> {
    let descriptor = parse_descriptor(descriptor)?;
    let image = raster::decode_png(png)?;
    codec::load(&descriptor, &image).context("decoding world")
}

fn parse_descriptor(text: &str) -> Result<Descriptor> {
    serde_json::from_str(text).context("parsing world descriptor")
}

// ── Save ─────────────────────────────────────────────────────────────────────

/// Encode `grid` and publish it as the save in `dir`, replacing any previous
/// save there. `dir` is owned by the save: it is swapped out as a whole.
pub fn save_world(grid: &WorldGrid, dir: &Path, config: &PaletteConfig) -> Result<SaveReport> {
    let start = Instant::now();

    // Encode first: a world that cannot be encoded never touches the disk.
    let artifacts = to_artifacts(grid, config)?;

    let staging = sibling(dir, STAGING_SUFFIX)?;
    let previous = sibling(dir, PREVIOUS_SUFFIX)?;

    if staging.is_dir() {
        tracing::warn!("Removing stale staging directory {}", staging.display());
        fs::remove_dir_all(&staging)
            .with_context(|| format!("removing stale {}", staging.display()))?;
    }
    if let Err(e) = write_staging(&staging, &artifacts) {
        if staging.is_dir() {
            discard(&staging);
        }
        return Err(e);
    }
    publish(dir, &staging, &previous)?;

    let report = SaveReport {
        width: grid.width(),
        height: grid.height(),
        chunks: grid.chunk_count(),
        palette_len: artifacts.palette_len,
        bytes_written: artifacts.png.len() + artifacts.descriptor.len(),
    };
    tracing::info!(
        "World saved: {}x{} tiles, {} chunks, {} colors, {} bytes ({:.2?})",
        report.width,
        report.height,
        report.chunks,
        report.palette_len,
        report.bytes_written,
        start.elapsed(),
    );
    Ok(report)
}

/// `<parent>/<name><suffix>` for a world directory `<parent>/<name>`.
fn sibling(dir: &Path, suffix: &str) -> Result<PathBuf> {
    let mut name = dir
        .file_name()
        .with_context(|| format!("world path {} has no directory name", dir.display()))?
        .to_os_string();
    name.push(suffix);
    Ok(dir.with_file_name(name))
}

fn write_staging(staging: &Path, artifacts: &WorldArtifacts) -> Result<()> {
    fs::create_dir_all(staging).with_context(|| format!("creating {}", staging.display()))?;
    write_synced(&staging.join(IMAGE_FILE), &artifacts.png)?;
    write_synced(&staging.join(DESCRIPTOR_FILE), artifacts.descriptor.as_bytes())?;
    Ok(())
}

/// Write `bytes` to `path` and flush them all the way to the device.
fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("flushing {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("syncing {}", path.display()))?;
    Ok(())
}

/// Swap the staged save into place. The directory rename is the commit point.
fn publish(dir: &Path, staging: &Path, previous: &Path) -> Result<()> {
    if previous.exists() {
        if dir.exists() {
            // Left over from a save that committed but did not clean up.
            fs::remove_dir_all(previous)
                .with_context(|| format!("removing stale {}", previous.display()))?;
        } else {
            // A save crashed after moving the old world aside: restore it so
            // it stays the fallback until the new one commits.
            tracing::warn!("Restoring interrupted save from {}", previous.display());
            fs::rename(previous, dir)
                .with_context(|| format!("restoring {}", previous.display()))?;
        }
    }

    let had_previous = dir.exists();
    if had_previous {
        fs::rename(dir, previous)
            .with_context(|| format!("moving {} aside", dir.display()))?;
    }

    if let Err(e) = fs::rename(staging, dir) {
        if had_previous {
            if let Err(restore) = fs::rename(previous, dir) {
                tracing::warn!(
                    "Could not move {} back to {}: {}",
                    previous.display(),
                    dir.display(),
                    restore
                );
            }
        }
        discard(staging);
        return Err(e).with_context(|| format!("publishing save to {}", dir.display()));
    }

    if had_previous {
        discard(previous);
    }
    Ok(())
}

/// Best-effort removal of a leftover directory. Failures are logged, not
/// returned. Returns whether the directory is gone.
fn discard(path: &Path) -> bool {
    match fs::remove_dir_all(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
            false
        }
    }
}

// ── Load ─────────────────────────────────────────────────────────────────────

/// Resolve which directory holds the current save, if any.
///
/// Falls back to `<world>.previous` when a save was interrupted after moving
/// the old world aside.
fn save_source(dir: &Path) -> Result<Option<PathBuf>> {
    if dir.is_dir() {
        return Ok(Some(dir.to_path_buf()));
    }
    let previous = sibling(dir, PREVIOUS_SUFFIX)?;
    if previous.is_dir() {
        tracing::warn!(
            "{} is missing, loading interrupted save from {}",
            dir.display(),
            previous.display()
        );
        return Ok(Some(previous));
    }
    Ok(None)
}

/// Load the save in `dir`. Returns `None` if there is no save.
pub fn load_world(dir: &Path) -> Result<Option<WorldGrid>> {
    let Some(source) = save_source(dir)? else {
        return Ok(None);
    };
    let start = Instant::now();

    let image_path = source.join(IMAGE_FILE);
    let descriptor_path = source.join(DESCRIPTOR_FILE);
    let png = fs::read(&image_path).with_context(|| format!("reading {}", image_path.display()))?;
    let descriptor = fs::read_to_string(&descriptor_path)
        .with_context(|| format!("reading {}", descriptor_path.display()))?;
    let grid = from_artifacts(&png, &descriptor)
        .with_context(|| format!("loading world from {}", source.display()))?;

    tracing::info!(
        "World loaded: {}x{} tiles, {} chunks, {} tile types ({:.2?})",
        grid.width(),
        grid.height(),
        grid.chunk_count(),
        grid.catalog().len(),
        start.elapsed(),
    );
    Ok(Some(grid))
}

/// Read only the descriptor of the save in `dir`.
pub fn read_descriptor(dir: &Path) -> Result<Option<Descriptor>> {
    let Some(source) = save_source(dir)? else {
        return Ok(None);
    };
    let path = source.join(DESCRIPTOR_FILE);
    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    parse_descriptor(&text).map(Some)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles;
    use tileworld_engine::world::catalog::TileCatalog;
    use tileworld_engine::world::chunk::{ChunkRes, WorldChunk};

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tileworld_test_{name}"));
        cleanup(&dir);
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
        for suffix in [STAGING_SUFFIX, PREVIOUS_SUFFIX] {
            if let Ok(path) = sibling(dir, suffix) {
                let _ = fs::remove_dir_all(&path);
                let _ = fs::remove_file(&path);
            }
        }
    }

    fn small_world() -> WorldGrid {
        let mut grid = WorldGrid::new(2, 2, ChunkRes::square(2), tiles::GRASS);
        grid.set_tile_named(3, 3, tiles::DIRT).unwrap();
        grid
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = test_dir("roundtrip");
        let grid = small_world();

        let report = save_world(&grid, &dir, &PaletteConfig::default()).unwrap();
        assert_eq!((report.width, report.height), (4, 4));
        assert_eq!(report.chunks, 4);
        assert_eq!(report.palette_len, 2);

        assert!(dir.join(IMAGE_FILE).exists());
        assert!(dir.join(DESCRIPTOR_FILE).exists());
        assert!(!sibling(&dir, STAGING_SUFFIX).unwrap().exists());
        assert!(!sibling(&dir, PREVIOUS_SUFFIX).unwrap().exists());

        let loaded = load_world(&dir).unwrap().expect("should load world");
        assert_eq!(loaded, grid);
        assert_eq!(loaded.tile_name_at(3, 3), Ok(tiles::DIRT));

        let descriptor = read_descriptor(&dir).unwrap().expect("descriptor");
        assert_eq!((descriptor.chunk_res_x, descriptor.chunks_x), (2, 2));

        cleanup(&dir);
    }

    #[test]
    fn test_missing_world_is_none() {
        let dir = test_dir("missing");
        assert!(load_world(&dir).unwrap().is_none());
        assert!(read_descriptor(&dir).unwrap().is_none());
    }

    #[test]
    fn test_resave_replaces_previous() {
        let dir = test_dir("resave");
        save_world(&small_world(), &dir, &PaletteConfig::default()).unwrap();

        let mut changed = small_world();
        changed.set_tile_named(0, 0, tiles::WATER).unwrap();
        save_world(&changed, &dir, &PaletteConfig::default()).unwrap();

        let loaded = load_world(&dir).unwrap().expect("should load");
        assert_eq!(loaded, changed);
        assert!(!sibling(&dir, PREVIOUS_SUFFIX).unwrap().exists());

        cleanup(&dir);
    }

    #[test]
    fn test_failed_encode_keeps_old_save() {
        let dir = test_dir("failed_encode");
        let grid = small_world();
        save_world(&grid, &dir, &PaletteConfig::default()).unwrap();

        let res = ChunkRes::square(2);
        let mut catalog = TileCatalog::new();
        let grass = catalog.intern(tiles::GRASS);
        let chunk = WorldChunk::new_filled(res, grass);
        let jagged = WorldGrid::from_columns(res, catalog, vec![vec![chunk], vec![]]);
        assert!(save_world(&jagged, &dir, &PaletteConfig::default()).is_err());

        assert_eq!(load_world(&dir).unwrap().expect("old save"), grid);
        assert!(!sibling(&dir, STAGING_SUFFIX).unwrap().exists());

        cleanup(&dir);
    }

    #[test]
    fn test_failed_write_keeps_old_save() {
        let dir = test_dir("failed_write");
        let grid = small_world();
        save_world(&grid, &dir, &PaletteConfig::default()).unwrap();

        // A plain file where the staging directory should go makes the write fail.
        let staging = sibling(&dir, STAGING_SUFFIX).unwrap();
        fs::write(&staging, b"in the way").unwrap();

        let mut changed = small_world();
        changed.set_tile_named(1, 1, tiles::STONE).unwrap();
        assert!(save_world(&changed, &dir, &PaletteConfig::default()).is_err());

        assert_eq!(load_world(&dir).unwrap().expect("old save"), grid);
        let descriptor = fs::read_to_string(dir.join(DESCRIPTOR_FILE)).unwrap();
        assert!(!descriptor.contains(tiles::STONE));

        cleanup(&dir);
    }

    #[test]
    fn test_recovers_interrupted_save() {
        let dir = test_dir("interrupted");
        let grid = small_world();
        save_world(&grid, &dir, &PaletteConfig::default()).unwrap();

        // Simulate a crash right after the old save was moved aside.
        let previous = sibling(&dir, PREVIOUS_SUFFIX).unwrap();
        fs::rename(&dir, &previous).unwrap();
        fs::create_dir_all(sibling(&dir, STAGING_SUFFIX).unwrap()).unwrap();

        assert_eq!(load_world(&dir).unwrap().expect("recovered"), grid);

        // The next save cleans everything up.
        let mut changed = small_world();
        changed.set_tile_named(2, 0, tiles::SAND).unwrap();
        save_world(&changed, &dir, &PaletteConfig::default()).unwrap();
        assert_eq!(load_world(&dir).unwrap().expect("new save"), changed);
        assert!(!previous.exists());
        assert!(!sibling(&dir, STAGING_SUFFIX).unwrap().exists());

        cleanup(&dir);
    }

    #[test]
    fn test_corrupt_descriptor_is_an_error() {
        let dir = test_dir("corrupt");
        save_world(&small_world(), &dir, &PaletteConfig::default()).unwrap();
        fs::write(dir.join(DESCRIPTOR_FILE), "Now we save the text file!").unwrap();
        assert!(load_world(&dir).is_err());
        cleanup(&dir);
    }

    #[test]
    fn test_failed_publish_rolls_back() {
        let dir = test_dir("failed_publish");
        let grid = small_world();
        save_world(&grid, &dir, &PaletteConfig::default()).unwrap();

        // Nothing staged: the commit rename fails after the old save moved aside.
        let staging = sibling(&dir, STAGING_SUFFIX).unwrap();
        let previous = sibling(&dir, PREVIOUS_SUFFIX).unwrap();
        assert!(publish(&dir, &staging, &previous).is_err());

        assert_eq!(load_world(&dir).unwrap().expect("rolled back"), grid);
        assert!(!previous.exists());

        cleanup(&dir);
    }

    #[test]
    fn test_discard_reports_leftovers() {
        let dir = test_dir("discard");
        fs::create_dir_all(dir.join("nested")).unwrap();
        assert!(discard(&dir));
        assert!(!dir.exists());
        assert!(!discard(&dir));
    }
}
