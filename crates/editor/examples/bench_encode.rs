//! Benchmark: single-threaded vs parallel raster phase of the world encoder.
//!
//! Encodes one large generated meadow both ways and checks the outputs match.
//! Run with: `cargo run --release -p tileworld-editor --example bench_encode`

use std::time::Instant;

use tileworld_editor::{persistence, raster, worldgen};
use tileworld_engine::codec::{WorldDecoder, WorldEncoder};
use tileworld_engine::palette::PaletteConfig;
use tileworld_engine::world::chunk::ChunkRes;

fn main() {
    let chunks = 40;
    let res = ChunkRes::square(50);

    println!("=== tileworld: Encoder Benchmark ===\n");
    let t0 = Instant::now();
    let grid = worldgen::generate_meadow(chunks, chunks, res, 7);
    println!(
        "  {}x{} chunks of {}x{} -> {}x{} tiles (generated in {:.2?})\n",
        chunks,
        chunks,
        res.x,
        res.y,
        grid.width(),
        grid.height(),
        t0.elapsed()
    );

    // Seeded so both runs draw the same codes.
    let config = PaletteConfig::seeded(7);

    // --- Single-threaded ---
    let t0 = Instant::now();
    let single = WorldEncoder::new(config.clone())
        .single_threaded()
        .encode(&grid)
        .expect("encode");
    let dt_single = t0.elapsed();
    println!("  Single-threaded encode: {:>8.2?}", dt_single);

    // --- Parallel ---
    let t0 = Instant::now();
    let parallel = WorldEncoder::new(config).encode(&grid).expect("encode");
    let dt_parallel = t0.elapsed();
    println!("  Parallel encode:        {:>8.2?}", dt_parallel);

    let speedup = dt_single.as_secs_f64() / dt_parallel.as_secs_f64();
    println!("\n  Speedup: {:.2}x", speedup);

    if single == parallel {
        println!("  Verification: PASS (outputs identical)");
    } else {
        println!("  Verification: FAIL (outputs differ!)");
    }

    // --- Artifacts ---
    let (image, descriptor) = parallel;
    let t0 = Instant::now();
    let png = raster::encode_png(&image).expect("png");
    println!("\n  PNG encode:  {:>8.2?} ({} bytes)", t0.elapsed(), png.len());

    let t0 = Instant::now();
    let decoded = WorldDecoder::new().decode(&descriptor, &image).expect("decode");
    println!("  Decode:      {:>8.2?}", t0.elapsed());

    let t0 = Instant::now();
    let artifacts = persistence::to_artifacts(&grid, &PaletteConfig::seeded(7)).expect("artifacts");
    println!("  Artifacts:   {:>8.2?}", t0.elapsed());
    println!(
        "  Round trip:  {}",
        if decoded == grid && artifacts.png == png { "PASS" } else { "FAIL" }
    );
}
