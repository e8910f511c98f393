//! Tile containers: read a `{z}/{x}/{y}.{ext}` directory tree and build, then serve from,
//! an MBTiles (SQLite) file.
//!
//! - [`TileWalker`] enumerates the tiles of a directory tree.
//! - [`MBTilesWriter`] creates a fresh MBTiles file and ingests tiles in batches.
//! - [`MBTilesReader`] answers point lookups and metadata scans with pooled read-only handles.
//! - [`build_mbtiles`] wires walker and writer together.
//!
//! ```no_run
//! use tilebridge_container::*;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//! 	let summary = build_mbtiles(Path::new("tiles"), Path::new("out.mbtiles"), &BuildOptions::default())?;
//! 	println!("{} tiles, zoom {}", summary.tile_count, summary.zoom_range);
//!
//! 	let reader = MBTilesReader::open_path(Path::new("out.mbtiles"), 4)?;
//! 	let metadata = reader.read_metadata();
//! 	assert_eq!(metadata.get("type").map(String::as_str), Some("baselayer"));
//! 	Ok(())
//! }
//! ```

mod converter;
pub use converter::*;

mod directory;
pub use directory::*;

mod mbtiles;
pub use mbtiles::*;

#[cfg(any(test, feature = "test"))]
pub mod testing;
