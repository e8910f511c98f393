//! Build an MBTiles file from a tile directory tree.
//!
//! [`build_mbtiles`] checks the source, recreates the destination, streams every tile of
//! the tree into it and writes the metadata records last.

use crate::{DEFAULT_BATCH_SIZE, DEFAULT_DESCRIPTION, MBTilesWriter, MetadataSet, TileWalker};
use anyhow::Result;
use std::path::Path;
use tilebridge_core::{TileFormat, ZoomRange};
use tilebridge_derive::context;

/// Settings of a single build run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
	/// Value of the `format` metadata entry.
	pub format: TileFormat,
	/// Tiles per transaction.
	pub batch_size: usize,
	/// Value of the `description` metadata entry.
	pub description: String,
}

impl Default for BuildOptions {
	fn default() -> Self {
		BuildOptions {
			format: TileFormat::PNG,
			batch_size: DEFAULT_BATCH_SIZE,
			description: DEFAULT_DESCRIPTION.to_string(),
		}
	}
}

/// Outcome of a successful build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildSummary {
	pub tile_count: u64,
	pub zoom_range: ZoomRange,
}

/// Pack the `<z>/<x>/<y>.<ext>` tree at `source` into a new MBTiles file at `destination`.
///
/// An existing file at `destination` is replaced. Tiles are written in walk order, so of
/// two files for the same coordinate (`1.png` and `1.jpg`) the one sorted last wins.
///
/// # Errors
/// Fails if `source` is not a directory (before anything is written), if `destination`
/// cannot be created, or if reading a tile or writing to the file fails. Batches flushed
/// before the failure stay in the file.
#[context("building MBTiles '{}' from '{}'", destination.display(), source.display())]
pub fn build_mbtiles(source: &Path, destination: &Path, options: &BuildOptions) -> Result<BuildSummary> {
	let walker = TileWalker::open_path(source)?;
	log::info!("build {destination:?} from {source:?}");

	let mut writer = MBTilesWriter::create(destination, options.batch_size)?;
	let mut walk = walker.iter()?;
	for tile in walk.by_ref() {
		let tile = tile?;
		log::trace!("add {:?} from {:?}", tile.coord, tile.path);
		writer.add_tile(tile.coord, tile.read()?)?;
	}

	let zoom_range = walk.zoom_range();
	let metadata = MetadataSet::for_build(destination, options.format, &options.description, zoom_range);
	let tile_count = writer.finish(&metadata)?;

	log::info!("finished {destination:?}: {tile_count} tiles, zoom {zoom_range}");
	Ok(BuildSummary { tile_count, zoom_range })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{MBTilesReader, testing::write_tiles};
	use assert_fs::TempDir;
	use pretty_assertions::assert_eq;
	use r2d2_sqlite::rusqlite::Connection;
	use std::fs;
	use tilebridge_core::Blob;

	fn build(tiles: &[(&str, &str)], options: &BuildOptions) -> (TempDir, BuildSummary, MBTilesReader) {
		let dir = TempDir::new().unwrap();
		let source = dir.path().join("tiles");
		fs::create_dir(&source).unwrap();
		write_tiles(&source, tiles);

		let destination = dir.path().join("out.mbtiles");
		let summary = build_mbtiles(&source, &destination, options).unwrap();
		let reader = MBTilesReader::open_path(&destination, 2).unwrap();
		(dir, summary, reader)
	}

	#[test]
	fn single_tile() {
		let (dir, summary, reader) = build(&[("0/0/0.png", "PNGDATA")], &BuildOptions::default());
		assert_eq!(summary.tile_count, 1);
		assert_eq!(summary.zoom_range, ZoomRange::new(0, 0));

		let connection = Connection::open(dir.path().join("out.mbtiles")).unwrap();
		let row: (u8, u32, u32, Vec<u8>) = connection
			.query_row("SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles", [], |r| {
				Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
			})
			.unwrap();
		assert_eq!(row, (0, 0, 0, b"PNGDATA".to_vec()));
		assert_eq!(reader.lookup(0, 0, 0).unwrap(), Some(Blob::from(b"PNGDATA")));
	}

	#[test]
	fn rows_are_stored_bottom_up() {
		let (_dir, _, reader) = build(&[("2/3/1.png", "z2")], &BuildOptions::default());
		assert_eq!(reader.lookup(2, 3, 2).unwrap(), Some(Blob::from(b"z2")));
		assert_eq!(reader.lookup(2, 3, 1).unwrap(), None);
	}

	#[test]
	fn metadata_records() {
		let (_dir, summary, reader) = build(
			&[("2/0/0.png", "a"), ("3/1/1.png", "b"), ("5/2/2.png", "c")],
			&BuildOptions::default(),
		);
		assert_eq!(summary.zoom_range, ZoomRange::new(2, 5));

		let metadata = reader.read_metadata();
		let entries: Vec<(&str, &str)> = metadata.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
		assert_eq!(
			entries,
			vec![
				("attribution", ""),
				("description", "Packed from XYZ folder"),
				("format", "png"),
				("maxzoom", "5"),
				("minzoom", "2"),
				("name", "out.mbtiles"),
				("type", "baselayer"),
				("version", "1.0"),
			]
		);
	}

	#[test]
	fn empty_tree() {
		let (_dir, summary, reader) = build(&[("notes.txt", "hello")], &BuildOptions::default());
		assert_eq!(summary.tile_count, 0);
		assert!(summary.zoom_range.is_empty());

		let metadata = reader.read_metadata();
		assert_eq!(metadata["minzoom"], "0");
		assert_eq!(metadata["maxzoom"], "0");
		assert_eq!(reader.count_tiles().unwrap(), 0);
	}

	#[test]
	fn options_are_written() {
		let options = BuildOptions {
			format: TileFormat::JPG,
			batch_size: 2,
			description: String::from("Aerial images"),
		};
		let (_dir, summary, reader) = build(
			&[("1/0/0.jpg", "a"), ("1/0/1.jpg", "b"), ("1/1/0.jpg", "c"), ("1/1/1.jpg", "d"), ("2/0/0.jpg", "e")],
			&options,
		);
		assert_eq!(summary.tile_count, 5);
		assert_eq!(reader.count_tiles().unwrap(), 5);

		let metadata = reader.read_metadata();
		assert_eq!(metadata["format"], "jpg");
		assert_eq!(metadata["description"], "Aerial images");
	}

	#[test]
	fn duplicate_coordinate_keeps_last_in_walk_order() {
		let (_dir, summary, reader) = build(
			&[("4/2/3.jpeg", "third"), ("4/2/3.png", "second"), ("4/2/3.jpg", "first")],
			&BuildOptions::default(),
		);
		// rows sort by index, then by file name: 3.jpeg < 3.jpg < 3.png
		assert_eq!(summary.tile_count, 3);
		assert_eq!(reader.count_tiles().unwrap(), 1);
		assert_eq!(reader.lookup(4, 2, 12).unwrap(), Some(Blob::from(b"second")));
	}

	#[test]
	fn replaces_existing_destination() {
		let dir = TempDir::new().unwrap();
		let source = dir.path().join("tiles");
		write_tiles(&source, &[("0/0/0.png", "new")]);
		let destination = dir.path().join("out.mbtiles");

		build_mbtiles(&source, &destination, &BuildOptions::default()).unwrap();
		write_tiles(&source, &[("1/1/1.png", "more")]);
		let summary = build_mbtiles(&source, &destination, &BuildOptions::default()).unwrap();

		assert_eq!(summary.tile_count, 2);
		let reader = MBTilesReader::open_path(&destination, 1).unwrap();
		assert_eq!(reader.count_tiles().unwrap(), 2);
		assert_eq!(reader.read_metadata()["maxzoom"], "1");
	}

	#[test]
	fn source_must_be_a_directory() {
		let dir = TempDir::new().unwrap();
		let destination = dir.path().join("out.mbtiles");
		let err = build_mbtiles(&dir.path().join("missing"), &destination, &BuildOptions::default()).unwrap_err();

		assert!(format!("{err:?}").contains("source folder not found"));
		assert!(!destination.exists());
	}

	#[test]
	fn unreadable_tile_aborts_the_build() {
		let dir = TempDir::new().unwrap();
		let source = dir.path().join("tiles");
		write_tiles(&source, &[("0/0/0.png", "ok")]);
		// a directory with a tile name cannot be read as a file
		fs::create_dir_all(source.join("1/0/0.png")).unwrap();

		let err = build_mbtiles(&source, &dir.path().join("out.mbtiles"), &BuildOptions::default()).unwrap_err();
		assert!(format!("{err:?}").contains("reading tile file"));
	}
}
