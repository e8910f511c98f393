//! Enumerate the tiles of a directory tree.
//!
//! The tree must follow the pattern
//! ```text
//! <root>/<z>/<x>/<y>.<ext>
//! ```
//! where `<z>`, `<x>`, `<y>` are zoom level, column and top-down (XYZ) row, and `<ext>`
//! is `png`, `jpg` or `jpeg`. Entries that do not match (see [`parse_zoom_entry`],
//! [`parse_column_entry`], [`parse_row_entry`]) are skipped without error.
//!
//! The walk is lazy: zoom directories are listed when the walk starts, the columns of a
//! level when that level is reached, the rows of a column when that column is reached.
//! All three listings are sorted numerically, ties (`7.jpg` and `7.png`) by file name, so
//! two walks over the same tree yield the same sequence.
//!
//! ```no_run
//! use tilebridge_container::TileWalker;
//! use std::path::Path;
//!
//! let walker = TileWalker::open_path(Path::new("/data/tiles")).unwrap();
//! let mut walk = walker.iter().unwrap();
//! for tile in walk.by_ref() {
//! 	let tile = tile.unwrap();
//! 	println!("{:?} <- {:?}", tile.coord, tile.path);
//! }
//! println!("zoom range: {}", walk.zoom_range());
//! ```

use super::{is_index, parse_column_entry, parse_row_entry, parse_zoom_entry};
use anyhow::{Result, ensure};
use itertools::Itertools;
use std::{
	fs,
	path::{Path, PathBuf},
	vec::IntoIter,
};
use tilebridge_core::{Blob, MAX_LEVEL, TileCoord, TileFormat, ZoomRange};
use tilebridge_derive::context;

/// A tile found in the directory tree, not yet read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftTile {
	/// Coordinate with the row in top-down (XYZ) numbering.
	pub coord: TileCoord,
	/// Format according to the file extension.
	pub format: TileFormat,
	/// Path of the tile file.
	pub path: PathBuf,
}

impl DraftTile {
	/// Read the tile file.
	#[context("reading tile file '{}'", self.path.display())]
	pub fn read(&self) -> Result<Blob> {
		Ok(Blob::from(fs::read(&self.path)?))
	}
}

/// Scans a `<z>/<x>/<y>.<ext>` tree. Each call of [`TileWalker::iter`] starts a new walk.
#[derive(Clone, Debug)]
pub struct TileWalker {
	root: PathBuf,
}

impl TileWalker {
	/// Prepare a walk over `root`.
	///
	/// # Errors
	/// Returns an error if `root` is not a directory.
	#[context("opening tile directory '{}'", root.display())]
	pub fn open_path(root: &Path) -> Result<TileWalker> {
		ensure!(root.is_dir(), "source folder not found: {root:?}");
		Ok(TileWalker {
			root: root.to_path_buf(),
		})
	}

	/// Start a new walk.
	///
	/// # Errors
	/// Returns an error if the root directory cannot be listed.
	pub fn iter(&self) -> Result<TileWalk> {
		log::debug!("walk {:?}", self.root);
		let levels = read_entries(&self.root, read_zoom_entry, |level: &u8| *level)?;
		Ok(TileWalk {
			levels: levels.into_iter(),
			level: 0,
			columns: Vec::new().into_iter(),
			tiles: Vec::new().into_iter(),
			zoom_range: ZoomRange::new_empty(),
		})
	}
}

/// A single pass over the tree, yielding [`DraftTile`]s.
///
/// Listing errors of zoom or column directories are yielded as `Err` items.
#[derive(Debug)]
pub struct TileWalk {
	levels: IntoIter<(u8, PathBuf)>,
	level: u8,
	columns: IntoIter<(u32, PathBuf)>,
	tiles: IntoIter<DraftTile>,
	zoom_range: ZoomRange,
}

impl TileWalk {
	/// Zoom range of the tiles yielded so far; complete once the walk is exhausted.
	pub fn zoom_range(&self) -> ZoomRange {
		self.zoom_range
	}
}

impl Iterator for TileWalk {
	type Item = Result<DraftTile>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(tile) = self.tiles.next() {
				self.zoom_range.include(tile.coord.level);
				return Some(Ok(tile));
			}

			if let Some((x, path)) = self.columns.next() {
				match read_rows(self.level, x, &path) {
					Ok(tiles) => self.tiles = tiles.into_iter(),
					Err(err) => return Some(Err(err)),
				}
				continue;
			}

			let (level, path) = self.levels.next()?;
			self.level = level;
			match read_entries(&path, |name, path| parse_column_entry(name, path.is_dir()), |x: &u32| *x) {
				Ok(columns) => self.columns = columns.into_iter(),
				Err(err) => return Some(Err(err)),
			}
		}
	}
}

/// Accept a zoom directory. Numbered directories beyond the deepest level are
/// skipped with a warning, like rows outside the grid.
fn read_zoom_entry(name: &str, path: &Path) -> Option<u8> {
	let is_dir = path.is_dir();
	let level = parse_zoom_entry(name, is_dir);
	if level.is_none() && is_dir && is_index(name) {
		log::warn!("skip {path:?}: zoom level {name} is above {MAX_LEVEL}");
	}
	level
}

/// List the tiles of one column directory, sorted by row and then by file name.
///
/// Rows outside the grid of `level` cannot be addressed and are skipped with a warning.
fn read_rows(level: u8, x: u32, dir: &Path) -> Result<Vec<DraftTile>> {
	let rows = read_entries(dir, |name, _| parse_row_entry(name), |(y, _): &(u32, TileFormat)| *y)?;
	Ok(rows
		.into_iter()
		.filter_map(|((y, format), path)| {
			match TileCoord::new(level, x, y) {
				Ok(coord) => Some(DraftTile { coord, format, path }),
				Err(err) => {
					log::warn!("skip {path:?}: {err}");
					None
				}
			}
		})
		.collect())
}

/// List the entries of `dir` accepted by `filter`, sorted by `order` of their key and
/// then by name.
#[context("listing directory '{}'", dir.display())]
fn read_entries<T, K: Ord>(
	dir: &Path,
	filter: impl Fn(&str, &Path) -> Option<T>,
	order: impl Fn(&T) -> K,
) -> Result<Vec<(T, PathBuf)>> {
	let mut entries = Vec::new();
	for entry in fs::read_dir(dir)? {
		let Ok(entry) = entry else { continue };
		let path = entry.path();
		let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
			log::debug!("skip {path:?}: name is not UTF-8");
			continue;
		};
		match filter(&name, &path) {
			Some(key) => entries.push((key, name, path)),
			None => log::debug!("skip {path:?}: not a tile entry"),
		}
	}

	Ok(entries
		.into_iter()
		.sorted_by(|a, b| order(&a.0).cmp(&order(&b.0)).then_with(|| a.1.cmp(&b.1)))
		.map(|(key, _, path)| (key, path))
		.collect())
}
