//! Create an MBTiles (SQLite) file and ingest tiles.
//!
//! The file follows the [MBTiles format](https://github.com/mapbox/mbtiles-spec):
//! - `metadata (name TEXT, value TEXT)`
//! - `tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB)`
//!   with a unique index over `(zoom_level, tile_column, tile_row)`
//!
//! Tiles are handed in with XYZ rows and stored with TMS rows (`tile_row = 2^z - 1 - y`).
//!
//! The connection runs with `journal_mode=OFF` and `synchronous=OFF`. That is only
//! acceptable because a build always starts from an empty file: tiles are collected in
//! batches and each batch is committed as one transaction, so a crash loses at most
//! the current batch.

use super::MetadataSet;
use anyhow::{Result, anyhow, ensure};
use r2d2_sqlite::rusqlite::{Connection, params};
use std::{
	fs::remove_file,
	path::{Path, PathBuf},
};
use tilebridge_core::{Blob, TileCoord, to_bottom_up};
use tilebridge_derive::context;

/// Tiles per transaction unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

const SCHEMA: &str = "CREATE TABLE metadata (name TEXT, value TEXT);
	CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);
	CREATE UNIQUE INDEX tile_index ON tiles (zoom_level, tile_column, tile_row);";

/// Exclusive writer for a freshly created MBTiles file.
#[derive(Debug)]
pub struct MBTilesWriter {
	connection: Connection,
	path: PathBuf,
	batch: Vec<(TileCoord, Blob)>,
	batch_size: usize,
	tile_count: u64,
}

impl MBTilesWriter {
	/// Create a new, empty MBTiles file at `path`, replacing any existing file.
	///
	/// # Errors
	/// Returns an error if `batch_size` is zero, the old file cannot be removed, or the
	/// database cannot be created.
	#[context("creating MBTiles '{}'", path.display())]
	pub fn create(path: &Path, batch_size: usize) -> Result<MBTilesWriter> {
		ensure!(batch_size > 0, "batch size must be greater than 0");

		if path.exists() {
			log::debug!("remove existing {path:?}");
			remove_file(path)?;
		}

		let connection = Connection::open(path)?;
		let journal_mode: String =
			connection.pragma_update_and_check(None, "journal_mode", "OFF", |row| row.get(0))?;
		log::trace!("journal_mode={journal_mode}");
		connection.pragma_update(None, "synchronous", "OFF")?;
		connection.execute_batch(SCHEMA)?;

		Ok(MBTilesWriter {
			connection,
			path: path.to_path_buf(),
			batch: Vec::with_capacity(batch_size),
			batch_size,
			tile_count: 0,
		})
	}

	/// Queue a tile. `coord` uses XYZ rows. The batch is flushed once it is full.
	///
	/// A later tile with the same coordinate replaces an earlier one.
	pub fn add_tile(&mut self, coord: TileCoord, blob: Blob) -> Result<()> {
		let row = to_bottom_up(coord.level, coord.y)?;
		self.batch.push((TileCoord { y: row, ..coord }, blob));
		if self.batch.len() >= self.batch_size {
			self.flush()?;
		}
		Ok(())
	}

	/// Write all queued tiles in one transaction and commit it.
	#[context("writing {} tiles to '{}'", self.batch.len(), self.path.display())]
	pub fn flush(&mut self) -> Result<()> {
		if self.batch.is_empty() {
			return Ok(());
		}

		let transaction = self.connection.transaction()?;
		{
			let mut statement = transaction.prepare_cached(
				"INSERT OR REPLACE INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
			)?;
			for (c, blob) in &self.batch {
				statement.execute(params![c.level, c.x, c.y, blob.as_slice()])?;
			}
		}
		transaction.commit()?;

		self.tile_count += self.batch.len() as u64;
		self.batch.clear();
		log::info!("inserted {} tiles", self.tile_count);
		Ok(())
	}

	/// Number of tiles committed so far.
	pub fn tile_count(&self) -> u64 {
		self.tile_count
	}

	/// Flush the remaining tiles, write `metadata` and close the file.
	///
	/// Returns the total number of tiles written.
	pub fn finish(mut self, metadata: &MetadataSet) -> Result<u64> {
		self.flush()?;
		self.write_metadata(metadata)?;

		let MBTilesWriter {
			connection,
			path,
			tile_count,
			..
		} = self;
		connection
			.close()
			.map_err(|(_, err)| anyhow!(err).context(format!("closing MBTiles '{}'", path.display())))?;
		log::debug!("finished {path:?} with {tile_count} tiles");
		Ok(tile_count)
	}

	#[context("writing metadata to '{}'", self.path.display())]
	fn write_metadata(&mut self, metadata: &MetadataSet) -> Result<()> {
		let transaction = self.connection.transaction()?;
		{
			let mut statement = transaction.prepare("INSERT INTO metadata (name, value) VALUES (?1, ?2)")?;
			for (name, value) in metadata.iter() {
				statement.execute(params![name, value])?;
			}
		}
		transaction.commit()?;
		Ok(())
	}
}
