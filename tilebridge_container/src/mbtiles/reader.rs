//! Read tiles and metadata from an MBTiles (SQLite) file.
//!
//! The reader holds a small `r2d2` pool of read-only connections. Every call checks a
//! connection out, runs one query and returns it. Tiles and metadata are not cached;
//! each call reads from the file.
//!
//! A pooled connection remembers which file it opened (device, inode, modification
//! time). On checkout it is compared with the file currently at the path, and a
//! connection to a replaced file is dropped and reopened, so a rebuilt container is
//! served right away.
//!
//! ```no_run
//! use tilebridge_container::MBTilesReader;
//! use tilebridge_core::TileCoord;
//! use std::path::Path;
//!
//! let reader = MBTilesReader::open_path(Path::new("world.mbtiles"), 4).unwrap();
//! let tile = reader.lookup_xyz(&TileCoord::new(3, 4, 2).unwrap()).unwrap();
//! println!("{:?}", tile);
//! println!("{:?}", reader.read_metadata());
//! ```

use anyhow::{Result, ensure};
use r2d2::{ManageConnection, Pool, PooledConnection};
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{self, Connection, OpenFlags, OptionalExtension, params, types::ValueRef},
};
use std::{
	collections::BTreeMap,
	fs,
	ops::Deref,
	path::{Path, PathBuf},
	time::{Duration, SystemTime},
};
use tilebridge_core::{Blob, TileCoord, to_bottom_up};
use tilebridge_derive::context;

/// Default number of pooled read-only connections.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// How long a request waits for a free connection.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(2);

/// Identifies the file behind a path; changes when the file is replaced or modified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FileIdentity {
	device: u64,
	inode: u64,
	modified: Option<SystemTime>,
}

impl FileIdentity {
	fn of(path: &Path) -> Option<FileIdentity> {
		let metadata = fs::metadata(path).ok()?;
		#[cfg(unix)]
		let (device, inode) = {
			use std::os::unix::fs::MetadataExt;
			(metadata.dev(), metadata.ino())
		};
		#[cfg(not(unix))]
		let (device, inode) = (0, 0);
		Some(FileIdentity {
			device,
			inode,
			modified: metadata.modified().ok(),
		})
	}
}

/// A read-only connection and the identity of the file it was opened on.
struct ContainerConnection {
	connection: Connection,
	identity: Option<FileIdentity>,
}

impl Deref for ContainerConnection {
	type Target = Connection;

	fn deref(&self) -> &Connection {
		&self.connection
	}
}

/// Opens read-only connections and rejects those whose file has been replaced.
struct ContainerManager {
	path: PathBuf,
	sqlite: SqliteConnectionManager,
}

impl ManageConnection for ContainerManager {
	type Connection = ContainerConnection;
	type Error = rusqlite::Error;

	fn connect(&self) -> Result<ContainerConnection, rusqlite::Error> {
		// identity first: if the file is swapped in between, the next checkout reopens
		let identity = FileIdentity::of(&self.path);
		let connection = self.sqlite.connect()?;
		Ok(ContainerConnection { connection, identity })
	}

	fn is_valid(&self, connection: &mut ContainerConnection) -> Result<(), rusqlite::Error> {
		let current = FileIdentity::of(&self.path);
		if current.is_none() || current != connection.identity {
			log::debug!("reopen {:?}: file has changed", self.path);
			return Err(rusqlite::Error::InvalidPath(self.path.clone()));
		}
		self.sqlite.is_valid(&mut connection.connection)
	}

	fn has_broken(&self, connection: &mut ContainerConnection) -> bool {
		self.sqlite.has_broken(&mut connection.connection)
	}
}

/// Read-only access to an MBTiles file, safe to share between threads.
pub struct MBTilesReader {
	path: PathBuf,
	pool: Pool<ContainerManager>,
}

impl MBTilesReader {
	/// Open `path` with up to `pool_size` read-only connections.
	///
	/// Connections are opened lazily, so a file that exists but is not a database is
	/// accepted here and fails on first use.
	///
	/// # Errors
	/// Returns an error if the file does not exist or `pool_size` is zero.
	#[context("opening MBTiles '{}'", path.display())]
	pub fn open_path(path: &Path, pool_size: u32) -> Result<MBTilesReader> {
		log::debug!("open {path:?} with {pool_size} connections");

		ensure!(path.is_file(), "file {path:?} does not exist");
		ensure!(pool_size > 0, "pool size must be greater than 0");

		let manager = ContainerManager {
			path: path.to_path_buf(),
			sqlite: SqliteConnectionManager::file(path)
				.with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX),
		};
		let pool = Pool::builder()
			.max_size(pool_size)
			.min_idle(Some(0))
			.test_on_check_out(true)
			.connection_timeout(CONNECTION_TIMEOUT)
			.build(manager)?;

		Ok(MBTilesReader {
			path: path.to_path_buf(),
			pool,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Check out a connection. Fails at once if the file is gone.
	fn connection(&self) -> Result<PooledConnection<ContainerManager>> {
		ensure!(self.path.is_file(), "file {:?} does not exist", self.path);
		Ok(self.pool.get()?)
	}

	/// Fetch the tile at `level`/`x` with bottom-up (TMS) row `row`.
	///
	/// Returns `Ok(None)` if the tile is not stored.
	#[context("fetching tile {}/{}/{} (TMS) from '{}'", level, x, row, self.path.display())]
	pub fn lookup(&self, level: u8, x: u32, row: u32) -> Result<Option<Blob>> {
		log::trace!("lookup {level}/{x}/{row}");

		let connection = self.connection()?;
		let mut statement = connection
			.prepare_cached("SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3")?;
		let data = statement
			.query_row(params![level, x, row], |r| r.get::<_, Vec<u8>>(0))
			.optional()?;
		Ok(data.map(Blob::from))
	}

	/// Fetch a tile by its top-down (XYZ) coordinate.
	pub fn lookup_xyz(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		self.lookup(coord.level, coord.x, to_bottom_up(coord.level, coord.y)?)
	}

	/// Read all `metadata` records. Duplicate names keep the last row.
	///
	/// # Errors
	/// Returns an error if the file is not a readable MBTiles file.
	#[context("reading metadata from '{}'", self.path.display())]
	pub fn try_read_metadata(&self) -> Result<BTreeMap<String, String>> {
		let connection = self.connection()?;
		let mut statement = connection.prepare("SELECT name, value FROM metadata")?;
		let rows = statement.query_map([], |r| Ok((value_to_string(r.get_ref(0)?), value_to_string(r.get_ref(1)?))))?;

		let mut map = BTreeMap::new();
		for row in rows {
			let (name, value) = row?;
			map.insert(name, value);
		}
		Ok(map)
	}

	/// Like [`MBTilesReader::try_read_metadata`], but an unreadable file yields an empty map.
	pub fn read_metadata(&self) -> BTreeMap<String, String> {
		self.try_read_metadata().unwrap_or_else(|err| {
			log::warn!("{err:#}");
			BTreeMap::new()
		})
	}

	/// Number of rows in `tiles`.
	#[context("counting tiles in '{}'", self.path.display())]
	pub fn count_tiles(&self) -> Result<u64> {
		let connection = self.connection()?;
		let count: i64 = connection.query_row("SELECT COUNT(*) FROM tiles", [], |r| r.get(0))?;
		Ok(u64::try_from(count)?)
	}
}

impl std::fmt::Debug for MBTilesReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MBTilesReader")
			.field("path", &self.path)
			.field("connections", &self.pool.state().connections)
			.finish()
	}
}

/// Render any SQLite value as text; `NULL` becomes the empty string.
fn value_to_string(value: ValueRef<'_>) -> String {
	match value {
		ValueRef::Null => String::new(),
		ValueRef::Integer(i) => i.to_string(),
		ValueRef::Real(f) => f.to_string(),
		ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
	}
}
