//! `SQLite` file `*.mbtiles` as tile container
//!
//! - `MBTilesWriter`: creates the file and ingests tiles.
//! - `MBTilesReader`: point lookups and metadata scans.
//! - `MetadataSet`: the `metadata` records written after a build.

mod metadata;
mod reader;
mod writer;

pub use metadata::{DEFAULT_DESCRIPTION, MetadataSet};
pub use reader::{DEFAULT_POOL_SIZE, MBTilesReader};
pub use writer::{DEFAULT_BATCH_SIZE, MBTilesWriter};
