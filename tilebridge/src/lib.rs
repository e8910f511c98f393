//! # tilebridge
//!
//! Packs a folder of XYZ tiles (`<z>/<x>/<y>.png`) into a single MBTiles file and serves
//! that file over HTTP with the usual `/{z}/{x}/{y}.png` URLs.
//!
//! The building blocks live in separate crates and are re-exported here:
//! - [`core`]: tile coordinates, XYZ/TMS row conversion, tile formats
//! - [`container`]: directory walker, MBTiles writer and reader, [`container::build_mbtiles`]
//!
//! This crate adds the YAML [`config`] and the axum based [`server`].
//!
//! ```no_run
//! use tilebridge::{container::MBTilesReader, server::TileServer};
//! use std::{path::Path, sync::Arc};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//! 	let reader = MBTilesReader::open_path(Path::new("denmark.mbtiles"), 10)?;
//! 	let mut server = TileServer::new("127.0.0.1", 8081, Arc::new(reader));
//! 	server.start().await?;
//! 	tokio::signal::ctrl_c().await?;
//! 	server.stop().await;
//! 	Ok(())
//! }
//! ```

pub mod config;
pub mod server;

pub use tilebridge_container as container;
pub use tilebridge_core as core;
pub use tilebridge_derive as derive;
