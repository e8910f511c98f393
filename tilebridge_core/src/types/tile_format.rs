//! Raster tile formats accepted by the builder and the server.
//!
//! `JPG` and `JPEG` are the same image format, but they are kept apart because the
//! spelling chosen at build time is written verbatim into the container metadata.
//!
//! ```
//! use tilebridge_core::TileFormat;
//!
//! assert_eq!(TileFormat::try_from_str("JPEG").unwrap(), TileFormat::JPEG);
//! assert_eq!(TileFormat::JPEG.as_mime_str(), "image/jpeg");
//! assert_eq!(TileFormat::split_filename("12.png"), Some(("12", TileFormat::PNG)));
//! ```

use anyhow::{Result, bail};
#[cfg(feature = "cli")]
use clap::ValueEnum;
use std::fmt::{Display, Formatter};

#[allow(clippy::upper_case_acronyms)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileFormat {
	#[default]
	PNG,
	JPG,
	JPEG,
}

impl TileFormat {
	/// Lower-case name, also used as file extension and as MBTiles `format` value.
	pub fn as_str(&self) -> &'static str {
		match self {
			TileFormat::PNG => "png",
			TileFormat::JPG => "jpg",
			TileFormat::JPEG => "jpeg",
		}
	}

	pub fn as_mime_str(&self) -> &'static str {
		match self {
			TileFormat::PNG => "image/png",
			TileFormat::JPG | TileFormat::JPEG => "image/jpeg",
		}
	}

	/// Parse a format name, ignoring case and surrounding whitespace.
	pub fn try_from_str(value: &str) -> Result<Self> {
		Ok(match value.to_lowercase().trim() {
			"png" => TileFormat::PNG,
			"jpg" => TileFormat::JPG,
			"jpeg" => TileFormat::JPEG,
			_ => bail!("Unknown tile format: '{}'", value),
		})
	}

	/// Match an exact, lower-case file extension (without the dot).
	pub fn from_extension(extension: &str) -> Option<Self> {
		match extension {
			"png" => Some(TileFormat::PNG),
			"jpg" => Some(TileFormat::JPG),
			"jpeg" => Some(TileFormat::JPEG),
			_ => None,
		}
	}

	/// Split `"<stem>.<ext>"` into the stem and the format of an accepted extension.
	///
	/// Only the last extension counts, so `"3.png.gz"` is rejected.
	pub fn split_filename(filename: &str) -> Option<(&str, TileFormat)> {
		let (stem, extension) = filename.rsplit_once('.')?;
		Some((stem, TileFormat::from_extension(extension)?))
	}
}

impl Display for TileFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
