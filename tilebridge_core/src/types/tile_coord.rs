//! Validated tile coordinates.
//!
//! A [`TileCoord`] is a zoom level plus column/row indices that lie inside the grid of
//! that level. The coordinate does not carry its row scheme; callers keep track of it
//! and convert with [`TileCoord::to_scheme`] or [`TileCoord::flip_y`].
//!
//! ```
//! use tilebridge_core::{TileCoord, TileScheme};
//!
//! let xyz = TileCoord::new(2, 3, 1).unwrap();
//! let tms = xyz.to_scheme(TileScheme::Xyz, TileScheme::Tms).unwrap();
//! assert_eq!((tms.level, tms.x, tms.y), (2, 3, 2));
//! ```

use crate::{TileScheme, flip_row, max_index};
use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

/// A tile coordinate with zoom level, column `x` and row `y`.
#[derive(Eq, PartialEq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The column of the tile.
	pub x: u32,
	/// The row of the tile.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord`.
	///
	/// # Errors
	/// Returns an error if `level` > 31 or `x`/`y` are outside `[0, 2^level - 1]`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		let max = max_index(level)?;
		ensure!(x <= max, "x ({x}) out of bounds for level {level}");
		ensure!(y <= max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Mirror the row vertically, switching between XYZ and TMS numbering.
	pub fn flip_y(&mut self) {
		// `new` guarantees y <= max_index(level)
		self.y = flip_row(self.level, self.y).unwrap_or(self.y);
	}

	/// Return this coordinate converted from scheme `from` to scheme `to`.
	pub fn to_scheme(&self, from: TileScheme, to: TileScheme) -> Result<TileCoord> {
		Ok(TileCoord {
			level: self.level,
			x: self.x,
			y: from.convert_row(to, self.level, self.y)?,
		})
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}
