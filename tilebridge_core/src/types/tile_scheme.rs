//! Row numbering schemes of a tile pyramid and the conversion between them.
//!
//! Two conventions exist for numbering the rows of the `2^z × 2^z` grid at zoom level `z`:
//!
//! - [`TileScheme::Xyz`] (top-down): row `0` is the northernmost row. Used by tile URLs
//!   like `/{z}/{x}/{y}.png` and by tile directories.
//! - [`TileScheme::Tms`] (bottom-up): row `0` is the southernmost row. Used by the
//!   `tiles` table of an MBTiles container.
//!
//! Both directions use the same formula, `row' = 2^z - 1 - row`, so the conversion is
//! its own inverse.
//!
//! # Examples
//!
//! ```
//! use tilebridge_core::{to_bottom_up, to_top_down};
//!
//! assert_eq!(to_bottom_up(2, 1).unwrap(), 2);
//! assert_eq!(to_top_down(2, 2).unwrap(), 1);
//! assert!(to_bottom_up(2, 4).is_err());
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Display};

/// Highest zoom level whose grid still fits into `u32` indices.
pub const MAX_LEVEL: u8 = 31;

/// Row numbering convention of a tile coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileScheme {
	/// Top-down rows, row `0` in the north.
	Xyz,
	/// Bottom-up rows, row `0` in the south.
	Tms,
}

impl TileScheme {
	/// Convert `row` at zoom `level` from this scheme into `target`.
	///
	/// Returns `row` unchanged (after range validation) if both schemes are equal.
	pub fn convert_row(self, target: TileScheme, level: u8, row: u32) -> Result<u32> {
		if self == target {
			let max = max_index(level)?;
			ensure!(row <= max, "row ({row}) out of range [0, {max}] for level {level}");
			Ok(row)
		} else {
			flip_row(level, row)
		}
	}
}

impl Display for TileScheme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TileScheme::Xyz => "xyz",
			TileScheme::Tms => "tms",
		})
	}
}

/// Largest valid column/row index at zoom `level`, i.e. `2^level - 1`.
///
/// # Errors
/// Returns an error if `level` exceeds [`MAX_LEVEL`].
pub fn max_index(level: u8) -> Result<u32> {
	ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
	Ok(((1u64 << level) - 1) as u32)
}

/// Mirror `row` vertically within the grid of zoom `level`.
///
/// # Errors
/// Returns an error if `level` exceeds [`MAX_LEVEL`] or `row` is outside `[0, 2^level - 1]`.
pub fn flip_row(level: u8, row: u32) -> Result<u32> {
	let max = max_index(level)?;
	ensure!(row <= max, "row ({row}) out of range [0, {max}] for level {level}");
	Ok(max - row)
}

/// Convert a top-down (XYZ) row into a bottom-up (TMS) row.
pub fn to_bottom_up(level: u8, row_top_down: u32) -> Result<u32> {
	flip_row(level, row_top_down)
}

/// Convert a bottom-up (TMS) row into a top-down (XYZ) row.
pub fn to_top_down(level: u8, row_bottom_up: u32) -> Result<u32> {
	flip_row(level, row_bottom_up)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, 0, 0)]
	#[case(1, 0, 1)]
	#[case(1, 1, 0)]
	#[case(2, 1, 2)]
	#[case(3, 0, 7)]
	#[case(14, 5376, 11007)]
	#[case(31, 0, 2147483647)]
	fn bottom_up_rows(#[case] level: u8, #[case] xyz: u32, #[case] tms: u32) {
		assert_eq!(to_bottom_up(level, xyz).unwrap(), tms);
		assert_eq!(to_top_down(level, tms).unwrap(), xyz);
	}

	#[test]
	fn flipping_twice_is_identity() {
		for level in 0..=10u8 {
			for row in 0..=max_index(level).unwrap() {
				assert_eq!(to_top_down(level, to_bottom_up(level, row).unwrap()).unwrap(), row);
			}
		}
		for row in [0, 1, 12345, 2147483646, 2147483647] {
			assert_eq!(flip_row(31, flip_row(31, row).unwrap()).unwrap(), row);
		}
	}

	#[rstest]
	#[case(0, 1)]
	#[case(2, 4)]
	#[case(5, 1000)]
	fn row_out_of_range(#[case] level: u8, #[case] row: u32) {
		let err = to_bottom_up(level, row).unwrap_err();
		assert!(err.to_string().contains("out of range"), "{err}");
	}

	#[test]
	fn level_out_of_range() {
		assert_eq!(max_index(31).unwrap(), u32::MAX >> 1);
		assert!(max_index(32).is_err());
		assert!(flip_row(40, 0).is_err());
	}

	#[test]
	fn convert_between_schemes() {
		use TileScheme::*;
		assert_eq!(Xyz.convert_row(Tms, 3, 1).unwrap(), 6);
		assert_eq!(Tms.convert_row(Xyz, 3, 6).unwrap(), 1);
		assert_eq!(Tms.convert_row(Tms, 3, 6).unwrap(), 6);
		assert!(Xyz.convert_row(Xyz, 3, 8).is_err());
		assert_eq!(Xyz.to_string(), "xyz");
		assert_eq!(Tms.to_string(), "tms");
	}
}
