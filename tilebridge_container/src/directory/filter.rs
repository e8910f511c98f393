//! Name rules that decide whether a directory entry is part of the tile tree.
//!
//! Every rule answers "is this a tile entry?" and returns the parsed index if it is.
//! Entries that fail a rule are not errors; the walker skips them. Numbered entries
//! outside the tile grid (zoom above 31, rows past `2^z - 1`) are skipped with a warning.
//!
//! | level  | accepted                                                         |
//! |--------|------------------------------------------------------------------|
//! | zoom   | directory named by a non-negative integer up to 31               |
//! | column | directory named by a non-negative integer                        |
//! | row    | file `<y>.png`, `<y>.jpg` or `<y>.jpeg`, `<y>` a non-negative integer |
//!
//! A non-negative integer is a non-empty run of ASCII digits that fits the index type
//! (`u8` for zoom levels, `u32` for columns and rows). Extensions are matched exactly,
//! so `3.PNG` is not a tile.

use std::str::FromStr;
use tilebridge_core::{MAX_LEVEL, TileFormat};

/// Whether `name` is a non-empty run of ASCII digits, of any length.
pub fn is_index(name: &str) -> bool {
	!name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Parse `name` as a non-negative integer of type `T`.
pub fn parse_index<T: FromStr>(name: &str) -> Option<T> {
	if !is_index(name) {
		return None;
	}
	name.parse::<T>().ok()
}

/// Top-level entry: a zoom level directory.
pub fn parse_zoom_entry(name: &str, is_dir: bool) -> Option<u8> {
	let level = parse_index::<u8>(name).filter(|level| *level <= MAX_LEVEL)?;
	is_dir.then_some(level)
}

/// Second-level entry: a column directory.
pub fn parse_column_entry(name: &str, is_dir: bool) -> Option<u32> {
	let x = parse_index::<u32>(name)?;
	is_dir.then_some(x)
}

/// Leaf entry: a row file with an accepted image extension.
pub fn parse_row_entry(name: &str) -> Option<(u32, TileFormat)> {
	let (stem, format) = TileFormat::split_filename(name)?;
	Some((parse_index::<u32>(stem)?, format))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use tilebridge_core::TileFormat::*;

	#[rstest]
	#[case("0", Some(0))]
	#[case("7", Some(7))]
	#[case("007", Some(7))]
	#[case("4294967295", Some(u32::MAX))]
	#[case("4294967296", None)]
	#[case("", None)]
	#[case("-1", None)]
	#[case("+1", None)]
	#[case(" 1", None)]
	#[case("1a", None)]
	#[case("abc", None)]
	#[case("٣", None)]
	fn index(#[case] name: &str, #[case] expected: Option<u32>) {
		assert_eq!(parse_index::<u32>(name), expected);
	}

	#[rstest]
	#[case("4294967296", true)]
	#[case("0", true)]
	#[case("", false)]
	#[case("1e3", false)]
	fn index_of_any_length(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(is_index(name), expected);
	}

	#[rstest]
	#[case("5", true, Some(5))]
	#[case("5", false, None)]
	#[case("31", true, Some(31))]
	#[case("32", true, None)]
	#[case("255", true, None)]
	#[case("256", true, None)]
	#[case("meta.json", false, None)]
	#[case("tiles", true, None)]
	fn zoom_entry(#[case] name: &str, #[case] is_dir: bool, #[case] expected: Option<u8>) {
		assert_eq!(parse_zoom_entry(name, is_dir), expected);
	}

	#[rstest]
	#[case("12", true, Some(12))]
	#[case("12", false, None)]
	#[case("x12", true, None)]
	#[case(".DS_Store", false, None)]
	fn column_entry(#[case] name: &str, #[case] is_dir: bool, #[case] expected: Option<u32>) {
		assert_eq!(parse_column_entry(name, is_dir), expected);
	}

	#[rstest]
	#[case("0.png", Some((0, PNG)))]
	#[case("41.jpg", Some((41, JPG)))]
	#[case("41.jpeg", Some((41, JPEG)))]
	#[case("41.webp", None)]
	#[case("41.PNG", None)]
	#[case("41.png.gz", None)]
	#[case("41", None)]
	#[case(".png", None)]
	#[case("a.png", None)]
	#[case("4.1.png", None)]
	#[case("Thumbs.db", None)]
	fn row_entry(#[case] name: &str, #[case] expected: Option<(u32, TileFormat)>) {
		assert_eq!(parse_row_entry(name), expected);
	}
}
