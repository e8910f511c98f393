//! Observed zoom range of a set of tiles.

use std::fmt::{self, Display};

/// Minimum and maximum zoom level seen so far, or empty if no level was seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoomRange(Option<(u8, u8)>);

impl ZoomRange {
	#[must_use]
	pub fn new_empty() -> ZoomRange {
		ZoomRange(None)
	}

	#[must_use]
	pub fn new(min: u8, max: u8) -> ZoomRange {
		ZoomRange(Some((min.min(max), min.max(max))))
	}

	/// Widen the range so that it contains `level`.
	pub fn include(&mut self, level: u8) {
		self.0 = Some(match self.0 {
			None => (level, level),
			Some((min, max)) => (min.min(level), max.max(level)),
		});
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_none()
	}

	#[must_use]
	pub fn min(&self) -> Option<u8> {
		self.0.map(|(min, _)| min)
	}

	#[must_use]
	pub fn max(&self) -> Option<u8> {
		self.0.map(|(_, max)| max)
	}

	/// `(min, max)`, with an empty range collapsing to `(0, 0)`.
	#[must_use]
	pub fn bounds_or_zero(&self) -> (u8, u8) {
		self.0.unwrap_or((0, 0))
	}
}

impl Display for ZoomRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0 {
			None => f.write_str("empty"),
			Some((min, max)) => write!(f, "{min}..{max}"),
		}
	}
}
