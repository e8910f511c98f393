use std::path::Path;
use tilebridge_core::{TileFormat, ZoomRange};

pub const DEFAULT_DESCRIPTION: &str = "Packed from XYZ folder";

/// Ordered `(name, value)` records for the `metadata` table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataSet(Vec<(String, String)>);

impl MetadataSet {
	/// The fixed record set written at the end of a build.
	///
	/// `name` is the file name of `destination`; an empty `zoom_range` is written as `0`/`0`.
	pub fn for_build(destination: &Path, format: TileFormat, description: &str, zoom_range: ZoomRange) -> MetadataSet {
		let name = destination
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_default();
		let (minzoom, maxzoom) = zoom_range.bounds_or_zero();

		let mut set = MetadataSet::default();
		set.push("name", &name);
		set.push("type", "baselayer");
		set.push("version", "1.0");
		set.push("description", description);
		set.push("format", format.as_str());
		set.push("minzoom", &minzoom.to_string());
		set.push("maxzoom", &maxzoom.to_string());
		set.push("attribution", "");
		set
	}

	pub fn push(&mut self, name: &str, value: &str) {
		self.0.push((name.to_owned(), value.to_owned()));
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn build_records() {
		let set = MetadataSet::for_build(
			Path::new("/tmp/denmark.mbtiles"),
			TileFormat::JPG,
			DEFAULT_DESCRIPTION,
			ZoomRange::new(2, 5),
		);
		assert_eq!(
			set.iter().collect::<Vec<_>>(),
			vec![
				("name", "denmark.mbtiles"),
				("type", "baselayer"),
				("version", "1.0"),
				("description", "Packed from XYZ folder"),
				("format", "jpg"),
				("minzoom", "2"),
				("maxzoom", "5"),
				("attribution", ""),
			]
		);
	}

	#[test]
	fn empty_range_is_zero() {
		let set = MetadataSet::for_build(Path::new("x.mbtiles"), TileFormat::JPEG, "d", ZoomRange::new_empty());
		assert_eq!(set.get("minzoom"), Some("0"));
		assert_eq!(set.get("maxzoom"), Some("0"));
		assert_eq!(set.get("format"), Some("jpeg"));
		assert_eq!(set.len(), 8);
	}
}
