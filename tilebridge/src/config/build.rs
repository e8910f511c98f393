use serde::Deserialize;
use tilebridge_container::BuildOptions;
use tilebridge_core::TileFormat;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
	/// Tiles per transaction.
	pub batch_size: Option<usize>,

	/// Value of the `description` metadata entry.
	pub description: Option<String>,
}

impl BuildConfig {
	pub fn override_optional_batch_size(&mut self, batch_size: &Option<usize>) {
		if batch_size.is_some() {
			self.batch_size = *batch_size;
		}
	}
	pub fn override_optional_description(&mut self, description: &Option<String>) {
		if description.is_some() {
			self.description = description.clone();
		}
	}

	/// Build options for `format`, with defaults for unset values.
	pub fn to_options(&self, format: TileFormat) -> BuildOptions {
		let mut options = BuildOptions {
			format,
			..BuildOptions::default()
		};
		if let Some(batch_size) = self.batch_size {
			options.batch_size = batch_size;
		}
		if let Some(description) = &self.description {
			options.description.clone_from(description);
		}
		options
	}
}
