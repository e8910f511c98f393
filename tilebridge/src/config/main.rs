use super::{BuildConfig, ServerConfig};
use anyhow::Result;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};
use tilebridge_derive::context;

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Build configuration
	#[serde(default)]
	pub build: BuildConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parse a YAML file. A relative `server.static_folder` is resolved against the
	/// folder containing the file.
	#[context("reading config file '{}'", path.display())]
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path)?;
		let mut config = Config::from_reader(BufReader::new(file))?;

		if let (Some(base), Some(folder)) = (path.parent(), &config.server.static_folder) {
			if folder.is_relative() {
				config.server.static_folder = Some(base.join(folder));
			}
		}
		Ok(config)
	}

	/// Load `path` if given, the default configuration otherwise.
	pub fn from_optional_path(path: &Option<impl AsRef<Path>>) -> Result<Self> {
		match path {
			Some(path) => Config::from_path(path.as_ref()),
			None => Ok(Config::default()),
		}
	}
}
