use serde::Deserialize;
use std::path::PathBuf;
use tilebridge_container::DEFAULT_POOL_SIZE;

pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// IP to bind to.
	pub ip: Option<String>,

	/// TCP port to bind to.
	pub port: Option<u16>,

	/// Folder served for every path that is neither a tile nor `/metadata`.
	pub static_folder: Option<PathBuf>,

	/// Number of read-only connections to the container.
	pub pool_size: Option<u32>,
}

impl ServerConfig {
	pub fn override_optional_ip(&mut self, ip: &Option<String>) {
		if ip.is_some() {
			self.ip = ip.clone();
		}
	}
	pub fn override_optional_port(&mut self, port: &Option<u16>) {
		if port.is_some() {
			self.port = *port;
		}
	}
	pub fn override_optional_static_folder(&mut self, static_folder: &Option<PathBuf>) {
		if static_folder.is_some() {
			self.static_folder = static_folder.clone();
		}
	}
	pub fn override_optional_pool_size(&mut self, pool_size: &Option<u32>) {
		if pool_size.is_some() {
			self.pool_size = *pool_size;
		}
	}

	pub fn ip_or_default(&self) -> &str {
		self.ip.as_deref().unwrap_or(DEFAULT_IP)
	}
	pub fn port_or_default(&self) -> u16 {
		self.port.unwrap_or(DEFAULT_PORT)
	}
	pub fn pool_size_or_default(&self) -> u32 {
		self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
	}
	pub fn static_folder_or_default(&self) -> PathBuf {
		self.static_folder.clone().unwrap_or_else(|| PathBuf::from("."))
	}
}
