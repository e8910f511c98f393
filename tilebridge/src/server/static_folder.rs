use super::mime::guess_mime;
use anyhow::{Result, ensure};
use std::{
	env::current_dir,
	fmt::Debug,
	fs,
	path::{Component, Path, PathBuf},
};
use tilebridge_core::Blob;
use tilebridge_derive::context;

/// A file found in a [`StaticFolder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticResponse {
	pub blob: Blob,
	pub mime: String,
}

/// Serves the files below a local folder.
#[derive(Clone)]
pub struct StaticFolder {
	folder: PathBuf,
	name: String,
}

impl StaticFolder {
	#[context("loading static folder from path: {path:?}")]
	pub fn from(path: &Path) -> Result<StaticFolder> {
		let folder = current_dir()?.join(path);
		ensure!(folder.exists(), "path {folder:?} does not exist");
		ensure!(folder.is_dir(), "path {folder:?} must be a directory");

		Ok(StaticFolder {
			folder: folder.canonicalize()?,
			name: path.to_string_lossy().into_owned(),
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Look up the file for the URL path `url_path`, e.g. `/css/style.css`.
	///
	/// Directories resolve to their `index.html`. Paths leaving the folder, through `..`
	/// or a symbolic link, are not found.
	pub fn get_data(&self, url_path: &str) -> Option<StaticResponse> {
		let mut local_path = self.folder.clone();
		for segment in url_path.split('/') {
			match Path::new(segment).components().next() {
				None | Some(Component::CurDir) => {}
				Some(Component::Normal(_)) if !segment.contains('\\') => local_path.push(segment),
				_ => return None,
			}
		}

		if local_path.is_dir() {
			local_path.push("index.html");
		}

		let local_path = local_path.canonicalize().ok()?;
		if !local_path.starts_with(&self.folder) {
			log::debug!("refuse {local_path:?}: outside of {:?}", self.folder);
			return None;
		}

		match fs::read(&local_path) {
			Ok(data) => Some(StaticResponse {
				blob: Blob::from(data),
				mime: guess_mime(&local_path),
			}),
			Err(err) => {
				log::debug!("cannot read {local_path:?}: {err}");
				None
			}
		}
	}
}

impl Debug for StaticFolder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StaticFolder")
			.field("folder", &self.folder)
			.field("name", &self.name)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use pretty_assertions::assert_eq;

	fn setup() -> (TempDir, StaticFolder) {
		let dir = TempDir::new().unwrap();
		let web = dir.path().join("web");
		fs::create_dir_all(web.join("css")).unwrap();
		fs::create_dir_all(web.join("docs")).unwrap();
		fs::write(web.join("index.html"), "<h1>map</h1>").unwrap();
		fs::write(web.join("css/style.css"), "body{}").unwrap();
		fs::write(web.join("docs/index.html"), "docs").unwrap();
		fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

		let folder = StaticFolder::from(&web).unwrap();
		(dir, folder)
	}

	#[test]
	fn serves_files() {
		let (_dir, folder) = setup();
		let response = folder.get_data("/css/style.css").unwrap();
		assert_eq!(response.blob.as_slice(), b"body{}");
		assert_eq!(response.mime, "text/css; charset=utf-8");
	}

	#[test]
	fn directories_serve_index_html() {
		let (_dir, folder) = setup();
		assert_eq!(folder.get_data("/").unwrap().blob.as_slice(), b"<h1>map</h1>");
		assert_eq!(folder.get_data("").unwrap().blob.as_slice(), b"<h1>map</h1>");
		assert_eq!(folder.get_data("/docs").unwrap().blob.as_slice(), b"docs");
		assert_eq!(folder.get_data("/docs/").unwrap().mime, "text/html; charset=utf-8");
	}

	#[test]
	fn missing_files() {
		let (_dir, folder) = setup();
		assert!(folder.get_data("/nope.txt").is_none());
		assert!(folder.get_data("/css").is_none());
	}

	#[test]
	fn refuses_paths_outside_the_folder() {
		let (_dir, folder) = setup();
		assert!(folder.get_data("/../secret.txt").is_none());
		assert!(folder.get_data("/css/../../secret.txt").is_none());
		assert!(folder.get_data("/./css/style.css").is_some());
	}

	#[test]
	fn folder_must_exist() {
		let dir = TempDir::new().unwrap();
		assert!(StaticFolder::from(&dir.path().join("missing")).is_err());
		fs::write(dir.path().join("file"), "").unwrap();
		assert!(StaticFolder::from(&dir.path().join("file")).is_err());
	}

	#[test]
	fn debug_output() {
		let (_dir, folder) = setup();
		let debug = format!("{folder:?}");
		assert!(debug.starts_with("StaticFolder { folder: \""));
		assert!(folder.name().ends_with("web"));
	}
}
