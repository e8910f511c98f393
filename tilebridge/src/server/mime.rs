use std::path::Path;

/// Content type for a file name; text types get an explicit UTF-8 charset.
pub fn guess_mime(path: &Path) -> String {
	let mime = mime_guess::from_path(path).first_or_octet_stream().essence_str().to_owned();
	if mime.starts_with("text/") {
		format!("{mime}; charset=utf-8")
	} else {
		mime
	}
}
