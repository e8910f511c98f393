//! HTTP handlers and small response helpers for the tile server.
//!
//! - `serve_tile` answers `/{z}/{x}/{y}.{png|jpg|jpeg}` from the container.
//! - `serve_metadata` answers `/metadata` with the `metadata` table as a JSON object.
//! - `serve_static` answers everything else from the static folder.
//!
//! Store errors never turn into a 500: a failed lookup is a 404, failed metadata an
//! empty object.

use super::static_folder::{StaticFolder, StaticResponse};
use axum::{
	body::Body,
	extract::{Path, State},
	http::{
		StatusCode, Uri,
		header::{
			ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
		},
	},
	response::{IntoResponse, Response},
};
use std::{collections::BTreeMap, num::ParseIntError, sync::Arc};
use tilebridge_container::MBTilesReader;
use tilebridge_core::{Blob, TileCoord, TileFormat};
use tokio::task::spawn_blocking;

/// Shared by all handlers. The container is fixed when the server is created.
#[derive(Clone, Debug)]
pub struct ServerState {
	pub reader: Arc<MBTilesReader>,
	pub static_folder: Option<Arc<StaticFolder>>,
}

pub async fn serve_tile(
	Path((z, x, file)): Path<(String, String, String)>,
	uri: Uri,
	State(state): State<ServerState>,
) -> Response {
	let Some((y, format)) = TileFormat::split_filename(&file) else {
		return serve_static(uri, State(state)).await;
	};
	log::debug!("handle tile request: {}", uri.path());

	let coord = match parse_tile_coord(&z, &x, y) {
		Ok(Some(coord)) => coord,
		Ok(None) => {
			log::debug!("send 404 for tile request: {}: outside of the tile grid", uri.path());
			return error_tile_not_found();
		}
		Err(err) => {
			log::debug!("send 400 for tile request: {}: {err}", uri.path());
			return error_invalid_coordinates();
		}
	};

	let reader = Arc::clone(&state.reader);
	match spawn_blocking(move || reader.lookup_xyz(&coord)).await {
		Ok(Ok(Some(blob))) => {
			log::debug!("send response for tile request: {}", uri.path());
			ok_tile(blob, format)
		}
		Ok(Ok(None)) => {
			log::debug!("send 404 for tile request: {}", uri.path());
			error_tile_not_found()
		}
		Ok(Err(err)) => {
			log::warn!(
				"send 404 for tile request: {}. Error:\n{}",
				uri.path(),
				format_error_chain(&err)
			);
			error_tile_not_found()
		}
		Err(err) => {
			log::warn!("send 404 for tile request: {}. Lookup task failed: {err}", uri.path());
			error_tile_not_found()
		}
	}
}

pub async fn serve_metadata(State(state): State<ServerState>) -> Response {
	log::debug!("handle metadata request");

	let reader = Arc::clone(&state.reader);
	let metadata = spawn_blocking(move || reader.read_metadata())
		.await
		.unwrap_or_else(|err| {
			log::warn!("metadata task failed: {err}");
			BTreeMap::new()
		});

	let json = serde_json::to_vec(&metadata).unwrap_or_else(|err| {
		log::warn!("cannot serialize metadata: {err}");
		b"{}".to_vec()
	});
	ok_json(json)
}

pub async fn serve_static(uri: Uri, State(state): State<ServerState>) -> Response {
	let path = uri.path().to_owned();
	log::debug!("handle static request: {path}");

	let Some(folder) = state.static_folder else {
		return error_404();
	};

	match spawn_blocking(move || folder.get_data(&path)).await {
		Ok(Some(response)) => ok_data(response),
		Ok(None) => {
			log::debug!("send 404 to static request: {}", uri.path());
			error_404()
		}
		Err(err) => {
			log::warn!("send 404 to static request: {}. Task failed: {err}", uri.path());
			error_404()
		}
	}
}

/// Parse top-down tile coordinates from URL segments.
///
/// Segments that are not integers are an error. Integers outside the tile grid give
/// `Ok(None)`: such a tile cannot exist.
fn parse_tile_coord(z: &str, x: &str, y: &str) -> Result<Option<TileCoord>, ParseIntError> {
	let (z, x, y) = (z.parse::<u64>()?, x.parse::<u64>()?, y.parse::<u64>()?);
	Ok(match (u8::try_from(z), u32::try_from(x), u32::try_from(y)) {
		(Ok(z), Ok(x), Ok(y)) => TileCoord::new(z, x, y).ok(),
		_ => None,
	})
}

// --- small helpers -----------------------------------------------------------

pub fn format_error_chain(err: &anyhow::Error) -> String {
	let mut result = err.to_string();

	for (i, cause) in err.chain().skip(1).enumerate() {
		if i == 0 {
			result.push_str("\n  Caused by:");
		}
		result.push_str(&format!("\n    {cause}"));
	}

	result
}

fn error_with(status: StatusCode, message: &'static str) -> Response {
	(status, [(CONTENT_TYPE, "text/plain; charset=utf-8")], message).into_response()
}

pub fn error_404() -> Response {
	error_with(StatusCode::NOT_FOUND, "Not Found")
}

pub fn error_tile_not_found() -> Response {
	error_with(StatusCode::NOT_FOUND, "Tile not found")
}

pub fn error_invalid_coordinates() -> Response {
	error_with(StatusCode::BAD_REQUEST, "Invalid tile coordinates")
}

fn ok_tile(blob: Blob, format: TileFormat) -> Response {
	(
		StatusCode::OK,
		[
			(CONTENT_TYPE, format.as_mime_str()),
			(ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
			(ACCESS_CONTROL_ALLOW_METHODS, "GET"),
			(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
		],
		Body::from(blob.into_vec()),
	)
		.into_response()
}

fn ok_json(json: Vec<u8>) -> Response {
	(
		StatusCode::OK,
		[(CONTENT_TYPE, "application/json"), (ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
		Body::from(json),
	)
		.into_response()
}

fn ok_data(response: StaticResponse) -> Response {
	(
		StatusCode::OK,
		[(CONTENT_TYPE, response.mime)],
		Body::from(response.blob.into_vec()),
	)
		.into_response()
}
