//! The HTTP server for a single MBTiles container.
//!
//! | route                          | response                                  |
//! |--------------------------------|-------------------------------------------|
//! | `/{z}/{x}/{y}.{png,jpg,jpeg}`  | tile, XYZ rows, with CORS headers          |
//! | `/metadata`                    | `metadata` table as JSON object            |
//! | anything else                  | file from the static folder, if configured |

use super::{
	handlers::{ServerState, serve_metadata, serve_static, serve_tile},
	static_folder::StaticFolder,
};
use crate::config::ServerConfig;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::{path::Path, sync::Arc};
use tilebridge_container::MBTilesReader;
use tilebridge_derive::context;
use tokio::{
	net::TcpListener,
	sync::oneshot::{self, Sender},
	task::JoinHandle,
};

#[derive(Debug)]
pub struct TileServer {
	ip: String,
	port: u16,
	state: ServerState,
	exit_signal: Option<Sender<()>>,
	handle: Option<JoinHandle<()>>,
}

impl TileServer {
	/// Create a server for `reader`. Nothing is bound until [`TileServer::start`].
	pub fn new(ip: &str, port: u16, reader: Arc<MBTilesReader>) -> TileServer {
		TileServer {
			ip: ip.to_owned(),
			port,
			state: ServerState {
				reader,
				static_folder: None,
			},
			exit_signal: None,
			handle: None,
		}
	}

	/// Open `container` and the static folder as configured.
	#[context("creating server for '{}'", container.display())]
	pub fn from_config(config: &ServerConfig, container: &Path) -> Result<TileServer> {
		let reader = MBTilesReader::open_path(container, config.pool_size_or_default())?;
		let mut server = TileServer::new(config.ip_or_default(), config.port_or_default(), Arc::new(reader));
		server.set_static_folder(StaticFolder::from(&config.static_folder_or_default())?);
		Ok(server)
	}

	pub fn set_static_folder(&mut self, folder: StaticFolder) {
		log::info!("add static folder: {folder:?}");
		self.state.static_folder = Some(Arc::new(folder));
	}

	/// The port the server listens on; after [`TileServer::start`] with port `0` this is
	/// the port picked by the OS.
	pub fn port(&self) -> u16 {
		self.port
	}

	pub fn ip(&self) -> &str {
		&self.ip
	}

	pub fn router(&self) -> Router {
		Router::new()
			.route("/metadata", get(serve_metadata))
			.route("/{z}/{x}/{file}", get(serve_tile))
			.fallback(get(serve_static))
			.with_state(self.state.clone())
	}

	/// Bind and serve in a background task. A running server is stopped first.
	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() {
			self.stop().await;
		}

		log::info!("starting server");

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding server to {addr}"))?;
		self.port = listener.local_addr()?.port();
		log::info!("server listens on {}:{}", self.ip, self.port);

		let router = self.router();
		let (tx, rx) = oneshot::channel::<()>();

		let handle = tokio::spawn(async move {
			let result = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await;
			if let Err(err) = result {
				log::error!("server stopped with error: {err}");
			}
		});

		self.exit_signal = Some(tx);
		self.handle = Some(handle);

		Ok(())
	}

	/// Trigger a graceful shutdown and wait until the server task has finished.
	pub async fn stop(&mut self) {
		let Some(exit_signal) = self.exit_signal.take() else {
			return;
		};

		log::info!("stopping server");
		exit_signal.send(()).ok();

		if let Some(handle) = self.handle.take() {
			if let Err(err) = handle.await {
				log::warn!("server task failed: {err}");
			}
		}
	}
}
