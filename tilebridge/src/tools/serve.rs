use anyhow::Result;
use std::path::PathBuf;
use tilebridge::{config::Config, server::TileServer};
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// MBTiles file to serve. It is opened read-only and must exist.
	#[arg()]
	pub container: PathBuf,

	/// Path to a configuration file (YAML).
	/// Command line arguments will override configuration file settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8081
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,

	/// Serve all other paths from this folder. Default: current directory
	#[arg(short = 's', long = "static", value_name = "FOLDER", display_order = 1)]
	pub static_folder: Option<PathBuf>,

	/// Number of read-only connections to the container. Default: 10
	#[arg(long, value_name = "int", display_order = 2)]
	pub pool_size: Option<u32>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = Config::from_optional_path(&arguments.config)?;

	let mut server_config = config.server;
	server_config.override_optional_ip(&arguments.ip);
	server_config.override_optional_port(&arguments.port);
	server_config.override_optional_static_folder(&arguments.static_folder);
	server_config.override_optional_pool_size(&arguments.pool_size);

	let mut server = TileServer::from_config(&server_config, &arguments.container)?;
	server.start().await?;

	let port = server.port();
	eprintln!("serving {:?} on {}:{port}", arguments.container, server.ip());
	eprintln!("Tile URL template: http://localhost:{port}/{{z}}/{{x}}/{{y}}.png");
	eprintln!("Metadata URL: http://localhost:{port}/metadata");

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
	} else {
		tokio::signal::ctrl_c().await?;
	}

	server.stop().await;
	Ok(())
}
