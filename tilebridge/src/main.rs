mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[clap(alias = "pack")]
	/// Pack a folder of XYZ tiles into an MBTiles file
	Build(tools::build::Subcommand),

	#[clap(alias = "server")]
	/// Serve tiles and metadata of an MBTiles file via http
	Serve(tools::serve::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Build(arguments) => tools::build::run(arguments),
		Commands::Serve(arguments) => tools::serve::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{:?}", cli);
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["tilebridge"]).unwrap_err().to_string();
		assert!(err.starts_with("Pack XYZ tile folders into MBTiles and serve them over HTTP."));
		assert!(err.contains("\nUsage: tilebridge [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["tilebridge", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("tilebridge "));
	}

	#[test]
	fn build_subcommand() {
		let output = run_command(vec!["tilebridge", "build"]).unwrap_err().to_string();
		assert!(output.starts_with("Pack a folder of XYZ tiles into an MBTiles file"));
	}

	#[test]
	fn serve_subcommand() {
		let output = run_command(vec!["tilebridge", "serve"]).unwrap_err().to_string();
		assert!(output.starts_with("Serve tiles and metadata of an MBTiles file via http"));
	}
}
