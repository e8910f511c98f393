use anyhow::Result;
use std::path::PathBuf;
use tilebridge::config::Config;
use tilebridge_container::build_mbtiles;
use tilebridge_core::TileFormat;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// folder with tiles in the layout <z>/<x>/<y>.png|jpg|jpeg
	#[arg()]
	source: PathBuf,

	/// MBTiles file to create, an existing file is replaced
	#[arg()]
	destination: PathBuf,

	/// value of the "format" metadata entry
	#[arg(long, value_enum, default_value_t = TileFormat::PNG, display_order = 1)]
	format: TileFormat,

	/// number of tiles written per transaction [default: 5000]
	#[arg(long, value_name = "int", display_order = 2)]
	batch_size: Option<usize>,

	/// value of the "description" metadata entry [default: "Packed from XYZ folder"]
	#[arg(long, display_order = 2)]
	description: Option<String>,

	/// path to a configuration file (YAML), command line arguments override its values
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	config: Option<PathBuf>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let config = Config::from_optional_path(&arguments.config)?;

	let mut build_config = config.build;
	build_config.override_optional_batch_size(&arguments.batch_size);
	build_config.override_optional_description(&arguments.description);
	let options = build_config.to_options(arguments.format);

	eprintln!("build {:?} from {:?}", arguments.destination, arguments.source);

	let summary = build_mbtiles(&arguments.source, &arguments.destination, &options)?;

	let (min, max) = summary.zoom_range.bounds_or_zero();
	eprintln!(
		"wrote {} tiles to {} (z {min}..{max})",
		summary.tile_count,
		arguments.destination.display()
	);

	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;
	use assert_fs::TempDir;
	use std::fs;
	use tilebridge_container::{MBTilesReader, testing::write_tiles};

	#[test]
	fn build_with_options() {
		let dir = TempDir::new().unwrap();
		let source = dir.path().join("tiles");
		write_tiles(&source, &[("1/0/0.jpg", "a"), ("1/1/1.jpg", "b")]);
		let destination = dir.path().join("out.mbtiles");

		run_command(vec![
			"tilebridge",
			"build",
			source.to_str().unwrap(),
			destination.to_str().unwrap(),
			"--format",
			"jpg",
			"--batch-size",
			"1",
			"--description",
			"two tiles",
		])
		.unwrap();

		let reader = MBTilesReader::open_path(&destination, 1).unwrap();
		assert_eq!(reader.count_tiles().unwrap(), 2);
		let metadata = reader.read_metadata();
		assert_eq!(metadata["format"], "jpg");
		assert_eq!(metadata["description"], "two tiles");
	}

	#[test]
	fn build_with_config_file() {
		let dir = TempDir::new().unwrap();
		let source = dir.path().join("tiles");
		write_tiles(&source, &[("0/0/0.png", "a")]);
		let destination = dir.path().join("out.mbtiles");
		let config = dir.path().join("config.yml");
		fs::write(&config, "build:\n  description: from config\n").unwrap();

		run_command(vec![
			"tilebridge",
			"build",
			"-c",
			config.to_str().unwrap(),
			source.to_str().unwrap(),
			destination.to_str().unwrap(),
		])
		.unwrap();

		let metadata = MBTilesReader::open_path(&destination, 1).unwrap().read_metadata();
		assert_eq!(metadata["description"], "from config");
		assert_eq!(metadata["format"], "png");
	}

	#[test]
	fn missing_source() {
		let dir = TempDir::new().unwrap();
		let err = run_command(vec![
			"tilebridge",
			"build",
			dir.path().join("missing").to_str().unwrap(),
			dir.path().join("out.mbtiles").to_str().unwrap(),
		])
		.unwrap_err();
		assert!(format!("{err:?}").contains("source folder not found"));
	}

	#[test]
	fn unknown_format() {
		assert!(run_command(vec!["tilebridge", "build", "a", "b", "--format", "webp"]).is_err());
	}
}
