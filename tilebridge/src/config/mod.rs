//! Optional YAML configuration of the `build` and `serve` commands.
//!
//! - [`Config`]: top-level loader
//! - [`ServerConfig`]: bind address, static folder and reader pool
//! - [`BuildConfig`]: batch size and description of a build
//!
//! Every value is optional. Command line arguments override file values field by field.

mod build;
mod main;
mod server;

pub use build::BuildConfig;
pub use main::Config;
pub use server::ServerConfig;
