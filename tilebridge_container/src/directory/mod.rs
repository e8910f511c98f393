//! Tiles stored in a `<root>/<z>/<x>/<y>.<ext>` directory tree.

mod filter;
mod walker;

pub use filter::*;
pub use walker::*;
