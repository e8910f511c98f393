//! Contains coordinates, schemes, formats and the zoom range.

mod blob;
pub use blob::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_format;
pub use tile_format::*;

mod tile_scheme;
pub use tile_scheme::*;

mod zoom_range;
pub use zoom_range::*;
