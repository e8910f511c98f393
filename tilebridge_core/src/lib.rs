//! Contains tile coordinates, the XYZ/TMS row conversion, tile formats and small value types.

pub mod types;

pub use types::*;
