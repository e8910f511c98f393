mod handlers;
mod mime;
mod static_folder;
mod tile_server;

pub use handlers::ServerState;
pub use static_folder::{StaticFolder, StaticResponse};
pub use tile_server::TileServer;
