pub mod console;
pub mod server;
pub mod tenant;
