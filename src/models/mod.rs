pub mod entity;
pub mod server;
