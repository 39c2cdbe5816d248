pub mod api;
pub mod plan;
pub mod profile;
pub mod server;
pub mod session;
pub mod user;
