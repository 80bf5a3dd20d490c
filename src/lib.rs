pub mod config;
pub mod error;
pub mod log;
pub mod mi;
pub mod session;
pub mod short;
