// Library root: re-exports all modules so integration tests and the binary
// can access the crate's public API.

pub mod config;
pub mod data;
pub mod scoring;
pub mod session;
