// Library root: exposes config loading and rendering so integration tests
// can drive the dashboard the same way the binary does.

pub mod config;
pub mod render;
