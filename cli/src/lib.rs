//! mcp-tap binary internals, exposed for unit tests.

pub mod app;
pub mod commands;
