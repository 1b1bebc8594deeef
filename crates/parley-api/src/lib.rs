//! Parley application layer: HTTP server, session handling, and CLI.
//!
//! The `parley` binary is a thin wrapper over this library so the router
//! can be driven end-to-end from integration tests.

pub mod cli;
pub mod http;
pub mod state;
