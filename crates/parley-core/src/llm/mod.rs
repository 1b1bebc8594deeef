//! Completion gateway abstractions for Parley.
//!
//! - `CompletionGateway`: RPITIT trait for concrete gateway implementations
//! - `BoxCompletionGateway`: object-safe wrapper for dynamic dispatch

pub mod box_gateway;
pub mod gateway;
