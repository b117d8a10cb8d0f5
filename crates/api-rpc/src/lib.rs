//! JSON-RPC API Layer
//!
//! Exposes the question log service as a JSON-RPC 2.0 server.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
