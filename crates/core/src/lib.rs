// Question Log Core - Domain Logic, Ports & Smoke Driver
// NO infrastructure dependencies (hexagonal: adapters live in their own crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
