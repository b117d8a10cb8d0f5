//! Question Log SDK - Rust Client Library
//!
//! Client for the question log daemon. `QuestionLogClient` also implements
//! the `QuestionLogger` port, so the smoke driver can run against a live
//! server.
//!
//! # Example
//!
//! ```no_run
//! use qlog_sdk::QuestionLogClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QuestionLogClient::connect("http://127.0.0.1:9631").await?;
//!
//!     let created = client.create("conv-1", "user-1", None, vec![]).await?;
//!     if let Some(id) = created.question_id {
//!         client.update_errors(&id, vec!["Timeout".to_string()]).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::QuestionLogClient;
pub use error::{Result, SdkError};
pub use types::{
    CreateLogRequest, CreateLogResponse, QueryLogsResponse, StatsResponse, UpdateLogResponse,
};
