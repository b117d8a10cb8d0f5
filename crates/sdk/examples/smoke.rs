//! Smoke SDK Example
//!
//! Runs the logging smoke test against a running daemon.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package qlog-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package qlog-sdk --example smoke
//!    ```

use qlog_core::application::{run_smoke_test, SmokeScenario};
use qlog_sdk::QuestionLogClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = QuestionLogClient::connect("http://127.0.0.1:9631").await?;

    let outcome = run_smoke_test(&client, &SmokeScenario::default(), &mut std::io::stdout()).await?;

    if let Some(id) = outcome.question_id {
        let log = client.get(id.as_str()).await?;
        println!();
        println!("Stored log: {}", serde_json::to_string_pretty(&log)?);
    }

    Ok(())
}
