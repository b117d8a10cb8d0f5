// Smoke-test driver
// Exercises the four collaborator operations in order and reports each step.

use crate::domain::QuestionId;
use crate::error::Result;
use crate::port::QuestionLogger;
use std::io::Write;
use tracing::debug;

pub const START_BANNER: &str = "Testing logging functionality...";
pub const MODELS_UPDATED: &str = "Updated model choices";
pub const RESPONSE_UPDATED: &str = "Updated response timestamp";
pub const ERRORS_UPDATED: &str = "Updated errors";
pub const COMPLETE_BANNER: &str = "Test complete";

/// Inputs for one smoke run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeScenario {
    pub conversation_id: String,
    pub user_id: String,
    pub models: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for SmokeScenario {
    fn default() -> Self {
        Self {
            conversation_id: "test-conv-123".to_string(),
            user_id: "test-user-456".to_string(),
            models: vec!["General".to_string()],
            errors: vec!["TestError: This is a test".to_string()],
        }
    }
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeOutcome {
    pub question_id: Option<QuestionId>,
    pub updates_sent: usize,
}

/// Run the smoke test against `logger`, writing progress lines to `out`
///
/// Calls are strictly sequential. The first failing call aborts the run and
/// its error is returned; nothing after it is printed.
pub async fn run_smoke_test(
    logger: &dyn QuestionLogger,
    scenario: &SmokeScenario,
    out: &mut dyn Write,
) -> Result<SmokeOutcome> {
    writeln!(out, "{}", START_BANNER)?;

    let question_id = logger
        .create_question_log(&scenario.conversation_id, &scenario.user_id)
        .await?
        .filter(|id| !id.is_empty());

    let mut updates_sent = 0;
    if let Some(id) = &question_id {
        writeln!(out, "Created log with ID: {}", id)?;

        logger.update_question_log_models(id, &scenario.models).await?;
        updates_sent += 1;
        writeln!(out, "{}", MODELS_UPDATED)?;

        logger.update_question_log_response(id).await?;
        updates_sent += 1;
        writeln!(out, "{}", RESPONSE_UPDATED)?;

        logger.update_question_log_errors(id, &scenario.errors).await?;
        updates_sent += 1;
        writeln!(out, "{}", ERRORS_UPDATED)?;
    } else {
        debug!("No question ID returned, skipping updates");
    }

    writeln!(out, "{}", COMPLETE_BANNER)?;
    out.flush()?;

    Ok(SmokeOutcome {
        question_id,
        updates_sent,
    })
}
