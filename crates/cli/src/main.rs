//! Question Log CLI - Command-line interface for the question log service

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use qlog_core::application::{run_smoke_test, LogService, SmokeScenario};
use qlog_core::domain::QuestionLog;
use qlog_core::port::id_provider::UuidProvider;
use qlog_core::port::time_provider::SystemTimeProvider;
use qlog_core::port::QuestionLogger;
use qlog_infra_sqlite::{create_pool, run_migrations, SqliteQuestionLogRepository};
use qlog_sdk::{QuestionLogClient, UpdateLogResponse};
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9631";

#[derive(Parser)]
#[command(name = "qlog")]
#[command(about = "Question log service CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, global = true, env = "QLOG_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a log, then update its models, response time and errors
    Smoke {
        #[arg(long, default_value = "test-conv-123")]
        conversation_id: String,

        #[arg(long, default_value = "test-user-456")]
        user_id: String,

        /// Model choice (repeatable, default: General)
        #[arg(long = "model")]
        models: Vec<String>,

        /// Error code (repeatable, default: "TestError: This is a test")
        #[arg(long = "error")]
        errors: Vec<String>,

        /// Run in-process against this SQLite database instead of the daemon
        #[arg(long)]
        db: Option<String>,
    },

    /// Create a question log
    Create {
        #[arg(short, long)]
        conversation_id: String,

        #[arg(short, long)]
        user_id: String,

        /// Model choice (repeatable)
        #[arg(short, long = "model")]
        models: Vec<String>,
    },

    /// Replace the model choices of a log
    Models {
        question_id: String,

        #[arg(required = true)]
        models: Vec<String>,
    },

    /// Record the response timestamp (default: now)
    Response {
        question_id: String,

        /// Epoch milliseconds
        #[arg(long)]
        at: Option<i64>,
    },

    /// Append error codes to a log
    Errors {
        question_id: String,

        #[arg(required = true)]
        errors: Vec<String>,
    },

    /// Record token counts
    Tokens {
        question_id: String,

        #[arg(long)]
        query: Option<i64>,

        #[arg(long)]
        response: Option<i64>,
    },

    /// Re-attribute a log to another user
    SetUser { question_id: String, user_id: String },

    /// Show one log
    Show { question_id: String },

    /// Logs for a conversation and user, newest first
    Query {
        conversation_id: String,
        user_id: String,

        #[arg(short = 'n', long)]
        limit: Option<i64>,
    },

    /// Recent logs for a conversation (any user)
    Recent {
        conversation_id: String,

        #[arg(short, long)]
        minutes: Option<i64>,
    },

    /// Show service status
    Status,
}

#[derive(Tabled)]
struct LogRow {
    id: String,
    conversation: String,
    user: String,
    submitted: String,
    responded: String,
    models: String,
    errors: String,
    tokens: String,
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn format_count(count: Option<i64>) -> String {
    count.map_or_else(|| "-".to_string(), |c| c.to_string())
}

impl From<QuestionLog> for LogRow {
    fn from(log: QuestionLog) -> Self {
        Self {
            id: log.id.into_inner(),
            conversation: log.conversation_id,
            user: log.user_id,
            submitted: format_millis(log.submit_timestamp),
            responded: log
                .response_timestamp
                .map_or_else(|| "-".to_string(), format_millis),
            models: log.model_choices.join(", "),
            errors: log.error_codes.join(", "),
            tokens: format!(
                "{}/{}",
                format_count(log.user_query_tokens),
                format_count(log.bot_response_tokens)
            ),
        }
    }
}

fn print_logs(logs: Vec<QuestionLog>) {
    if logs.is_empty() {
        println!("{}", "No logs found".yellow());
        return;
    }
    let rows: Vec<LogRow> = logs.into_iter().map(LogRow::from).collect();
    println!("{}", Table::new(rows));
}

fn print_update(what: &str, result: UpdateLogResponse) {
    if result.updated {
        println!(
            "{}",
            format!("✓ Updated {} of {}", what, result.question_id)
                .green()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!("○ {} not updated (unknown log or logging disabled)", result.question_id)
                .yellow()
        );
    }
}

async fn in_process_logger(db: &str) -> Result<LogService> {
    let pool = create_pool(db)
        .await
        .with_context(|| format!("Failed to open database {}", db))?;
    run_migrations(&pool).await.context("Migration failed")?;

    Ok(LogService::new(
        Arc::new(SqliteQuestionLogRepository::new(pool)),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    ))
}

async fn connect(rpc_url: &str) -> Result<QuestionLogClient> {
    QuestionLogClient::connect(rpc_url)
        .await
        .with_context(|| format!("Failed to connect to daemon at {}", rpc_url))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Smoke {
            conversation_id,
            user_id,
            models,
            errors,
            db,
        } => {
            let defaults = SmokeScenario::default();
            let scenario = SmokeScenario {
                conversation_id,
                user_id,
                models: if models.is_empty() { defaults.models } else { models },
                errors: if errors.is_empty() { defaults.errors } else { errors },
            };

            let logger: Box<dyn QuestionLogger> = match db {
                Some(db) => Box::new(in_process_logger(&db).await?),
                None => Box::new(connect(&cli.rpc_url).await?),
            };

            let mut out = std::io::stdout();
            run_smoke_test(logger.as_ref(), &scenario, &mut out)
                .await
                .context("Smoke test failed")?;
        }

        Commands::Create {
            conversation_id,
            user_id,
            models,
        } => {
            let client = connect(&cli.rpc_url).await?;
            let result = client
                .create(conversation_id, user_id, None, models)
                .await?;

            match result.question_id {
                Some(id) => println!("{} {}", "✓ Created log".green().bold(), id),
                None => println!("{}", "○ Logging disabled, nothing created".yellow()),
            }
        }

        Commands::Models {
            question_id,
            models,
        } => {
            let client = connect(&cli.rpc_url).await?;
            let result = client.update_models(&question_id, models).await?;
            print_update("models", result);
        }

        Commands::Response { question_id, at } => {
            let client = connect(&cli.rpc_url).await?;
            let result = client.update_response(&question_id, at).await?;
            print_update("response timestamp", result);
        }

        Commands::Errors {
            question_id,
            errors,
        } => {
            let client = connect(&cli.rpc_url).await?;
            let result = client.update_errors(&question_id, errors).await?;
            print_update("errors", result);
        }

        Commands::Tokens {
            question_id,
            query,
            response,
        } => {
            let client = connect(&cli.rpc_url).await?;
            let result = client.update_tokens(&question_id, query, response).await?;
            print_update("token counts", result);
        }

        Commands::SetUser {
            question_id,
            user_id,
        } => {
            let client = connect(&cli.rpc_url).await?;
            let result = client.update_user(&question_id, &user_id).await?;
            print_update("user", result);
        }

        Commands::Show { question_id } => {
            let client = connect(&cli.rpc_url).await?;
            let log = client.get(&question_id).await?;
            println!("{}", serde_json::to_string_pretty(&log)?);
        }

        Commands::Query {
            conversation_id,
            user_id,
            limit,
        } => {
            let client = connect(&cli.rpc_url).await?;
            let result = client.query(&conversation_id, &user_id, limit).await?;
            print_logs(result.logs);
        }

        Commands::Recent {
            conversation_id,
            minutes,
        } => {
            let client = connect(&cli.rpc_url).await?;
            let result = client.query_recent(&conversation_id, minutes).await?;
            print_logs(result.logs);
        }

        Commands::Status => {
            println!("{}", "Service Status".cyan().bold());
            println!();

            let stats = match connect(&cli.rpc_url).await {
                Ok(client) => client.stats().await.map_err(anyhow::Error::from),
                Err(e) => Err(e),
            };

            match stats {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    let logging = if stats.logging_enabled {
                        "enabled".green()
                    } else {
                        "disabled".yellow()
                    };
                    println!("  {} {}", "Logging:".bold(), logging);
                    println!("  {} {}", "Total Logs:".bold(), stats.total_logs);
                    println!("  {} {} seconds", "Uptime:".bold(), stats.uptime_seconds);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {:#}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
