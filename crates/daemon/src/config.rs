//! Daemon configuration (environment variables)

use qlog_api_rpc::server::{
    RpcServerConfig, DEFAULT_RATE_LIMIT_BURST, DEFAULT_RATE_LIMIT_RATE, DEFAULT_RPC_HOST,
    DEFAULT_RPC_PORT,
};
use qlog_core::error::{AppError, Result};
use std::str::FromStr;

pub const DEFAULT_DB_PATH: &str = "~/.qlog/logs.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: String,
    pub logging_enabled: bool,
    pub rpc: RpcServerConfig,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    /// Load from `QLOG_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("QLOG_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = shellexpand::tilde(&db_path).into_owned();

        let logging_enabled = match lookup("QLOG_LOGGING_ENABLED") {
            Some(raw) => parse_bool("QLOG_LOGGING_ENABLED", &raw)?,
            None => true,
        };

        let rpc = RpcServerConfig {
            host: lookup("QLOG_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            port: parse_or("QLOG_RPC_PORT", lookup("QLOG_RPC_PORT"), DEFAULT_RPC_PORT)?,
            rate_limit_burst: parse_or(
                "QLOG_RATE_LIMIT_BURST",
                lookup("QLOG_RATE_LIMIT_BURST"),
                DEFAULT_RATE_LIMIT_BURST,
            )?,
            rate_limit_per_sec: parse_or(
                "QLOG_RATE_LIMIT_RATE",
                lookup("QLOG_RATE_LIMIT_RATE"),
                DEFAULT_RATE_LIMIT_RATE,
            )?,
        };

        let log_format = match lookup("QLOG_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            db_path,
            logging_enabled,
            rpc,
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{} has invalid value '{}'",
            key, raw
        ))),
    }
}
