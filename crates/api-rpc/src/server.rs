//! JSON-RPC Server
//!
//! Serves the question log API over HTTP (TCP, localhost by default).

use crate::handler::RpcHandler;
use crate::rate_limiter::RateLimiter;
use crate::types::{
    CreateLogRequest, GetLogRequest, QueryLogsRequest, QueryRecentRequest, UpdateErrorsRequest,
    UpdateModelsRequest, UpdateResponseRequest, UpdateTokensRequest, UpdateUserRequest,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use qlog_core::application::LogService;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9631;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 200;
pub const DEFAULT_RATE_LIMIT_RATE: u32 = 100;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 picks a free port (see `RpcServer::start` return value)
    pub port: u16,
    pub rate_limit_burst: u32,
    pub rate_limit_per_sec: u32,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            rate_limit_per_sec: DEFAULT_RATE_LIMIT_RATE,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<LogService>) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_burst, config.rate_limit_per_sec);
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service, rate_limiter)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address and a handle used to stop the server.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());

        // Write methods
        let handler = self.handler.clone();
        module
            .register_async_method("log.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateLogRequest = params.parse()?;
                    handler.create(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("log.update_models.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateModelsRequest = params.parse()?;
                    handler.update_models(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("log.update_response.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateResponseRequest = params.parse()?;
                    handler.update_response(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("log.update_errors.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateErrorsRequest = params.parse()?;
                    handler.update_errors(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("log.update_tokens.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateTokensRequest = params.parse()?;
                    handler.update_tokens(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("log.update_user.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateUserRequest = params.parse()?;
                    handler.update_user(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Read methods
        let handler = self.handler.clone();
        module
            .register_async_method("log.get.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: GetLogRequest = params.parse()?;
                    handler.get(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("log.query.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueryLogsRequest = params.parse()?;
                    handler.query(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("log.query_recent.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueryRecentRequest = params.parse()?;
                    handler.query_recent(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Admin APIs
        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| e.to_string())?;

        info!(addr = %local_addr, "JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}
