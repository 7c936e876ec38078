use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use tokio::net::TcpListener;

use crate::configuration::ServerConfig;
use crate::error::ServerError;
use crate::handlers::{self, AppState};
use crate::middleware::{log_requests, recover_panics, timeout, with_stats};
use crate::stats::StatsRepository;

pub struct Server {
    state: AppState,
}

impl Server {
    pub fn new(
        config: ServerConfig,
        stats: Arc<dyn StatsRepository + Send + Sync>,
    ) -> Result<Self, ServerError> {
        config.validate()?;
        Ok(Server {
            state: AppState {
                stats,
                config: Arc::new(config),
            },
        })
    }

    /// Routes wrapped in access log, panic recovery, timeout and stats middleware
    /// (outermost first). Extractors share the stats body limit.
    pub fn router(&self) -> Router {
        let state = self.state.clone();
        let body_limit = state.config.max_body_bytes;
        Router::new()
            .route("/", get(handlers::index))
            .route(
                "/fizzbuzz",
                get(handlers::get_fizzbuzz).post(handlers::post_fizzbuzz),
            )
            .route("/stats/all", get(handlers::stats_all))
            .route("/stats/mostused", get(handlers::stats_most_used))
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(from_fn_with_state(state.clone(), with_stats))
            .layer(from_fn_with_state(state.clone(), timeout))
            .layer(from_fn(recover_panics))
            .layer(from_fn(log_requests))
            .with_state(state)
    }

    /// Serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.state.config.listen.as_str()).await?;
        log::info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        log::info!("Server stopped");
        Ok(())
    }

    /// Serve until Ctrl-C.
    pub async fn run_forever(self) -> Result<(), ServerError> {
        self.run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}
