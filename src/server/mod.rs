pub mod api;

use log::{ info, error };
use std::error::Error;

pub use api::{ router, AppState };

pub struct Server {
    addr: String,
    state: AppState,
}

impl Server {
    pub fn new(addr: String, state: AppState) -> Self {
        Self { addr, state }
    }

    pub async fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", self.addr, e);
            e
        })?;
        info!("HTTP server listening on: http://{}", self.addr);

        axum::serve(listener, router(self.state).into_make_service())
            .with_graceful_shutdown(shutdown_signal()).await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
