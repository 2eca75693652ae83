use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    api, config,
    error::{OrpheusError, Result},
    types::PkceToken,
};

pub fn router(state: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the OAuth callback on `SERVER_ADDRESS` until the task is aborted.
pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>) -> Result<()> {
    let addr = SocketAddr::from_str(&config::server_addr()?)
        .map_err(|e| OrpheusError::Config(format!("invalid SERVER_ADDRESS: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
