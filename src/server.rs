//! HTTP front end serving the virtual dataset at the paths an N5 client expects
//!
//! - `GET /attributes.json`
//! - `GET /s{scale}/attributes.json`
//! - `GET /s{scale}/{cx}/{cy}/{cz}/{channel_group}`

use crate::config::ServerConfig;
use crate::error::N5Error;
use crate::resolve::ChunkRequest;
use crate::utils::parse_scale_dir;
use crate::volume::VirtualVolume;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::task::{self, JoinError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    volume: Arc<VirtualVolume>,
}

/// Failure of a single request
#[derive(Debug)]
pub enum ApiError {
    Volume(N5Error),
    Task(JoinError),
}

impl From<N5Error> for ApiError {
    fn from(err: N5Error) -> Self {
        ApiError::Volume(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Task(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Volume(N5Error::InvalidScale { .. } | N5Error::InvalidPath(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Volume(N5Error::InvalidChannelGroup(_)) => StatusCode::BAD_REQUEST,
            ApiError::Volume(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Volume(err) => err.to_string(),
            ApiError::Task(err) => format!("chunk generation failed: {}", err),
        };

        if status.is_server_error() {
            error!(%status, "{}", message);
        } else {
            warn!(%status, "{}", message);
        }

        (status, message).into_response()
    }
}

/// Build the router for `volume`
pub fn router(volume: Arc<VirtualVolume>) -> Router {
    Router::new()
        .route("/attributes.json", get(top_level_attributes))
        .route("/:scale_dir/attributes.json", get(scale_attributes))
        .route(
            "/:scale_dir/:chunk_x/:chunk_y/:chunk_z/:channel_group",
            get(chunk),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { volume })
}

async fn top_level_attributes(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.volume.top_level_attributes())
}

async fn scale_attributes(
    State(state): State<AppState>,
    Path(scale_dir): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let scale = parse_scale_dir(&scale_dir)?;
    Ok(Json(state.volume.scale_attributes(scale)?))
}

async fn chunk(
    State(state): State<AppState>,
    Path((scale_dir, chunk_x, chunk_y, chunk_z, channel_group)): Path<(
        String,
        usize,
        usize,
        usize,
        u64,
    )>,
) -> Result<Response, ApiError> {
    let scale = parse_scale_dir(&scale_dir)?;
    let request = ChunkRequest::new(scale, [chunk_x, chunk_y, chunk_z], channel_group);

    // Generation is CPU bound, keep it off the async workers
    let volume = Arc::clone(&state.volume);
    let encoded = task::spawn_blocking(move || volume.read_chunk(&request)).await??;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        encoded,
    )
        .into_response())
}

/// Bind to the configured address and serve until interrupted
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let volume = Arc::new(VirtualVolume::new(&config.dataset)?);
    info!("{}", volume.stats().summary());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("serving virtual N5 at http://{}", listener.local_addr()?);

    axum::serve(listener, router(volume))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {}", err);
    }
}
