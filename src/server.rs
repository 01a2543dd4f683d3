//! HTTP surface of the relay.
//!
//! Both endpoints always answer `200 OK`; the `status` field of the
//! [`RigResponse`] carries the outcome.

use crate::config::Settings;
use crate::error::RigError;
use crate::pipeline::RigPipeline;
use crate::service::RigService;
use crate::types::{ModelUrlRequest, RigMode, RigResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use std::thread;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Builds the router exposing `/api/rig-from-url` and `/api/animate-from-url`.
pub fn router<P: RigPipeline>(service: Arc<RigService<P>>) -> Router {
    Router::new()
        .route("/api/rig-from-url", post(rig_from_url::<P>))
        .route("/api/animate-from-url", post(animate_from_url::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serves the relay on an already bound listener until the process exits.
pub async fn serve<P: RigPipeline>(
    listener: TcpListener,
    service: Arc<RigService<P>>,
) -> Result<(), RigError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "rig relay listening");
    }
    axum::serve(listener, router(service)).await?;
    Ok(())
}

/// Starts the relay on a background thread with its own tokio runtime.
///
/// The pipeline and record factory are bound into the service before the
/// thread starts, so configuration errors surface here. The server has no
/// shutdown path; it lives as long as the host process.
///
/// # Example
///
/// ```no_run
/// # use rig_relay::{start_server, RigOptions, RigOutputs, RigPipeline, Settings};
/// struct Noop;
///
/// impl RigPipeline for Noop {
///     type Record = RigOutputs;
///
///     fn run(&self, _options: &RigOptions, _record: &mut RigOutputs) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let handle = start_server(Settings::from_env()?, Noop, RigOutputs::default)?;
/// # let _ = handle;
/// # Ok(())
/// # }
/// ```
pub fn start_server<P, F>(
    settings: Settings,
    pipeline: P,
    new_record: F,
) -> Result<thread::JoinHandle<Result<(), RigError>>, RigError>
where
    P: RigPipeline,
    F: Fn() -> P::Record + Send + Sync + 'static,
{
    let bind_addr = settings.bind_addr();
    let service = Arc::new(RigService::new(settings, pipeline, new_record)?);

    let handle = thread::Builder::new()
        .name("rig-relay-api".to_string())
        .spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(async move {
                let listener = TcpListener::bind(&bind_addr).await?;
                serve(listener, service).await
            })
        })?;

    info!("started rig relay server thread");
    Ok(handle)
}

async fn rig_from_url<P: RigPipeline>(
    State(service): State<Arc<RigService<P>>>,
    payload: Result<Json<ModelUrlRequest>, JsonRejection>,
) -> Json<RigResponse> {
    Json(respond(&service, RigMode::Rig, payload).await)
}

async fn animate_from_url<P: RigPipeline>(
    State(service): State<Arc<RigService<P>>>,
    payload: Result<Json<ModelUrlRequest>, JsonRejection>,
) -> Json<RigResponse> {
    Json(respond(&service, RigMode::Animate, payload).await)
}

async fn respond<P: RigPipeline>(
    service: &RigService<P>,
    mode: RigMode,
    payload: Result<Json<ModelUrlRequest>, JsonRejection>,
) -> RigResponse {
    let outcome = match payload {
        Ok(Json(request)) => service.run(mode, request.url).await,
        Err(rejection) => Err(RigError::InvalidRequest(rejection.body_text())),
    };

    match outcome {
        Ok(persistent_url) => RigResponse::Done { persistent_url },
        Err(err) => {
            error!(%mode, error = %err, "request failed");
            RigResponse::error(err)
        }
    }
}
