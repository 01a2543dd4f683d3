//! An HTTP relay that rigs 3D models fetched by URL.
//!
//! The relay accepts a model URL, downloads the model, hands it to a rigging
//! pipeline supplied by the host process, picks the output the pipeline left
//! on disk, and uploads it to a storage backend that returns a persistent URL.
//! The pipeline itself is not part of this crate.
//!
//! ## Features
//! - `POST /api/rig-from-url` and `POST /api/animate-from-url` endpoints.
//! - Streamed model downloads and multipart uploads.
//! - Pipeline and result record injected through [`RigPipeline`].
//! - Settings from the environment and `.env` files.
//! - Typed error handling, reported to callers as error payloads.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod types;

pub use client::{RelayClient, DEFAULT_CLIENT_TYPE, DEFAULT_UPLOAD_URL};
pub use config::Settings;
pub use error::RigError;
pub use pipeline::{
    select_output, OutputKind, RigOptions, RigOutputs, RigPipeline, RigRecord, SelectedOutput,
};
pub use server::{router, serve, start_server};
pub use service::RigService;
pub use types::{ModelUrlRequest, RigMode, RigResponse};
