#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::Router;
use rig_relay::{router, RigOptions, RigOutputs, RigPipeline, RigService, Settings};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MODEL_PATH: &str = "/models/robot.glb";
pub const UPLOAD_PATH: &str = "/api/upload-rigged-model";
pub const PERSISTENT_URL: &str = "https://storage.example.com/rigged/robot_rigged.glb";

/// A pipeline that writes placeholder outputs instead of rigging anything.
///
/// Both output paths are always recorded; the files only exist on disk when
/// the matching flag is set.
#[derive(Clone)]
pub struct StubPipeline {
    pub out_dir: PathBuf,
    pub write_preview: bool,
    pub write_native: bool,
    pub failure: Option<String>,
    pub calls: Arc<Mutex<Vec<RigOptions>>>,
}

impl StubPipeline {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            write_preview: true,
            write_native: true,
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn preview(mut self, write: bool) -> Self {
        self.write_preview = write;
        self
    }

    pub fn native(mut self, write: bool) -> Self {
        self.write_native = write;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }
}

impl RigPipeline for StubPipeline {
    type Record = RigOutputs;

    fn run(&self, options: &RigOptions, record: &mut RigOutputs) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(options.clone());
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        anyhow::ensure!(options.input_path.is_file(), "input model missing");

        let stem = options
            .input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        let preview = self.out_dir.join(format!("{stem}_rigged.glb"));
        let native = self.out_dir.join(format!("{stem}_rigged.fbx"));

        if self.write_preview {
            std::fs::write(&preview, b"rigged glb")?;
        }
        if self.write_native {
            std::fs::write(&native, b"rigged fbx")?;
        }
        record.anim_vis_path = Some(preview);
        record.anim_path = Some(native);
        Ok(())
    }
}

/// Everything one relay test needs: a mock model host and upload backend,
/// scratch and output directories, and the reference animation file.
pub struct Harness {
    pub server: MockServer,
    pub scratch: TempDir,
    pub outputs: TempDir,
    pub animation_file: PathBuf,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let scratch = tempfile::tempdir().unwrap();
        let outputs = tempfile::tempdir().unwrap();
        let animation_file = outputs.path().join("Standard Run.fbx");
        std::fs::write(&animation_file, b"reference animation").unwrap();
        Self {
            server,
            scratch,
            outputs,
            animation_file,
        }
    }

    pub fn model_url(&self) -> String {
        format!("{}{}", self.server.uri(), MODEL_PATH)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            upload_url: format!("{}{}", self.server.uri(), UPLOAD_PATH),
            scratch_dir: self.scratch.path().to_path_buf(),
            animation_candidates: vec![self.animation_file.clone()],
            ..Settings::default()
        }
    }

    pub fn pipeline(&self) -> StubPipeline {
        StubPipeline::new(self.outputs.path())
    }

    pub fn app(&self, pipeline: StubPipeline) -> Router {
        self.app_with_settings(self.settings(), pipeline)
    }

    pub fn app_with_settings(&self, settings: Settings, pipeline: StubPipeline) -> Router {
        let service = RigService::new(settings, pipeline, RigOutputs::default).unwrap();
        router(Arc::new(service))
    }

    pub async fn mount_model(&self) {
        Mock::given(method("GET"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_bytes("source model bytes"))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_upload(&self, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(UPLOAD_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "persistentUrl": PERSISTENT_URL })),
            )
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }
}

/// Posts a JSON body to `uri` and returns the decoded JSON answer.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Value {
    post_raw(app, uri, serde_json::to_vec(&body).unwrap()).await
}

pub async fn post_raw(app: Router, uri: &str, body: Vec<u8>) -> Value {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
