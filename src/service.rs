use crate::client::RelayClient;
use crate::config::Settings;
use crate::error::RigError;
use crate::pipeline::{is_file, select_output, OutputKind, RigOptions, RigPipeline};
use crate::types::RigMode;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds a fresh result record for each pipeline run.
type RecordFactory<R> = Arc<dyn Fn() -> R + Send + Sync>;

/// The download, rig, select, upload sequence behind both endpoints.
///
/// The pipeline and the record factory are bound when the service is built
/// and never change afterwards.
pub struct RigService<P: RigPipeline> {
    client: RelayClient,
    pipeline: Arc<P>,
    new_record: RecordFactory<P::Record>,
    settings: Settings,
}

impl<P: RigPipeline> RigService<P> {
    /// Creates a service uploading to the endpoint named in `settings`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or the upload URL is invalid.
    pub fn new<F>(settings: Settings, pipeline: P, new_record: F) -> Result<Self, RigError>
    where
        F: Fn() -> P::Record + Send + Sync + 'static,
    {
        let client = RelayClient::new_with_url(&settings.upload_url, &settings.client_type)?;
        Ok(Self {
            client,
            pipeline: Arc::new(pipeline),
            new_record: Arc::new(new_record),
            settings,
        })
    }

    /// Rigs the model at `model_url` and returns the persistent URL of the result.
    pub async fn rig_from_url(&self, model_url: Option<String>) -> Result<String, RigError> {
        self.run(RigMode::Rig, model_url).await
    }

    /// Rigs the model at `model_url`, applies the reference animation, and
    /// returns the persistent URL of the result.
    pub async fn animate_from_url(&self, model_url: Option<String>) -> Result<String, RigError> {
        self.run(RigMode::Animate, model_url).await
    }

    /// Runs one request end to end.
    ///
    /// A missing URL fails before any network call. The downloaded model is
    /// left in the scratch directory whatever the outcome.
    pub async fn run(&self, mode: RigMode, model_url: Option<String>) -> Result<String, RigError> {
        let model_url = model_url
            .filter(|url| !url.is_empty())
            .ok_or(RigError::MissingModelUrl(mode))?;
        info!(%mode, url = %model_url, "processing model");

        let input_path = self
            .client
            .download_model(&model_url, &self.settings.scratch_dir)
            .await?;

        let animation_file = match mode {
            RigMode::Rig => None,
            RigMode::Animate => {
                let file = self.resolve_animation_file().await?;
                info!(path = %file.display(), "using animation file");
                Some(file)
            }
        };

        let options = RigOptions::new(input_path, model_url, animation_file);
        let record = self.run_pipeline(mode, options).await?;

        let output = select_output(&record)
            .await
            .ok_or(RigError::NoOutput(mode))?;
        match output.kind {
            OutputKind::Preview => info!(path = %output.path.display(), "using .glb output"),
            OutputKind::Native => warn!(
                path = %output.path.display(),
                "no .glb output found, uploading native output"
            ),
        }

        let persistent_url = self.client.upload_model(&output.path).await?;
        info!(%mode, url = %persistent_url, "model uploaded");
        Ok(persistent_url)
    }

    async fn run_pipeline(&self, mode: RigMode, options: RigOptions) -> Result<P::Record, RigError> {
        info!(%mode, input = %options.input_path.display(), "starting pipeline");
        let pipeline = Arc::clone(&self.pipeline);
        let mut record = (self.new_record)();

        tokio::task::spawn_blocking(move || {
            pipeline
                .run(&options, &mut record)
                .map(|()| record)
                .map_err(RigError::Pipeline)
        })
        .await?
    }

    /// The first configured animation candidate that exists, made absolute.
    async fn resolve_animation_file(&self) -> Result<PathBuf, RigError> {
        for candidate in &self.settings.animation_candidates {
            if is_file(candidate).await {
                return Ok(std::path::absolute(candidate)?);
            }
        }
        warn!(candidates = ?self.settings.animation_candidates, "default animation file not found");
        Err(RigError::AnimationFileMissing)
    }
}
