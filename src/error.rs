use crate::types::RigMode;

/// Represents the possible errors that can occur while relaying a model.
///
/// Every variant ends up as the `message` of an error payload, so the display
/// text is written for the API caller.
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    /// The request carried no model URL (or an empty one).
    #[error("{}", .0.missing_url_message())]
    MissingModelUrl(RigMode),
    /// The request body could not be read as a model URL request.
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),
    /// The model URL or the upload URL could not be parsed.
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    /// The model host answered the download with a non-success status.
    #[error("Failed to download model: status {status}")]
    DownloadFailed { status: reqwest::StatusCode },
    /// A network request failed before a response was available.
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// Reading or writing a local file failed.
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// None of the reference animation candidates exist.
    #[error("Default animation file not found")]
    AnimationFileMissing,
    /// The injected pipeline reported a failure.
    #[error("{0:#}")]
    Pipeline(anyhow::Error),
    /// The blocking pipeline task panicked or was cancelled.
    #[error("Pipeline task failed: {0}")]
    PipelineTask(#[from] tokio::task::JoinError),
    /// The pipeline finished without leaving an output file on disk.
    #[error("{} failed: output file not found", .0.title())]
    NoOutput(RigMode),
    /// The upload backend answered with a status other than 200.
    #[error("Upload failed with status code {status}")]
    UploadFailed { status: u16 },
    /// The upload backend accepted the file but returned no persistent URL.
    #[error("No persistent URL returned from upload backend")]
    MissingPersistentUrl,
    /// A configuration value could not be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
