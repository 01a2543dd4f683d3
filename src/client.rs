use crate::error::RigError;
use crate::types::UploadResponse;
use futures_util::StreamExt;
use reqwest::multipart;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{BytesCodec, FramedRead};
use tracing::{debug, error, info};
use url::Url;

/// The upload endpoint used when none is configured.
pub const DEFAULT_UPLOAD_URL: &str = "https://viverse-backend.onrender.com/api/upload-rigged-model";

/// The `clientType` form field sent with every upload when none is configured.
pub const DEFAULT_CLIENT_TYPE: &str = "playcanvas";

const FALLBACK_FILE_NAME: &str = "downloaded_model.bin";

/// The HTTP client for both ends of the relay: fetching source models and
/// pushing rigged models to the storage backend.
///
/// It holds the shared `reqwest::Client`, so it is cheap to clone and safe to
/// share across threads.
#[derive(Clone, Debug)]
pub struct RelayClient {
    client: reqwest::Client,
    upload_url: Url,
    client_type: String,
}

impl RelayClient {
    /// Creates a client that uploads to [`DEFAULT_UPLOAD_URL`].
    ///
    /// # Errors
    ///
    /// - `RigError::RequestFailed` if the internal HTTP client fails to build.
    pub fn new() -> Result<Self, RigError> {
        Self::new_with_url(DEFAULT_UPLOAD_URL, DEFAULT_CLIENT_TYPE)
    }

    /// Creates a client with a custom upload endpoint and client type.
    ///
    /// This is useful for testing or for pointing the relay at another backend.
    ///
    /// # Errors
    ///
    /// - `RigError::RequestFailed` if the internal HTTP client fails to build.
    /// - `RigError::UrlParseFailed` if `upload_url` is invalid.
    pub fn new_with_url(upload_url: &str, client_type: &str) -> Result<Self, RigError> {
        let client = reqwest::Client::builder().build()?;
        let upload_url = Url::parse(upload_url)?;

        Ok(Self {
            client,
            upload_url,
            client_type: client_type.to_string(),
        })
    }

    /// Streams the model at `model_url` into `dest_dir`.
    ///
    /// The file is named after the last path segment of the URL. Chunks are
    /// written to disk as they arrive, so large models never sit in memory.
    ///
    /// # Returns
    ///
    /// The `PathBuf` of the downloaded file.
    ///
    /// # Errors
    ///
    /// Fails if the URL is invalid, the host answers with a non-success status,
    /// the transfer breaks off, or the file cannot be written.
    pub async fn download_model<P: AsRef<Path>>(
        &self,
        model_url: &str,
        dest_dir: P,
    ) -> Result<PathBuf, RigError> {
        let parsed_url = Url::parse(model_url)?;
        let file_path = dest_dir.as_ref().join(file_name_from_url(&parsed_url));
        info!(url = %parsed_url, path = %file_path.display(), "downloading model");

        let response = self.client.get(parsed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RigError::DownloadFailed { status });
        }

        fs::create_dir_all(dest_dir.as_ref()).await?;

        let mut file = File::create(&file_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;

        debug!(path = %file_path.display(), "model downloaded");
        Ok(file_path)
    }

    /// Uploads a rigged model as a multipart form and returns its persistent URL.
    ///
    /// The file goes in the `modelFile` part, with its content type guessed
    /// from the extension, next to a `clientType` text field.
    ///
    /// # Errors
    ///
    /// - `RigError::UploadFailed` if the backend answers with anything but 200.
    /// - `RigError::MissingPersistentUrl` if the answer has no `persistentUrl`.
    pub async fn upload_model<P: AsRef<Path>>(&self, model_path: P) -> Result<String, RigError> {
        let model_path = model_path.as_ref();

        let file_name = model_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                RigError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Could not determine file name",
                ))
            })?
            .to_string();

        let mime_type = mime_guess::from_path(model_path)
            .first_or_octet_stream()
            .to_string();

        let file = File::open(model_path).await?;
        let stream = FramedRead::new(file, BytesCodec::new());
        let file_body = reqwest::Body::wrap_stream(stream);

        let file_part = multipart::Part::stream(file_body)
            .file_name(file_name)
            .mime_str(&mime_type)?;

        let form = multipart::Form::new()
            .text("clientType", self.client_type.clone())
            .part("modelFile", file_part);

        info!(path = %model_path.display(), url = %self.upload_url, mime = %mime_type, "uploading model");
        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "upload rejected");
            return Err(RigError::UploadFailed {
                status: status.as_u16(),
            });
        }

        let upload: UploadResponse = response.json().await.unwrap_or_default();
        match upload.persistent_url {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(RigError::MissingPersistentUrl),
        }
    }
}

/// Names a downloaded file after the URL's last path segment.
fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}
