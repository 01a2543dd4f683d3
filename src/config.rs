//! Runtime settings, read from the environment.

use crate::client::{DEFAULT_CLIENT_TYPE, DEFAULT_UPLOAD_URL};
use crate::error::RigError;
use std::env;
use std::path::PathBuf;

const HOST_ENV: &str = "RIG_RELAY_HOST";
const PORT_ENV: &str = "RIG_RELAY_PORT";
const UPLOAD_URL_ENV: &str = "RIG_RELAY_UPLOAD_URL";
const CLIENT_TYPE_ENV: &str = "RIG_RELAY_CLIENT_TYPE";
const SCRATCH_DIR_ENV: &str = "RIG_RELAY_SCRATCH_DIR";
const ANIMATION_FILE_ENV: &str = "RIG_RELAY_ANIMATION_FILE";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const ANIMATION_FILE_NAME: &str = "Standard Run.fbx";

/// Everything the relay needs to know about its surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub upload_url: String,
    pub client_type: String,
    /// Where downloaded source models are written. Files are not cleaned up.
    pub scratch_dir: PathBuf,
    /// Reference animation locations for the animate endpoint, tried in order.
    pub animation_candidates: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            client_type: DEFAULT_CLIENT_TYPE.to_string(),
            scratch_dir: env::temp_dir(),
            animation_candidates: default_animation_candidates(),
        }
    }
}

impl Settings {
    /// Loads settings from the environment, after reading a `.env` file if
    /// one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// - `RigError::InvalidConfig` if the port is not a valid `u16`.
    /// - `RigError::UrlParseFailed` if the upload URL is invalid.
    pub fn from_env() -> Result<Self, RigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RigError> {
        let mut settings = Settings::default();

        if let Some(host) = lookup(HOST_ENV) {
            settings.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            settings.port = port
                .parse()
                .map_err(|_| RigError::InvalidConfig(format!("{PORT_ENV}={port} is not a port")))?;
        }
        if let Some(upload_url) = lookup(UPLOAD_URL_ENV) {
            url::Url::parse(&upload_url)?;
            settings.upload_url = upload_url;
        }
        if let Some(client_type) = lookup(CLIENT_TYPE_ENV) {
            settings.client_type = client_type;
        }
        if let Some(dir) = lookup(SCRATCH_DIR_ENV) {
            settings.scratch_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup(ANIMATION_FILE_ENV) {
            settings.animation_candidates = vec![PathBuf::from(file)];
        }

        Ok(settings)
    }

    /// The `host:port` string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `data/Standard Run.fbx` next to the install root (one level above the
/// executable's directory), then relative to the working directory.
fn default_animation_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(root) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(|dir| dir.parent()).map(PathBuf::from))
    {
        candidates.push(root.join("data").join(ANIMATION_FILE_NAME));
    }
    candidates.push(PathBuf::from("data").join(ANIMATION_FILE_NAME));
    candidates
}
