use serde::{Deserialize, Serialize};
use std::fmt;

/// The body accepted by both relay endpoints.
#[derive(Deserialize, Debug, Default)]
pub struct ModelUrlRequest {
    /// The URL of the model to download. Required, but deserialized as
    /// optional so that its absence is reported as an error payload.
    pub url: Option<String>,
}

/// The payload returned by both relay endpoints.
///
/// Serialized with a `status` tag:
/// `{"status": "done", "persistentUrl": "..."}` or
/// `{"status": "error", "message": "..."}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RigResponse {
    /// The rigged model was uploaded.
    Done {
        /// The stable storage location returned by the upload backend.
        #[serde(rename = "persistentUrl")]
        persistent_url: String,
    },
    /// The request failed; `message` explains why.
    Error {
        /// A human-readable description of the failure.
        message: String,
    },
}

impl RigResponse {
    /// Builds an error payload from anything displayable.
    pub fn error(message: impl fmt::Display) -> Self {
        RigResponse::Error {
            message: message.to_string(),
        }
    }
}

/// Which of the two relay operations a request is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigMode {
    /// Rig only; no animation is applied.
    Rig,
    /// Rig and retarget the reference animation onto the model.
    Animate,
}

impl RigMode {
    pub(crate) fn title(self) -> &'static str {
        match self {
            RigMode::Rig => "Rigging",
            RigMode::Animate => "Animation",
        }
    }

    pub(crate) fn missing_url_message(self) -> &'static str {
        match self {
            RigMode::Rig => "Model URL is required",
            RigMode::Animate => "Model URL is required for animation",
        }
    }
}

impl fmt::Display for RigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RigMode::Rig => f.write_str("rig"),
            RigMode::Animate => f.write_str("animate"),
        }
    }
}

/// (Internal) The JSON answer of the upload backend.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct UploadResponse {
    #[serde(rename = "persistentUrl", default)]
    pub(crate) persistent_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn done_payload_uses_camel_case_url() {
        let payload = RigResponse::Done {
            persistent_url: "https://store.example/m.glb".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"status": "done", "persistentUrl": "https://store.example/m.glb"})
        );
    }

    #[test]
    fn error_payload_carries_message() {
        assert_eq!(
            serde_json::to_value(RigResponse::error("boom")).unwrap(),
            json!({"status": "error", "message": "boom"})
        );
    }

    #[test]
    fn request_without_url_deserializes() {
        let request: ModelUrlRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.url.is_none());
    }

    #[test]
    fn request_with_null_url_deserializes() {
        let request: ModelUrlRequest = serde_json::from_value(json!({"url": null})).unwrap();
        assert!(request.url.is_none());
    }
}
