//! Media upload and transcoding types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upload slot for raw audio awaiting transcoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeUpload {
    pub upload_id: String,
    /// Pre-signed URL; absent when identical audio was already uploaded
    #[serde(default)]
    pub upload_url: Option<String>,
}

/// `GET /media/transcode/audio/uploadUrl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeUploadUrl {
    pub upload: TranscodeUpload,
}

/// `GET /media/upload/{id}/transcoded`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodedAudio {
    pub upload_id: String,
    /// Content hash identifying the playable result; absent while transcoding
    #[serde(default)]
    pub transcoded_sha256: Option<String>,
    #[serde(default)]
    pub transcoded_info: Option<Value>,
}

impl TranscodedAudio {
    /// Whether transcoding has produced a playable file.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.transcoded_sha256.is_some()
    }

    /// `transcoded:<sha256>` track URL for use in card content.
    #[must_use]
    pub fn track_url(&self) -> Option<String> {
        self.transcoded_sha256.as_ref().map(|sha| format!("transcoded:{sha}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub media_id: String,
    pub media_url: String,
}

/// `POST /media/coverImage/user/me/upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImageUpload {
    pub cover_image: CoverImage,
}
