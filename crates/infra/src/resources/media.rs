use deviceplat_domain::{CoverImageUpload, Result, TranscodeUploadUrl, TranscodedAudio};
use reqwest::Method;
use tracing::instrument;

use super::segment;
use crate::api::{ApiClient, RequestOptions};

/// Audio transcoding and cover image uploads.
#[derive(Debug, Clone, Copy)]
pub struct MediaApi<'a> {
    api: &'a ApiClient,
}

impl<'a> MediaApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `GET /media/transcode/audio/uploadUrl`
    ///
    /// `sha256` lets the platform skip uploads of audio it already has; the
    /// returned `upload_url` is then absent.
    #[instrument(skip(self))]
    pub async fn transcode_upload_url(
        &self,
        sha256: Option<&str>,
        filename: Option<&str>,
    ) -> Result<TranscodeUploadUrl> {
        let options =
            RequestOptions::new().query_opt("sha256", sha256).query_opt("filename", filename);
        self.api.request("/media/transcode/audio/uploadUrl", options).await
    }

    /// `GET /media/upload/{id}/transcoded`
    #[instrument(skip(self))]
    pub async fn transcoded(&self, upload_id: &str) -> Result<TranscodedAudio> {
        self.api.get(&format!("/media/upload/{}/transcoded", segment(upload_id))).await
    }

    /// `POST /media/coverImage/user/me/upload` with the raw image bytes.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_cover_image(
        &self,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<CoverImageUpload> {
        let options = RequestOptions::new().method(Method::POST).binary(bytes, content_type);
        self.api.request("/media/coverImage/user/me/upload", options).await
    }
}
