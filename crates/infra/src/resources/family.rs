use deviceplat_domain::{FamilyGroup, FamilyImageList, FamilyImageUpload, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use super::segment;
use crate::api::{ApiClient, RequestOptions};

/// Family images and library groups.
#[derive(Debug, Clone, Copy)]
pub struct FamilyApi<'a> {
    api: &'a ApiClient,
}

impl<'a> FamilyApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `GET /media/family/images`
    #[instrument(skip(self))]
    pub async fn list_images(&self) -> Result<FamilyImageList> {
        self.api.get("/media/family/images").await
    }

    /// `POST /media/family/images` with the raw image bytes.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<FamilyImageUpload> {
        let options = RequestOptions::new().method(Method::POST).binary(bytes, content_type);
        self.api.request("/media/family/images", options).await
    }

    /// `GET /card/family/library/groups`
    #[instrument(skip(self))]
    pub async fn list_groups(&self) -> Result<Vec<FamilyGroup>> {
        self.api.get("/card/family/library/groups").await
    }

    /// `DELETE /card/family/library/groups/{id}`
    #[instrument(skip(self))]
    pub async fn delete_group(&self, group_id: &str) -> Result<()> {
        let _: Option<Value> =
            self.api.delete(&format!("/card/family/library/groups/{}", segment(group_id))).await?;
        Ok(())
    }
}
