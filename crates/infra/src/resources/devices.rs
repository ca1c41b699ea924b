use deviceplat_domain::{DeviceConfig, DeviceList, DeviceStatus, Result};
use tracing::instrument;

use super::segment;
use crate::api::ApiClient;

/// Devices linked to the authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct DevicesApi<'a> {
    api: &'a ApiClient,
}

impl<'a> DevicesApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// `GET /device-v2/devices/mine`
    #[instrument(skip(self))]
    pub async fn list_mine(&self) -> Result<DeviceList> {
        self.api.get("/device-v2/devices/mine").await
    }

    /// `GET /device-v2/{id}/status`
    #[instrument(skip(self))]
    pub async fn status(&self, device_id: &str) -> Result<DeviceStatus> {
        self.api.get(&format!("/device-v2/{}/status", segment(device_id))).await
    }

    /// `GET /device-v2/{id}/config`
    #[instrument(skip(self))]
    pub async fn config(&self, device_id: &str) -> Result<DeviceConfig> {
        self.api.get(&format!("/device-v2/{}/config", segment(device_id))).await
    }

    /// `PUT /device-v2/{id}/config`
    #[instrument(skip(self, config))]
    pub async fn update_config(&self, device_id: &str, config: &DeviceConfig) -> Result<DeviceConfig> {
        self.api.put(&format!("/device-v2/{}/config", segment(device_id)), config).await
    }
}
