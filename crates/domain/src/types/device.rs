//! Device types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub device_family: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /device-v2/devices/mine`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// `GET /device-v2/{id}/status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub device_id: String,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub battery_level_percentage: Option<u8>,
    #[serde(default)]
    pub is_charging: Option<bool>,
    #[serde(default)]
    pub user_volume_percentage: Option<u8>,
    #[serde(default)]
    pub wifi_strength: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Settings block of a device configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_volume_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night_light_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_face: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET|PUT /device-v2/{id}/config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub config: DeviceSettings,
}
