//! Client meta information sent alongside encrypted customer input.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Identifier reported in `sdkIdentifier`.
pub const SDK_IDENTIFIER: &str = concat!("RustClientSDK/v", env!("CARGO_PKG_VERSION"));

/// Describes the device and application a payment is made from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetaInfo {
    #[serde(default = "default_platform")]
    pub platform_identifier: String,
    #[serde(default = "default_app_identifier")]
    pub app_identifier: String,
    #[serde(default = "default_sdk_identifier")]
    pub sdk_identifier: String,
    #[serde(default = "default_sdk_creator")]
    pub sdk_creator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

fn default_platform() -> String {
    format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
}

pub(crate) fn default_app_identifier() -> String {
    "UNKNOWN".to_string()
}

fn default_sdk_identifier() -> String {
    SDK_IDENTIFIER.to_string()
}

fn default_sdk_creator() -> String {
    "cardkit".to_string()
}

impl Default for ClientMetaInfo {
    fn default() -> Self {
        Self {
            platform_identifier: default_platform(),
            app_identifier: default_app_identifier(),
            sdk_identifier: default_sdk_identifier(),
            sdk_creator: default_sdk_creator(),
            screen_size: None,
            device_brand: None,
            device_type: None,
        }
    }
}

impl ClientMetaInfo {
    pub fn new(app_identifier: impl Into<String>) -> Self {
        Self {
            app_identifier: app_identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen_size = Some(format!("{width}x{height}"));
        self
    }

    pub fn with_device(mut self, brand: impl Into<String>, device_type: impl Into<String>) -> Self {
        self.device_brand = Some(brand.into());
        self.device_type = Some(device_type.into());
        self
    }

    /// Base64 of the JSON form, as the platform expects it.
    pub fn encode(&self) -> Result<String> {
        Ok(STANDARD.encode(serde_json::to_vec(self)?))
    }
}
