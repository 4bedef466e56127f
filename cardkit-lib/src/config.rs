//! Client session configuration.
//!
//! # Environment Variables
//!
//! [`SessionConfig::from_env`] reads:
//!
//! ```bash
//! export CARDKIT_CLIENT_SESSION_ID=4e7a0d3a...
//! export CARDKIT_CUSTOMER_ID=1234-5f7d3c4e...
//! export CARDKIT_CLIENT_API_URL=https://clientapi.example.com
//! export CARDKIT_ASSET_URL=https://assets.example.com      # optional
//! export CARDKIT_APP_IDENTIFIER=shop-app/2.1               # optional
//! export CARDKIT_TIMEOUT_SECS=20                           # optional
//! export CARDKIT_LOCALE=nl_NL                              # optional
//! ```

use serde::{Deserialize, Serialize};

use crate::meta::{default_app_identifier, ClientMetaInfo};
use crate::{CardkitError, Result};

/// Settings of one client session, as handed out by the merchant server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Session id created server-side for this checkout.
    pub client_session_id: String,

    /// Customer id the session belongs to.
    pub customer_id: String,

    /// Base URL of the client API (e.g., "https://clientapi.example.com").
    pub client_api_url: String,

    /// Base URL for logos and other assets.
    #[serde(default)]
    pub asset_url: Option<String>,

    /// Application name reported in the client meta info.
    #[serde(default = "default_app_identifier")]
    pub app_identifier: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Locale for product labels.
    #[serde(default)]
    pub locale: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl SessionConfig {
    pub fn new(
        client_session_id: impl Into<String>,
        customer_id: impl Into<String>,
        client_api_url: impl Into<String>,
    ) -> Self {
        Self {
            client_session_id: client_session_id.into(),
            customer_id: customer_id.into(),
            client_api_url: client_api_url.into(),
            asset_url: None,
            app_identifier: default_app_identifier(),
            timeout_secs: default_timeout(),
            locale: None,
        }
    }

    pub fn with_asset_url(mut self, url: impl Into<String>) -> Self {
        self.asset_url = Some(url.into());
        self
    }

    pub fn with_app_identifier(mut self, app_identifier: impl Into<String>) -> Self {
        self.app_identifier = app_identifier.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Load from `CARDKIT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CardkitError::Config(format!("{name} is not set")))
        };

        let mut config = Self::new(
            required("CARDKIT_CLIENT_SESSION_ID")?,
            required("CARDKIT_CUSTOMER_ID")?,
            required("CARDKIT_CLIENT_API_URL")?,
        );

        if let Some(url) = lookup("CARDKIT_ASSET_URL") {
            config = config.with_asset_url(url);
        }
        if let Some(app) = lookup("CARDKIT_APP_IDENTIFIER") {
            config = config.with_app_identifier(app);
        }
        if let Some(timeout) = lookup("CARDKIT_TIMEOUT_SECS") {
            let secs = timeout.parse::<u64>().map_err(|e| {
                CardkitError::Config(format!("CARDKIT_TIMEOUT_SECS={timeout}: {e}"))
            })?;
            config = config.with_timeout(secs);
        }
        if let Some(locale) = lookup("CARDKIT_LOCALE") {
            config = config.with_locale(locale);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can be used for requests.
    pub fn validate(&self) -> Result<()> {
        if self.client_session_id.is_empty() {
            return Err(CardkitError::Config("client session id is empty".into()));
        }
        if self.customer_id.is_empty() {
            return Err(CardkitError::Config("customer id is empty".into()));
        }
        if !(self.client_api_url.starts_with("https://")
            || self.client_api_url.starts_with("http://"))
        {
            return Err(CardkitError::Config(format!(
                "client API URL must be http(s): {}",
                self.client_api_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CardkitError::Config("timeout must be positive".into()));
        }
        Ok(())
    }

    /// Base URL of this customer's client API endpoints.
    pub fn base_url(&self) -> String {
        format!(
            "{}/client/v1/{}",
            self.client_api_url.trim_end_matches('/'),
            self.customer_id
        )
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("GCS v1Client:{}", self.client_session_id)
    }

    /// Client meta info describing this application.
    pub fn client_meta_info(&self) -> ClientMetaInfo {
        ClientMetaInfo::new(self.app_identifier.clone())
    }
}
