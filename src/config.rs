//! Dispatcher configuration, loaded from a JSON file.

use crate::error::ConfigError;
use crate::window::WindowUnit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_API_PATH: &str = "/api/query";

/// How a community's risk entries are exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskField {
    /// `risks`: a structure of dated entries, newest first
    #[default]
    Risks,
    /// `risk`: a single plain field
    Risk,
}

/// Long-form text field on a community detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryField {
    #[default]
    History,
    Info,
}

impl HistoryField {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryField::History => "history",
            HistoryField::Info => "info",
        }
    }
}

/// Differences between product iterations of the same views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductProfile {
    pub risk_field: RiskField,
    /// How many risk entries the community list shows
    pub recent_risk_limit: usize,
    pub alert_unit: WindowUnit,
    pub alternative_title: bool,
    pub history_field: HistoryField,
    /// `population`, `yearEstablished`, `mainThreat` and `isBedouin`
    pub extended_facts: bool,
    /// Adds `caption` and `copyright` to each image
    pub image_metadata: bool,
}

impl Default for ProductProfile {
    fn default() -> Self {
        Self {
            risk_field: RiskField::Risks,
            recent_risk_limit: 3,
            alert_unit: WindowUnit::Months,
            alternative_title: false,
            history_field: HistoryField::History,
            extended_facts: false,
            image_metadata: false,
        }
    }
}

/// Where to send queries and which product profile to compose them for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DispatcherConfig {
    /// Origin of the content repository, e.g. `http://localhost:8080`
    pub base_url: String,
    pub api_path: String,
    pub profile: ProductProfile,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            profile: ProductProfile::default(),
        }
    }
}

impl DispatcherConfig {
    /// Load the configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let display = path_ref.display().to_string();

        if !path_ref.exists() {
            return Err(ConfigError::NotFound(display));
        }

        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: display,
            source,
        })
    }

    /// Load from `path`, falling back to defaults when the file is unusable
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "using default dispatcher config");
                Self::default()
            }
        }
    }

    /// Full URL of the query endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.api_path)
    }
}
