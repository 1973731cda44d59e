// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PagewerkError, Result};

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upper bound on documents transformed at the same time.
    /// `None` runs one task per submitted document.
    pub max_concurrency: Option<usize>,
    /// Skip inputs whose extension is not `.pdf`.
    pub require_pdf_extension: bool,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            require_pdf_extension: false,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == Some(0) {
            return Err(PagewerkError::Config(
                "max_concurrency must be at least 1".into(),
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(PagewerkError::Config("log_filter must not be empty".into()));
        }
        Ok(())
    }
}
