// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file persistence.

use std::path::{Path, PathBuf};

use pagewerk_core::AppConfig;
use pagewerk_core::error::{PagewerkError, Result};

use super::data_dir::config_dir;

const CONFIG_FILE: &str = "config.json";

/// Default location of the settings file.
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Load settings from `path`.
///
/// A missing file is `Ok(None)`; an unreadable or invalid file is an error so
/// the caller can warn before falling back to defaults.
pub fn load_config(path: &Path) -> Result<Option<AppConfig>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(PagewerkError::io(path, err)),
    };
    AppConfig::from_json(&data).map(Some)
}

/// Write settings to `path`, creating its directory if needed.
pub fn persist_config(path: &Path, config: &AppConfig) -> Result<()> {
    config.validate()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| PagewerkError::io(parent, err))?;
    }
    let json = config.to_json()?;
    std::fs::write(path, json).map_err(|err| PagewerkError::io(path, err))?;
    Ok(())
}
