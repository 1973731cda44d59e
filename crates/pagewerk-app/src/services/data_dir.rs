// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration directory resolution.

use std::path::PathBuf;

/// Return the application configuration directory.
///
/// The directory is not created here; writers create it on demand.
pub fn config_dir() -> PathBuf {
    config_base().join("pagewerk")
}

fn config_base() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    std::env::temp_dir()
}
