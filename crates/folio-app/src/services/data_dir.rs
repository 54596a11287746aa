// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware settings directory resolution.

use std::env;
use std::path::PathBuf;

/// Return the application config directory. Nothing is created here;
/// the directory appears the first time settings are saved.
pub fn config_dir() -> PathBuf {
    resolve(
        env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    // Try XDG config dir, then fallback to home
    let base = xdg_config_home
        .or_else(|| home.map(|h| h.join(".config")))
        // Last resort
        .unwrap_or_else(env::temp_dir);
    base.join("folio")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::app_services::AppServices;
    use folio_core::ExportSettings;

    #[test]
    fn xdg_wins_over_home() {
        assert_eq!(
            resolve(Some("/x".into()), Some("/home/u".into())),
            PathBuf::from("/x/folio")
        );
        assert_eq!(resolve(None, Some("/home/u".into())), PathBuf::from("/home/u/.config/folio"));
        assert_eq!(resolve(None, None), env::temp_dir().join("folio"));
    }

    #[test]
    fn directory_is_only_created_when_settings_are_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = resolve(Some(tmp.path().to_path_buf()), None);
        let svc = AppServices::with_config_dir(&dir);

        assert_eq!(svc.settings(), ExportSettings::default());
        assert!(!dir.exists());

        svc.save_settings(&ExportSettings::default()).unwrap();
        assert!(dir.join("settings.json").exists());
    }
}
