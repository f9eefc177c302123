// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Preferences port shared across editor tools.

use tracing::warn;

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::{EditorPrefs, PREFS_KEY};

/// Port for loading/saving editor preferences.
pub trait PrefsPort {
    /// Load editor preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<EditorPrefs>;
    /// Persist editor preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &EditorPrefs);
}

impl<S: ConfigStore> PrefsPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<EditorPrefs> {
        self.load(PREFS_KEY).unwrap_or_else(|err| {
            warn!(error = %err, "failed to load editor prefs");
            None
        })
    }

    fn save_prefs(&self, prefs: &EditorPrefs) {
        if let Err(err) = self.save(PREFS_KEY, prefs) {
            warn!(error = %err, "failed to save editor prefs");
        }
    }
}
