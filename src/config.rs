//! Runtime settings.
//!
//! Settings come from built-in defaults, then an optional JSON file, then CLI
//! flags. Only the keys present in the file override the defaults.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};

use crate::error::{Result, ShottyError};

/// Credential profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "shotty";

/// Description given to snapshots created by `instances snapshot`.
pub const DEFAULT_SNAPSHOT_DESCRIPTION: &str = "created by shotty";

/// Upper bound for a single instance state wait (40 polls of 15 seconds).
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 600;

/// What a lifecycle command does when one instance fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[derive(Display, EnumString, EnumIter, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorPolicy {
    /// Report the failure and move on to the next instance
    #[default]
    Continue,
    /// Stop at the first failure
    Abort,
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Named AWS credential profile
    pub profile: String,
    /// Region override; the profile's region is used when unset
    pub region: Option<String>,
    pub on_error: ErrorPolicy,
    pub wait_timeout_secs: u64,
    pub snapshot_description: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            region: None,
            on_error: ErrorPolicy::default(),
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            snapshot_description: DEFAULT_SNAPSHOT_DESCRIPTION.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ShottyError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| ShottyError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Apply CLI overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(profile) = &overrides.profile {
            self.profile = profile.clone();
        }
        if let Some(region) = &overrides.region {
            self.region = Some(region.clone());
        }
        if let Some(policy) = overrides.on_error {
            self.on_error = policy;
        }
        if let Some(secs) = overrides.wait_timeout_secs {
            self.wait_timeout_secs = secs;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.profile.trim().is_empty() {
            return Err(ShottyError::validation("profile must not be empty"));
        }
        if let Some(region) = &self.region {
            if region.trim().is_empty() {
                return Err(ShottyError::validation("region must not be empty when set"));
            }
        }
        if self.wait_timeout_secs == 0 {
            return Err(ShottyError::validation(
                "wait_timeout_secs must be greater than zero",
            ));
        }
        if self.snapshot_description.trim().is_empty() {
            return Err(ShottyError::validation(
                "snapshot_description must not be empty",
            ));
        }
        Ok(())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

/// Values given on the command line; `None` leaves the setting untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub on_error: Option<ErrorPolicy>,
    pub wait_timeout_secs: Option<u64>,
}
