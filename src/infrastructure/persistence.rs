use crate::domain::{MAX_PROMPT_DECIMALS, MAX_SIGMA, Settings};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid settings file - {0}")]
    Format(#[from] serde_json::Error),

    #[error("Invalid setting {field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

fn out_of_range(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::OutOfRange { field, reason: reason.into() }
}

/// Rejects values the editor cannot work with.
fn check_settings(settings: &Settings) -> Result<(), SettingsError> {
    if !settings.step.is_finite() {
        return Err(out_of_range("step", "must be a finite number"));
    }
    if !settings.color_scale.is_finite() {
        return Err(out_of_range("color_scale", "must be a finite number"));
    }
    if !(settings.sigma > 0.0 && settings.sigma <= MAX_SIGMA) {
        return Err(out_of_range("sigma", format!("must be in (0, {}]", MAX_SIGMA)));
    }
    if settings.prompt_decimals > MAX_PROMPT_DECIMALS {
        return Err(out_of_range("prompt_decimals", format!("must be at most {}", MAX_PROMPT_DECIMALS)));
    }
    if !(settings.prompt_min.is_finite() && settings.prompt_max.is_finite()) {
        return Err(out_of_range("prompt_min/prompt_max", "must be finite numbers"));
    }
    if settings.prompt_min > settings.prompt_max {
        return Err(out_of_range(
            "prompt_min",
            format!("{} is above prompt_max {}", settings.prompt_min, settings.prompt_max),
        ));
    }
    Ok(())
}

pub struct SettingsRepository;

impl SettingsRepository {
    /// Reads settings from `path`. A missing file yields the defaults;
    /// a file with unusable values is an error.
    pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let settings = serde_json::from_str::<Settings>(&content)?;
                check_settings(&settings)?;
                info!(path = %path.display(), "loaded settings");
                Ok(settings)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file, using defaults");
                Ok(Settings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_settings(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "saved settings");
        Ok(())
    }
}
