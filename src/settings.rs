use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TenureError};

/// Minimum whole months of credit tenure for an account to comply.
pub const MIN_TENURE_MONTHS: i64 = 3;
/// A limit must be strictly above this to count as a real credit extension.
pub const MIN_AUTHORIZED_LIMIT: f64 = 5.0;
/// Payment frequency codes at or below this are non-compliant.
pub const MIN_PAYMENT_FREQUENCY: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub matrix_sheet: String,
    pub new_accounts_sheet: String,
    pub limit_history_sheet: String,
    pub min_tenure_months: i64,
    pub min_limit: f64,
    pub min_payment_frequency: f64,
    pub output_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            matrix_sheet: "Matriz".to_string(),
            new_accounts_sheet: "Alta".to_string(),
            limit_history_sheet: "Limite".to_string(),
            min_tenure_months: MIN_TENURE_MONTHS,
            min_limit: MIN_AUTHORIZED_LIMIT,
            min_payment_frequency: MIN_PAYMENT_FREQUENCY,
            output_prefix: "resultados_".to_string(),
        }
    }
}

/// The three thresholds the classifier and the history reducer apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub min_tenure_months: i64,
    pub min_limit: f64,
    pub min_payment_frequency: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Settings::default().thresholds()
    }
}

impl Settings {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_tenure_months: self.min_tenure_months,
            min_limit: self.min_limit,
            min_payment_frequency: self.min_payment_frequency,
        }
    }

    /// Sibling of `input` named `<output_prefix><stem>.xlsx`.
    pub fn default_output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "salida".to_string());
        input.with_file_name(format!("{}{stem}.xlsx", self.output_prefix))
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("credit-tenure")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring malformed settings at {}: {e}", path.display());
                Settings::default()
            }
        }
    } else {
        Settings::default()
    }
}

pub fn load_settings(path: Option<&Path>) -> Settings {
    match path {
        Some(p) => load_settings_from(p),
        None => load_settings_from(&settings_path()),
    }
}

pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TenureError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}
