use std::path::PathBuf;

use crate::error::{Result, TenureError};
use crate::settings::{save_settings, settings_path, Settings};

pub fn run(config: Option<PathBuf>, force: bool) -> Result<()> {
    let path = config.unwrap_or_else(settings_path);
    if path.exists() && !force {
        return Err(TenureError::Settings(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_settings(&Settings::default(), &path)?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
