use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn cardparse_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cardparse"))
}

pub fn ensure_cardparse_home() -> Result<PathBuf> {
    let dir = cardparse_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Where the terminal form writes its log while the alternate screen is up.
pub fn log_path() -> Result<PathBuf> {
    Ok(ensure_cardparse_home()?.join("cardparse.log"))
}
