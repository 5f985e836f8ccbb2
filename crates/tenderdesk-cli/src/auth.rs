use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Stored session credentials for one profile.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub server: String,
    /// Portal user id.
    pub user_id: String,
    /// Session JWT, when the hosted auth service issued one.
    pub token: Option<String>,
}

fn creds_path(profile: &str) -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".tenderdesk");
    fs::create_dir_all(&dir)?;
    Ok(dir.join(format!("credentials.{profile}.json")))
}

pub fn load_credentials(profile: &str) -> Result<Option<StoredCredentials>> {
    let path = creds_path(profile)?;
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let creds: StoredCredentials = serde_json::from_str(&content)?;
    Ok(Some(creds))
}

pub fn save_credentials(profile: &str, creds: &StoredCredentials) -> Result<()> {
    let path = creds_path(profile)?;
    let content = serde_json::to_string_pretty(creds)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn remove_credentials(profile: &str) -> Result<bool> {
    let path = creds_path(profile)?;
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
