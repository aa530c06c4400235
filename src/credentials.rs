//! Password resolution: flag, then password file, then an interactive prompt.

use anyhow::{Context, Result, bail};
use dialoguer::Password;
use std::fs;
use std::path::Path;

/// Resolve the password for `user`.
pub fn resolve_password(
    user: &str,
    password: Option<&str>,
    password_file: Option<&Path>,
) -> Result<String> {
    if let Some(password) = password {
        return Ok(password.to_string());
    }
    if let Some(path) = password_file {
        return read_password_file(path);
    }
    prompt(user)
}

/// Read the first line of a password file, trimmed.
pub fn read_password_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read password file {}", path.display()))?;
    let password = content.lines().next().unwrap_or_default().trim();
    if password.is_empty() {
        bail!("Password file {} is empty", path.display());
    }
    Ok(password.to_string())
}

fn prompt(user: &str) -> Result<String> {
    Password::new()
        .with_prompt(format!("Enter {user}'s password"))
        .allow_empty_password(true)
        .interact()
        .context("Failed to read password")
}
