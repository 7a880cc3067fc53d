//! Notmuch configuration access
//!
//! Reads configuration items by shelling out to `notmuch config get`, which
//! sees the same merged view of the configuration as the rest of the notmuch
//! toolchain, including items stored only in the database. Values follow
//! notmuch's conventions: trailing whitespace stripped, booleans spelled
//! `true`/`yes`/`false`/`no`.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Config item holding the filesystem root of the mail store
pub const MAIL_ROOT_KEY: &str = "database.mail_root";

/// Config item holding the default read-only preference
pub const READ_ONLY_KEY: &str = "neomutt.read_only";

/// Read a single configuration item via `notmuch config get`
///
/// Returns the value with trailing whitespace stripped, matching what the
/// notmuch CLI prints. An unset item comes back as the empty string. The
/// child's stderr passes straight through to the terminal.
///
/// # Errors
///
/// Returns an error when `notmuch` cannot be started, exits unsuccessfully,
/// or prints output that is not UTF-8.
pub fn config_get(key: &str) -> AppResult<String> {
    debug!(key, "reading notmuch config");
    let command = format!("notmuch config get {key}");
    let output = Command::new("notmuch")
        .args(["config", "get", key])
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| AppError::CommandSpawn {
            command: "notmuch".to_owned(),
            source,
        })?;
    if !output.status.success() {
        return Err(AppError::CommandFailed {
            command,
            status: output.status,
        });
    }
    let value =
        String::from_utf8(output.stdout).map_err(|_| AppError::CommandOutput { command })?;
    Ok(value.trim_end().to_owned())
}

/// Read a boolean configuration item
///
/// An unset item yields `None` when `nullable` is true and a configuration
/// error otherwise. Set items must use one of notmuch's boolean spellings.
///
/// # Errors
///
/// Propagates [`config_get`] failures, and returns a configuration error
/// for a missing required item or an unrecognized spelling.
pub fn config_get_bool(key: &str, nullable: bool) -> AppResult<Option<bool>> {
    let raw = config_get(key)?;
    interpret_bool(key, &raw, nullable)
}

/// Resolve the mail store root from `database.mail_root`
///
/// The configured value is resolved relative to the user's home directory;
/// an absolute value stands alone. The resolved path must name an existing
/// directory.
///
/// # Errors
///
/// Propagates [`config_get`] failures; returns a configuration error when
/// the item is unset or the directory does not exist, and
/// [`AppError::HomeNotSet`] when `HOME` is missing from the environment.
pub fn mail_root() -> AppResult<PathBuf> {
    let setting = config_get(MAIL_ROOT_KEY)?;
    let home = std::env::var("HOME").map_err(|_| AppError::HomeNotSet)?;
    resolve_mail_root(&home, &setting)
}

fn resolve_mail_root(home: &str, setting: &str) -> AppResult<PathBuf> {
    if setting.is_empty() {
        return Err(AppError::config(format!(
            "config item required: {MAIL_ROOT_KEY}"
        )));
    }
    let root = PathBuf::from(home).join(setting);
    if !root.is_dir() {
        return Err(AppError::config(format!(
            "mail root is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

fn interpret_bool(key: &str, raw: &str, nullable: bool) -> AppResult<Option<bool>> {
    if raw.is_empty() {
        if nullable {
            return Ok(None);
        }
        return Err(AppError::config(format!("config item required: {key}")));
    }
    match parse_bool_value(raw) {
        Some(value) => Ok(Some(value)),
        None => Err(AppError::config(format!(
            "config item not a valid boolean: {key}='{raw}'"
        ))),
    }
}

/// Parse notmuch's boolean spellings, case-insensitively
fn parse_bool_value(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}
