use std::{fs, path::Path};

use serde_json::Value;

use crate::error::{Result, TokenError};

pub fn read_required(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(TokenError::MissingInput(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| TokenError::io(path, e))
}

pub fn read_json(path: &Path) -> Result<Value> {
    let raw = read_required(path)?;
    serde_json::from_str(&raw).map_err(|e| TokenError::json(path, e))
}

/// Reads a document that is allowed to be absent. A missing or blank file is
/// `None`; a file that exists but does not parse is still an error.
pub fn read_json_optional(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| TokenError::io(path, e))?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| TokenError::json(path, e))
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TokenError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| TokenError::io(path, e))
}

/// Two-space indented JSON with a trailing newline.
pub fn to_pretty_json(value: &Value) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    out.push('\n');
    out
}
