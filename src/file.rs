// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Resolve a `-o` hint into a concrete file path: empty → default name
/// in the current dir; an existing directory (or trailing separator) →
/// default name inside it.
pub fn resolve_out_path(user_o: Option<&Path>, default_filename: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let Some(p) = user_o else {
        return Ok(PathBuf::from(default_filename));
    };
    if looks_like_dir_hint(p) || p.is_dir() {
        ensure_directory(p)?;
        Ok(p.join(default_filename))
    } else {
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)?;
            }
        }
        Ok(p.to_path_buf())
    }
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

/// Article codes contain '/'; flatten them for archive entry names.
pub fn sanitize_code_filename(code: &str) -> String {
    code.trim().replace('/', "_")
}
