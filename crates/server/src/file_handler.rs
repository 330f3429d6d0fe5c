//! Upload directory management and file checks

use devassist_common::{DevAssistError, Result};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// Create the upload directory if it does not exist
pub async fn ensure_upload_dir(dir: &Path) -> Result<()> {
    if !fs::try_exists(dir).await.unwrap_or(false) {
        fs::create_dir_all(dir).await.map_err(|e| {
            DevAssistError::file_system(format!(
                "Failed to create directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Remove every file in the upload directory
///
/// Failures are logged per file and do not stop the sweep.
/// Returns the number of files removed.
pub async fn cleanup_files(dir: &Path) -> usize {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read upload directory {}: {}", dir.display(), e);
            return 0;
        }
    };

    let mut removed = 0;
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Error listing {}: {}", dir.display(), e);
                break;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) => warn!("Error deleting file {}: {}", path.display(), e),
        }
    }

    info!("Removed {} uploaded files from {}", removed, dir.display());
    removed
}

/// Check `filename` against the allowed extensions
///
/// Returns the normalized extension (lowercase, with leading dot).
/// Dotfiles such as `.js` have no extension and are rejected.
pub fn validate_file_type(filename: &str, allowed_extensions: &[String]) -> Result<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()));

    match extension {
        Some(ext) if allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => Ok(ext),
        _ => Err(DevAssistError::invalid_input(format!(
            "Invalid file type: {}",
            filename
        ))),
    }
}

/// Fail once a running upload size passes `max_bytes`
pub fn check_file_size(size: u64, max_bytes: u64) -> Result<()> {
    if size > max_bytes {
        return Err(DevAssistError::invalid_input(format!(
            "File size exceeds the maximum limit of {:.1} MB.",
            max_bytes as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}
