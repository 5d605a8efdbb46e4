// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image intake validation: extension allow-list and size cap, applied
//! before any bytes reach the file store.

use chrono::Utc;

use reclaim_config::model::UploadConfig;
use reclaim_core::ReclaimError;

/// Checks the file name and size against the configured limits and returns
/// the lowercase extension.
pub fn validate_upload(
    file_name: &str,
    size: u64,
    config: &UploadConfig,
) -> Result<String, ReclaimError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| {
            ReclaimError::Validation(format!("`{file_name}` has no file extension"))
        })?;
    if !config.allowed_extensions.contains(&extension) {
        return Err(ReclaimError::Validation(format!(
            "file type `.{extension}` is not accepted; allowed: {}",
            config.allowed_extensions.join(", ")
        )));
    }
    if size > config.max_bytes {
        return Err(ReclaimError::Validation(format!(
            "file is {size} bytes, the limit is {} bytes",
            config.max_bytes
        )));
    }
    Ok(extension)
}

/// Object path for an upload: `{owner}/{millis}.{ext}`.
pub fn object_path(owner: &str, extension: &str) -> String {
    format!("{owner}/{}.{extension}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UploadConfig {
        UploadConfig::default()
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        assert_eq!(validate_upload("photo.JPG", 100, &config()).unwrap(), "jpg");
        assert_eq!(
            validate_upload("a.b.webp", 100, &config()).unwrap(),
            "webp"
        );
    }

    #[test]
    fn rejects_unknown_extensions_and_missing_ones() {
        assert!(matches!(
            validate_upload("malware.exe", 100, &config()),
            Err(ReclaimError::Validation(_))
        ));
        assert!(matches!(
            validate_upload("noextension", 100, &config()),
            Err(ReclaimError::Validation(_))
        ));
        assert!(matches!(
            validate_upload("trailing.", 100, &config()),
            Err(ReclaimError::Validation(_))
        ));
    }

    #[test]
    fn rejects_oversized_files() {
        let limit = config().max_bytes;
        assert!(validate_upload("ok.png", limit, &config()).is_ok());
        assert!(matches!(
            validate_upload("big.png", limit + 1, &config()),
            Err(ReclaimError::Validation(_))
        ));
    }

    #[test]
    fn object_paths_are_owner_scoped() {
        let path = object_path("user-a", "png");
        assert!(path.starts_with("user-a/"));
        assert!(path.ends_with(".png"));
    }
}
