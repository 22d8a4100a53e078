//! Attachment storage: accept-policy enforcement and file persistence.
//!
//! Files land under `{STORAGE_ROOT}/ticket-attachments/{ticket_id}/` with a
//! freshly generated random name, and are addressed publicly through
//! `config::public_file_base_url()`.

use crate::error::ServiceError;
use common::paths;
use db::models::ticket_attachments::AttachmentKind;
use std::path::Path;
use uuid::Uuid;

/// Per-file size cap: 10 MiB.
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Media types the intake form accepts. Enforced here again so the policy
/// holds regardless of what the client claimed.
pub const ALLOWED_CONTENT_TYPES: [&str; 7] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/quicktime",
    "video/webm",
];

/// An uploaded file as received from the transport layer.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    /// Declared media type; when absent the filename decides.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Result of persisting one attachment.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_url: String,
    pub kind: AttachmentKind,
}

fn effective_content_type(file: &UploadFile) -> String {
    match &file.content_type {
        Some(declared) if !declared.is_empty() => declared.clone(),
        _ => mime_guess::from_path(&file.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

/// Checks the accept policy without touching the filesystem.
pub fn validate_upload(file: &UploadFile) -> Result<(), ServiceError> {
    let content_type = effective_content_type(file);
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(ServiceError::Validation(format!(
            "File type {content_type} is not allowed"
        )));
    }
    if file.bytes.len() > MAX_ATTACHMENT_BYTES {
        return Err(ServiceError::Validation(
            "Files must be smaller than 10MB".to_string(),
        ));
    }
    Ok(())
}

/// Validates and persists one attachment for `ticket_id`, returning its
/// public URL and derived media kind.
pub fn store_attachment(ticket_id: i64, file: &UploadFile) -> Result<StoredFile, ServiceError> {
    validate_upload(file)?;

    let ext = Path::new(&file.filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    let stored_name = format!("{}.{}", Uuid::new_v4(), ext);

    let path = paths::attachment_path(ticket_id, &stored_name);
    paths::ensure_parent_dir(&path)
        .and_then(|_| std::fs::write(&path, &file.bytes))
        .map_err(|err| {
            ServiceError::Gateway(format!("Failed to store {}: {err}", file.filename))
        })?;

    Ok(StoredFile {
        file_url: paths::attachment_public_url(ticket_id, &stored_name),
        kind: AttachmentKind::from_filename(&file.filename),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::AppConfig;
    use serial_test::serial;
    use tempfile::TempDir;

    fn png(len: usize) -> UploadFile {
        UploadFile {
            filename: "photo.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn pdf_is_rejected_before_any_write() {
        let file = UploadFile {
            filename: "invoice.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![0u8; 64],
        };

        let err = validate_upload(&file).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn oversized_image_is_rejected() {
        let err = validate_upload(&png(15 * 1024 * 1024)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn content_type_falls_back_to_filename() {
        let file = UploadFile {
            filename: "clip.mp4".to_string(),
            content_type: None,
            bytes: vec![0u8; 16],
        };
        assert!(validate_upload(&file).is_ok());
    }

    #[test]
    #[serial]
    fn valid_image_is_stored_and_classified() {
        let tmp = TempDir::new().unwrap();
        AppConfig::set_storage_root(tmp.path().to_string_lossy().to_string());
        AppConfig::set_public_file_base_url("http://files.example");

        let stored = store_attachment(42, &png(2 * 1024 * 1024)).unwrap();

        assert_eq!(stored.kind, AttachmentKind::Image);
        assert!(stored
            .file_url
            .starts_with("http://files.example/ticket-attachments/42/"));
        assert!(stored.file_url.ends_with(".png"));

        let dir = tmp.path().join("ticket-attachments").join("42");
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 1);
    }
}
