use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Global storage root (absolute), from `config::storage_root()`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let root = config::storage_root();
    let p = PathBuf::from(root);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

// ─── Directory helpers for ticket attachments ───────────────────────

/// Relative path of a ticket's attachment folder from the storage root:
/// `ticket-attachments/{ticket_id}`
pub fn attachment_rel_dir(ticket_id: i64) -> String {
    format!("ticket-attachments/{ticket_id}")
}

/// Relative path of a stored attachment file from the storage root:
/// `ticket-attachments/{ticket_id}/{filename}`
pub fn attachment_rel_path(ticket_id: i64, filename: &str) -> String {
    format!("{}/{}", attachment_rel_dir(ticket_id), filename)
}

/// Absolute folder for a ticket's attachments: `{STORAGE_ROOT}/ticket-attachments/{ticket_id}`
pub fn attachment_dir(ticket_id: i64) -> PathBuf {
    storage_root().join(attachment_rel_dir(ticket_id))
}

/// Absolute path of a stored attachment file (does not create).
pub fn attachment_path(ticket_id: i64, filename: &str) -> PathBuf {
    attachment_dir(ticket_id).join(filename)
}

/// Publicly resolvable URL for a stored attachment, built from
/// `config::public_file_base_url()`.
pub fn attachment_public_url(ticket_id: i64, filename: &str) -> String {
    let base = config::public_file_base_url();
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        attachment_rel_path(ticket_id, filename)
    )
}
