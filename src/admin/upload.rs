use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Extension allow-list check, case-insensitive.
pub fn allowed_file(filename: &str) -> bool {
    extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Reduce a client-supplied filename to a filesystem-safe form: the final
/// path component with everything outside `[A-Za-z0-9._-]` replaced, and no
/// leading or trailing dots.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_matches('.').to_string()
}

/// Write an uploaded image under the configured directory. The stored name
/// is uniquified so uploads never overwrite each other. Returns the public
/// path the catalog row records.
pub async fn save_upload(upload_dir: &str, original_name: &str, data: Bytes) -> anyhow::Result<String> {
    let safe = sanitize_filename(original_name);
    anyhow::ensure!(!safe.is_empty(), "empty filename after sanitizing");

    let stored = format!("{}-{}", Uuid::new_v4(), safe);
    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("create upload dir {upload_dir}"))?;
    let path = Path::new(upload_dir).join(&stored);
    tokio::fs::write(&path, &data)
        .await
        .with_context(|| format!("write upload {}", path.display()))?;

    Ok(format!("/{}/{}", upload_dir.trim_matches('/'), stored))
}
