//! Disk-backed store for payment evidence images.
//!
//! Objects are written under `STORAGE_ROOT` with keys derived from the
//! submission (`event/name-timestamp-filename`) and served back publicly at
//! `/uploads/<key>`, which is the URL recorded on the registration row.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use axum::{
    extract::{Path as AxumPath, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::web::AppState;

pub async fn ensure_storage_root(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("failed to ensure storage root at {}", path.display()))
}

/// Key under which a piece of evidence is stored. The millisecond timestamp
/// keeps concurrent submissions with the same name and filename from
/// colliding.
pub fn evidence_key(event: &str, name: &str, timestamp_millis: i64, original_filename: &str) -> String {
    format!(
        "{}/{}-{}-{}",
        sanitize_segment(event),
        sanitize_segment(name),
        timestamp_millis,
        sanitize_segment(original_filename),
    )
}

/// Public URL for a stored key, relative unless PUBLIC_BASE_URL is set.
pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{base_url}/uploads/{key}")
}

/// Writes the object, creating the per-event directory as needed. The caller
/// inserts the registration row only after this returns Ok.
pub async fn store_evidence(root: &Path, key: &str, bytes: &[u8]) -> Result<()> {
    let path = root.join(key);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create evidence directory {}", parent.display()))?;
    }
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("failed to write evidence object {}", path.display()))
}

/// Serves a stored object. Keys come from URLs, so the path is normalized
/// and anything that would escape the storage root is rejected.
pub async fn serve_evidence(
    State(state): State<AppState>,
    AxumPath(key): AxumPath<String>,
) -> Result<Response, StatusCode> {
    let relative = sanitized_relative_path(&key).ok_or(StatusCode::NOT_FOUND)?;
    let path = state.storage_root().join(&relative);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(StatusCode::NOT_FOUND);
        }
        Err(err) => {
            error!(?err, file = %path.display(), "failed to read evidence object");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&key)),
    );
    Ok((headers, bytes).into_response())
}

fn sanitized_relative_path(key: &str) -> Option<PathBuf> {
    let path = Path::new(key);
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            _ => return None,
        }
    }
    if out.as_os_str().is_empty() { None } else { Some(out) }
}

fn sanitize_segment(input: &str) -> String {
    let sanitized = sanitize_filename::sanitize(input).replace(' ', "_");
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        "file".to_string()
    } else {
        sanitized
    }
}

pub fn content_type_for(key: &str) -> &'static str {
    let extension = Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_embed_event_name_timestamp_and_filename() {
        let key = evidence_key("Photography Contest", "Anna Rao", 1739500000000, "proof.png");
        assert_eq!(key, "Photography_Contest/Anna_Rao-1739500000000-proof.png");
    }

    #[test]
    fn keys_differ_by_timestamp() {
        let a = evidence_key("Tech Expo", "Anna", 1, "proof.png");
        let b = evidence_key("Tech Expo", "Anna", 2, "proof.png");
        assert_ne!(a, b);
    }

    #[test]
    fn key_segments_cannot_escape_the_root() {
        let key = evidence_key("a/b", "c\\d", 42, "..");
        // Separators inside segments are stripped, so the key always has
        // exactly one directory level and no dot-dot components.
        assert_eq!(key.matches('/').count(), 1);
        assert!(sanitized_relative_path(&key).is_some());
        for segment in key.split('/') {
            assert_ne!(segment, "..");
            assert!(!segment.is_empty());
        }
    }

    #[test]
    fn relative_paths_reject_traversal() {
        assert!(sanitized_relative_path("event/file.png").is_some());
        assert!(sanitized_relative_path("../secrets").is_none());
        assert!(sanitized_relative_path("/etc/passwd").is_none());
        assert!(sanitized_relative_path("a/../../b").is_none());
        assert!(sanitized_relative_path("").is_none());
    }

    #[test]
    fn content_types_cover_allowed_images() {
        assert_eq!(content_type_for("a/b.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a/b.png"), "image/png");
        assert_eq!(content_type_for("a/b.bin"), "application/octet-stream");
        assert_eq!(content_type_for("no-extension"), "application/octet-stream");
    }

    #[test]
    fn public_url_joins_base_and_key() {
        assert_eq!(public_url("", "e/f.png"), "/uploads/e/f.png");
        assert_eq!(
            public_url("https://fest.example.edu", "e/f.png"),
            "https://fest.example.edu/uploads/e/f.png"
        );
    }

    #[tokio::test]
    async fn store_evidence_writes_under_nested_key() {
        let dir = tempfile::tempdir().unwrap();
        let key = evidence_key("Tech Expo", "Anna", 7, "proof.png");
        store_evidence(dir.path(), &key, b"png-bytes").await.unwrap();

        let written = tokio::fs::read(dir.path().join(&key)).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }
}
