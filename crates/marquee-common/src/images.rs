//! Catalog image URL normalisation.

/// Resolve a catalog image path against the image domain.
///
/// Absolute `http://`/`https://` URLs are returned unchanged, relative paths
/// are joined onto `image_base` with exactly one slash, and an empty path
/// yields an empty string so templates can fall back to a placeholder.
pub fn image_url(image_base: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = image_base.trim_end_matches('/');
    let clean = path.strip_prefix('/').unwrap_or(path);
    format!("{base}/{clean}")
}
