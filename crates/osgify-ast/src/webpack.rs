//! Webpack content-hash handling

/// Remove a webpack content hash (a dot-delimited hex-only token near the
/// end of the file name) from a path, if present.
///
/// Segments are scanned from the rightmost inward and the first hex-only
/// segment found is removed; a path with no such segment comes back
/// unchanged.
pub fn remove_webpack_hash(file_path: &str) -> String {
    let parts: Vec<&str> = file_path.split('.').collect();

    let hash_index = parts
        .iter()
        .rposition(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_hexdigit()));

    match hash_index {
        Some(idx) => {
            let mut kept: Vec<&str> = parts;
            kept.remove(idx);
            kept.join(".")
        }
        None => file_path.to_string(),
    }
}
