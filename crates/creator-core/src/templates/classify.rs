//! Text vs. binary classification of template files
//!
//! A file gets placeholder substitution only if it is classified as text:
//! - a known binary extension is always binary
//! - a NUL byte in the first 8KB means binary
//! - otherwise the whole content must be valid UTF-8
//!
//! Empty files count as text; substitution leaves them empty, so this never
//! changes their bytes.

use std::path::Path;

/// Bytes sampled for the NUL check
const SAMPLE_LEN: usize = 8192;

/// Extensions that are never substituted, regardless of content
const BINARY_EXTENSIONS: &[&str] = &[
    // Executables and libraries
    "exe", "dll", "so", "dylib", "bin", "o", "a", "lib", "wasm", "class", "jar", "pyc",
    // Archives
    "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "zst",
    // Images and fonts
    "jpg", "jpeg", "png", "gif", "bmp", "ico", "icns", "webp", "tiff", "woff", "woff2", "ttf",
    "otf", "eot",
    // Media
    "mp3", "mp4", "avi", "mov", "mkv", "wav", "ogg", "flac", "webm",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
];

/// Check the extension against the known binary list (case-insensitive)
pub fn is_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Whether `content` read from `path` should receive substitution
pub fn is_text(path: &Path, content: &[u8]) -> bool {
    if is_binary_extension(path) {
        return false;
    }
    let sample = &content[..content.len().min(SAMPLE_LEN)];
    if sample.contains(&0) {
        return false;
    }
    std::str::from_utf8(content).is_ok()
}
