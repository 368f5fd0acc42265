//! Canonical path keys for file lookup.
//!
//! The query database resolves paths case-insensitively on platforms whose
//! file systems are case-insensitive by default (Windows, macOS). The
//! canonical key is used only for lookup; the original spelling is preserved
//! in the stored file record.

/// Whether the current platform treats paths case-sensitively.
#[inline]
pub const fn platform_case_sensitive() -> bool {
    !(cfg!(windows) || cfg!(target_os = "macos"))
}

/// Returns the canonical lookup key for `path`.
pub fn path_key(path: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        path.to_owned()
    } else {
        path.to_lowercase()
    }
}
