//! Constants describing the managed toolchain's shape on disk.
//!
//! The manager is written against one compiled-language toolchain at a
//! time (grounded on the Go toolchain's own layout, the closest real-world
//! analogue in the corpus this crate was built from): a `bin/<name>[.exe]`
//! entry point that accepts a version-query flag and prints a line
//! containing its own version string.

use once_cell::sync::Lazy;
use regex::Regex;

/// The toolchain's own command name, e.g. as typed at a shell prompt.
pub const BIN_NAME: &str = "go";

/// Flag passed to the entry-point binary to make it print its version.
pub const VERSION_FLAG: &str = "version";

/// Path to the entry-point binary relative to an installation root.
pub fn relative_binary_path() -> &'static str {
    if cfg!(windows) {
        "bin/go.exe"
    } else {
        "bin/go"
    }
}

pub fn binary_file_name() -> &'static str {
    if cfg!(windows) {
        "go.exe"
    } else {
        "go"
    }
}

static VERSION_IN_OUTPUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:go)?(\d+\.\d+(?:\.\d+)?(?:rc|beta|alpha)?\d*)\b").unwrap());

/// Extract a raw version token (e.g. `1.21.0`) from a version-query command's
/// stdout, such as `go version go1.21.0 linux/amd64`.
pub fn extract_version_token(output: &str) -> Option<String> {
    VERSION_IN_OUTPUT
        .captures(output)
        .map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_version_from_typical_output() {
        assert_eq!(
            extract_version_token("go version go1.21.0 linux/amd64"),
            Some("1.21.0".to_string())
        );
    }

    #[test]
    fn extracts_version_with_prerelease_suffix() {
        assert_eq!(
            extract_version_token("go version go1.22.0rc1 darwin/arm64"),
            Some("1.22.0rc1".to_string())
        );
    }

    #[test]
    fn returns_none_for_unparseable_output() {
        assert_eq!(extract_version_token("command not found"), None);
    }
}
