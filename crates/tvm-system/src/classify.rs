//! Origin classification by path prefix (§4.E.4).

use std::path::Path;
use tvm_core::model::SystemOrigin;

pub fn classify_origin(executable_path: &Path) -> SystemOrigin {
    let path_str = executable_path.to_string_lossy();

    if path_str.contains("/opt/homebrew/") || path_str.contains("/usr/local/opt/") {
        SystemOrigin::Homebrew
    } else if path_str.starts_with("/usr/") && !path_str.starts_with("/usr/local/") {
        SystemOrigin::PackageManager
    } else if path_str.starts_with("/usr/local/") || path_str.contains("/opt/") {
        SystemOrigin::Manual
    } else {
        SystemOrigin::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn classifies_homebrew_prefix() {
        let path = PathBuf::from("/opt/homebrew/opt/go/libexec/bin/go");
        assert_eq!(classify_origin(&path), SystemOrigin::Homebrew);
    }

    #[test]
    fn classifies_distro_prefix_as_package_manager() {
        let path = PathBuf::from("/usr/bin/go");
        assert_eq!(classify_origin(&path), SystemOrigin::PackageManager);
    }

    #[test]
    fn classifies_usr_local_as_manual() {
        let path = PathBuf::from("/usr/local/go/bin/go");
        assert_eq!(classify_origin(&path), SystemOrigin::Manual);
    }

    #[test]
    fn classifies_unrelated_prefix_as_unknown() {
        let path = PathBuf::from("/home/tester/bin/go");
        assert_eq!(classify_origin(&path), SystemOrigin::Unknown);
    }
}
