//! Fixed, ordered per-OS candidate paths (§6).

use tvm_core::toolchain::BIN_NAME;

/// Candidate absolute paths to probe before falling back to `PATH` lookup,
/// in priority order. `{name}` is the toolchain's directory-naming
/// convention (its bin name, title-cased on Windows); `{bin}` is the
/// binary file name including platform extension.
pub fn fixed_candidates() -> Vec<String> {
    let bin = tvm_core::toolchain::binary_file_name();
    let name = BIN_NAME;
    let title = capitalize(name);

    if cfg!(target_os = "windows") {
        vec![
            format!(r"C:\Program Files\{title}\bin\{bin}"),
            format!(r"C:\{title}\bin\{bin}"),
        ]
    } else if cfg!(target_os = "macos") {
        vec![
            format!("/opt/homebrew/opt/{name}/libexec/bin/{bin}"),
            format!("/usr/local/opt/{name}/libexec/bin/{bin}"),
            format!("/usr/local/{name}/bin/{bin}"),
        ]
    } else {
        vec![
            format!("/usr/local/{name}/bin/{bin}"),
            format!("/usr/lib/{name}/bin/{bin}"),
            format!("/opt/{name}/bin/{bin}"),
        ]
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_candidates_is_non_empty_and_ordered() {
        let candidates = fixed_candidates();
        assert!(!candidates.is_empty());
    }
}
