//! Reserved alias names (§3): command verbs, the `system`/`sys` sentinels,
//! the toolchain's own name, and common shell utilities a typo'd alias
//! could otherwise shadow.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const COMMAND_VERBS: &[&str] = &[
    "install", "uninstall", "remove", "use", "list", "ls", "current", "alias", "unalias",
    "aliases", "system", "env", "init", "completions", "update", "config",
];

const SHELL_UTILITIES: &[&str] = &["ls", "cd", "pwd", "git"];

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set: HashSet<&'static str> = HashSet::new();
    set.extend(COMMAND_VERBS.iter().copied());
    set.extend(SHELL_UTILITIES.iter().copied());
    set.insert("system");
    set.insert("sys");
    set.insert(crate::toolchain::BIN_NAME);
    set
});

/// `true` if `target` is `system` or `sys` (the reserved sentinels that
/// resolve to the detected system toolchain rather than a managed version).
pub fn is_system_sentinel(target: &str) -> bool {
    target.eq_ignore_ascii_case("system") || target.eq_ignore_ascii_case("sys")
}

/// Validate an alias name's character set and length per §3. Does not check
/// reservation; see [`is_reserved`].
pub fn is_valid_name_shape(name: &str) -> bool {
    let len = name.chars().count();
    (1..=50).contains(&len) && NAME_RE.is_match(name)
}

/// `true` if `name` is a reserved word and may never be used as an alias.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_characters() {
        assert!(!is_valid_name_shape("has space"));
        assert!(!is_valid_name_shape("slash/es"));
        assert!(is_valid_name_shape("stable-1.21"));
    }

    #[test]
    fn rejects_empty_and_too_long() {
        assert!(!is_valid_name_shape(""));
        assert!(!is_valid_name_shape(&"a".repeat(51)));
        assert!(is_valid_name_shape(&"a".repeat(50)));
    }

    #[test]
    fn reserves_verbs_and_sentinels() {
        assert!(is_reserved("install"));
        assert!(is_reserved("system"));
        assert!(is_reserved("sys"));
        assert!(is_reserved("git"));
        assert!(!is_reserved("stable"));
    }

    #[test]
    fn recognizes_system_sentinel_case_insensitively() {
        assert!(is_system_sentinel("system"));
        assert!(is_system_sentinel("SYS"));
        assert!(!is_system_sentinel("stable"));
    }
}
