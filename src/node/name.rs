use crate::error::{XmlErrorKind, XmlResult};
use regex::Regex;
use std::sync::LazyLock;

/// Letters (including non-ASCII), digits, `_`, `.` and `-`; the first character must be a letter or `_`.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}0-9_.\-]*$").expect("valid name pattern"));

/// Returns true if `name` can be used as an entity name or attribute key.
///
/// ```rust
/// use xmlentity::is_valid_name;
/// assert!(is_valid_name("ReinosNórdicos"));
/// assert!(is_valid_name("_a.b-c9"));
/// assert!(!is_valid_name("9lives"));
/// assert!(!is_valid_name("a b"));
/// ```
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Checks `name` against the name pattern.
///
/// # Errors
/// Returns [`XmlErrorKind::InvalidName`] if the name is not valid.
pub fn validate_name(name: &str) -> XmlResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(XmlErrorKind::InvalidName(name.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["a", "_", "root", "Região", "Característica1", "x.y-z_0", "fuc"] {
            assert!(is_valid_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "1a", "a|b", "<a", "a b", "-a", ".a", "a>", "a:b", "a\"b"] {
            assert!(!is_valid_name(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_validate_name_error() {
        let err = validate_name("a|b").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::InvalidName(ref n) if n == "a|b"));
    }
}
