//! Logger name validation.
//!
//! A valid name is one or more dot-separated segments; each segment is a
//! non-empty run of ASCII alphanumerics, `_`, `#`, `:` or `-`.

use thiserror::Error;

/// Error returned for logger names that fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid logger name '{0}'")]
pub struct NameError(pub String);

/// Returns true when `name` is a valid logger name.
pub fn is_valid_logger_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_segment)
}

/// Validate a logger name, returning it unchanged on success.
pub fn validate_logger_name(name: &str) -> Result<&str, NameError> {
    if is_valid_logger_name(name) {
        Ok(name)
    } else {
        Err(NameError(name.to_string()))
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '#' | ':' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["app", "grpc", "peer.gossip", "a.b-c.d_e", "chain#1", "x:y", "A9"] {
            assert!(is_valid_logger_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", ".", "a.", ".a", "a..b", "a b", "a/b", "a=b", "é"] {
            assert!(!is_valid_logger_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_validate_returns_error() {
        assert_eq!(validate_logger_name("ok.name"), Ok("ok.name"));
        let err = validate_logger_name("bad name").unwrap_err();
        assert_eq!(err.to_string(), "invalid logger name 'bad name'");
    }
}
