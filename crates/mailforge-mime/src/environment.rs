//! Platform services injected into serialization.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Platform collaborator supplying encoding and line-ending services.
///
/// The core never owns an environment; callers pass one to each dump.
pub trait Environment {
    /// Encodes UTF-8 text as standard Base64.
    fn to_base64(&self, data: &str) -> String;

    /// Line terminator between header lines and before the body.
    fn eol(&self) -> &str;

    /// Validates a MIME content type, returning the value to use or `None`
    /// when rejected. Consumed by message assembly on top of this crate,
    /// not by the header core itself.
    fn validate_content_type(&self, value: &str) -> Option<String>;
}

/// Default environment: standard Base64, CRLF line endings, and a
/// structural `type/subtype` content-type check.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEnvironment;

impl Environment for StandardEnvironment {
    fn to_base64(&self, data: &str) -> String {
        STANDARD.encode(data.as_bytes())
    }

    fn eol(&self) -> &str {
        "\r\n"
    }

    fn validate_content_type(&self, value: &str) -> Option<String> {
        let value = value.trim();
        let (main_type, rest) = value.split_once('/')?;
        let sub_type = rest.split(';').next().unwrap_or_default().trim();

        if main_type.trim().is_empty() || sub_type.is_empty() {
            return None;
        }

        Some(value.to_string())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base64() {
        let env = StandardEnvironment;
        assert_eq!(env.to_base64("Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
    }

    #[test]
    fn test_eol_is_crlf() {
        let env = StandardEnvironment;
        assert_eq!(env.eol(), "\r\n");
    }

    #[test]
    fn test_validate_content_type_accepts() {
        let env = StandardEnvironment;
        assert_eq!(
            env.validate_content_type("text/plain"),
            Some("text/plain".to_string())
        );
        assert_eq!(
            env.validate_content_type("image/jpg; charset=UTF-8"),
            Some("image/jpg; charset=UTF-8".to_string())
        );
    }

    #[test]
    fn test_validate_content_type_rejects() {
        let env = StandardEnvironment;
        assert!(env.validate_content_type("").is_none());
        assert!(env.validate_content_type("plain").is_none());
        assert!(env.validate_content_type("/plain").is_none());
        assert!(env.validate_content_type("text/").is_none());
        assert!(env.validate_content_type("text/; charset=UTF-8").is_none());
    }
}
