//! Mailbox value type for address headers.

use crate::error::{Error, Result};
use std::fmt;

/// A named email address.
///
/// The display name is optional; the address is validated at construction
/// and immutable afterwards. An address-header field owns one mailbox, a
/// list field owns an ordered sequence of them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox {
    name: Option<String>,
    addr: String,
}

impl Mailbox {
    /// Creates a mailbox from a bare address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not email-shaped.
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        Self::validate(&addr)?;
        Ok(Self { name: None, addr })
    }

    /// Creates a mailbox with a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not email-shaped.
    pub fn with_name(name: impl Into<String>, addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        Self::validate(&addr)?;
        Ok(Self {
            name: Some(name.into()),
            addr,
        })
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the address.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns the domain part of the address.
    #[must_use]
    pub fn addr_domain(&self) -> &str {
        self.addr.rsplit_once('@').map_or("", |(_, domain)| domain)
    }

    /// Validates an email address (basic validation).
    fn validate(addr: &str) -> Result<()> {
        if addr.is_empty() {
            return Err(Error::InvalidAddress("Address cannot be empty".into()));
        }

        let Some((local, domain)) = addr.split_once('@') else {
            return Err(Error::InvalidAddress("Address must contain @".into()));
        };

        if domain.contains('@') {
            return Err(Error::InvalidAddress(
                "Address must have exactly one @".into(),
            ));
        }

        if local.is_empty() || domain.is_empty() {
            return Err(Error::InvalidAddress(
                "Local and domain parts cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Mailbox {
    /// Canonical angle-bracket form, without the display name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.addr)
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
    fn test_valid_address() {
        let mailbox = Mailbox::new("user@example.com").unwrap();
        assert_eq!(mailbox.addr(), "user@example.com");
        assert!(mailbox.name().is_none());
    }

    #[test]
    fn test_invalid_address_no_at() {
        assert!(Mailbox::new("userexample.com").is_err());
    }

    #[test]
    fn test_invalid_address_empty() {
        assert!(Mailbox::new("").is_err());
    }

    #[test]
    fn test_invalid_address_empty_local() {
        assert!(Mailbox::new("@example.com").is_err());
    }

    #[test]
    fn test_invalid_address_empty_domain() {
        assert!(Mailbox::new("user@").is_err());
    }

    #[test]
    fn test_invalid_address_double_at() {
        assert!(Mailbox::new("user@host@example.com").is_err());
    }

    #[test]
    fn test_mailbox_with_name() {
        let mailbox = Mailbox::with_name("John Doe", "john@example.com").unwrap();
        assert_eq!(mailbox.name(), Some("John Doe"));
        assert_eq!(mailbox.addr(), "john@example.com");
    }

    #[test]
    fn test_addr_domain() {
        let mailbox = Mailbox::new("user@example.com").unwrap();
        assert_eq!(mailbox.addr_domain(), "example.com");
    }

    #[test]
    fn test_display_is_angle_addr() {
        let mailbox = Mailbox::with_name("John Doe", "john@example.com").unwrap();
        assert_eq!(mailbox.to_string(), "<john@example.com>");
    }
}
