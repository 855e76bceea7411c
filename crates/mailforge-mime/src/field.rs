//! Header field model: value shapes, field kinds, and per-field state.

use crate::mailbox::Mailbox;

/// A header field value.
///
/// Address headers carry mailboxes, everything else carries plain text.
/// The shape a field accepts is fixed by its [`FieldKind`] in the schema
/// and checked before mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderValue {
    /// Plain header text.
    Text(String),
    /// A single mailbox.
    Mailbox(Mailbox),
    /// An ordered mailbox list.
    MailboxList(Vec<Mailbox>),
}

impl HeaderValue {
    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the mailbox, if this is a single-mailbox value.
    #[must_use]
    pub fn as_mailbox(&self) -> Option<&Mailbox> {
        match self {
            Self::Mailbox(mailbox) => Some(mailbox),
            _ => None,
        }
    }

    /// Returns the mailbox list, if this is a list value.
    #[must_use]
    pub fn as_mailboxes(&self) -> Option<&[Mailbox]> {
        match self {
            Self::MailboxList(list) => Some(list),
            _ => None,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Mailbox> for HeaderValue {
    fn from(value: Mailbox) -> Self {
        Self::Mailbox(value)
    }
}

impl From<Vec<Mailbox>> for HeaderValue {
    fn from(value: Vec<Mailbox>) -> Self {
        Self::MailboxList(value)
    }
}

/// Default-value generators for auto-populated fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Generator {
    /// Current UTC time in RFC 1123 shape with the zone spelled `+0000`.
    Date,
    /// `<token@domain>`, domain taken from the `From` mailbox.
    MessageId,
    /// Literal `1.0`.
    MimeVersion,
}

/// Per-field behavior, dispatched by match at validation and render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Raw text, rendered verbatim.
    PlainText,
    /// Text, always rendered as an RFC 2047 encoded word.
    EncodedText,
    /// Exactly one mailbox.
    SingleMailbox,
    /// One mailbox, or an ordered list of them.
    MailboxList,
    /// Text with a default produced at dump time when unset.
    Generated(Generator),
    /// Caller-defined header, rendered verbatim.
    Custom,
}

impl FieldKind {
    /// Checks a candidate value against the shape this kind accepts.
    pub(crate) fn accepts(self, value: &HeaderValue) -> bool {
        match self {
            Self::PlainText | Self::EncodedText | Self::Generated(_) | Self::Custom => {
                matches!(value, HeaderValue::Text(_))
            }
            Self::SingleMailbox => matches!(value, HeaderValue::Mailbox(_)),
            // A bare mailbox is treated as a one-element list at render time.
            Self::MailboxList => {
                matches!(value, HeaderValue::Mailbox(_) | HeaderValue::MailboxList(_))
            }
        }
    }
}

/// Field value lifecycle.
///
/// `Unset` transitions to `Generated` at most once, on the first dump that
/// reaches the field; a user-set value never regenerates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldState {
    Unset,
    UserSet(HeaderValue),
    Generated(HeaderValue),
}

impl FieldState {
    /// Returns the current value, user-set or previously generated.
    pub(crate) fn value(&self) -> Option<&HeaderValue> {
        match self {
            Self::Unset => None,
            Self::UserSet(value) | Self::Generated(value) => Some(value),
        }
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
    fn test_value_conversions() {
        assert_eq!(
            HeaderValue::from("hello").as_text(),
            Some("hello")
        );

        let mailbox = Mailbox::new("user@example.com").unwrap();
        assert_eq!(
            HeaderValue::from(mailbox.clone()).as_mailbox(),
            Some(&mailbox)
        );

        let list = vec![mailbox.clone(), mailbox.clone()];
        assert_eq!(
            HeaderValue::from(list.clone()).as_mailboxes(),
            Some(list.as_slice())
        );
    }

    #[test]
    fn test_text_kinds_accept_text_only() {
        let text = HeaderValue::from("x");
        let mailbox = HeaderValue::from(Mailbox::new("user@example.com").unwrap());

        for kind in [
            FieldKind::PlainText,
            FieldKind::EncodedText,
            FieldKind::Generated(Generator::Date),
            FieldKind::Custom,
        ] {
            assert!(kind.accepts(&text));
            assert!(!kind.accepts(&mailbox));
        }
    }

    #[test]
    fn test_single_mailbox_rejects_list() {
        let mailbox = Mailbox::new("user@example.com").unwrap();
        let single = HeaderValue::from(mailbox.clone());
        let list = HeaderValue::from(vec![mailbox]);

        assert!(FieldKind::SingleMailbox.accepts(&single));
        assert!(!FieldKind::SingleMailbox.accepts(&list));
        assert!(!FieldKind::SingleMailbox.accepts(&HeaderValue::from("x")));
    }

    #[test]
    fn test_list_accepts_single_mailbox() {
        let mailbox = Mailbox::new("user@example.com").unwrap();
        assert!(FieldKind::MailboxList.accepts(&HeaderValue::from(mailbox.clone())));
        assert!(FieldKind::MailboxList.accepts(&HeaderValue::from(vec![mailbox])));
        assert!(!FieldKind::MailboxList.accepts(&HeaderValue::from("x")));
    }

    #[test]
    fn test_state_value() {
        assert!(FieldState::Unset.value().is_none());
        let value = HeaderValue::from("x");
        assert_eq!(FieldState::UserSet(value.clone()).value(), Some(&value));
        assert_eq!(FieldState::Generated(value.clone()).value(), Some(&value));
    }
}
