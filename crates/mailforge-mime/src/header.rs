//! Ordered header registry and serialization.

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::field::{FieldKind, FieldState, Generator, HeaderValue};
use crate::mailbox::Mailbox;
use rand::Rng;

/// A registered header field: behavior flags plus current value.
#[derive(Debug, Clone)]
struct HeaderField {
    name: String,
    kind: FieldKind,
    required: bool,
    disabled: bool,
    state: FieldState,
}

impl HeaderField {
    fn schema(name: &str, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required,
            disabled: false,
            state: FieldState::Unset,
        }
    }
}

/// Ordered collection of header fields.
///
/// Field order is schema declaration order plus custom append order, and is
/// the literal output order of [`Headers::dump`] for the registry's whole
/// lifetime. Each name exists at most once; setting an existing name
/// mutates in place.
#[derive(Debug, Clone)]
pub struct Headers {
    fields: Vec<HeaderField>,
}

impl Headers {
    /// Creates a registry with the top-level message schema.
    ///
    /// The schema covers the RFC 4021 section 2.1 originator, destination
    /// and identification fields; anything else goes in as a custom header.
    #[must_use]
    pub fn message() -> Self {
        Self {
            fields: vec![
                HeaderField::schema("Date", FieldKind::Generated(Generator::Date), false),
                HeaderField::schema("From", FieldKind::SingleMailbox, true),
                HeaderField::schema("Sender", FieldKind::SingleMailbox, false),
                HeaderField::schema("Reply-To", FieldKind::SingleMailbox, false),
                HeaderField::schema("To", FieldKind::MailboxList, false),
                HeaderField::schema("Cc", FieldKind::MailboxList, false),
                HeaderField::schema("Bcc", FieldKind::MailboxList, false),
                HeaderField::schema(
                    "Message-ID",
                    FieldKind::Generated(Generator::MessageId),
                    false,
                ),
                HeaderField::schema("Subject", FieldKind::EncodedText, true),
                HeaderField::schema(
                    "MIME-Version",
                    FieldKind::Generated(Generator::MimeVersion),
                    false,
                ),
            ],
        }
    }

    /// Creates a registry with the content-part schema.
    ///
    /// All four fields are optional plain text with verbatim rendering.
    #[must_use]
    pub fn content() -> Self {
        Self {
            fields: vec![
                HeaderField::schema("Content-ID", FieldKind::PlainText, false),
                HeaderField::schema("Content-Type", FieldKind::PlainText, false),
                HeaderField::schema("Content-Transfer-Encoding", FieldKind::PlainText, false),
                HeaderField::schema("Content-Disposition", FieldKind::PlainText, false),
            ],
        }
    }

    fn find(&self, name: &str) -> Option<&HeaderField> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut HeaderField> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    /// Gets the current value for a header.
    ///
    /// Never triggers value generation; generation happens at dump time
    /// only.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.find(name).and_then(|field| field.state.value())
    }

    /// Sets a header value.
    ///
    /// Unknown names are registered as custom headers with the given value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeaderValue`] if the value does not match
    /// the field's shape, or [`Error::InvalidHeaderField`] if a custom
    /// header is given a non-text value. Nothing is mutated on failure.
    pub fn set(&mut self, name: &str, value: impl Into<HeaderValue>) -> Result<()> {
        let value = value.into();
        match self.find_mut(name) {
            Some(field) => {
                if !field.kind.accepts(&value) {
                    return Err(Error::InvalidHeaderValue(name.to_string()));
                }
                field.state = FieldState::UserSet(value);
                Ok(())
            }
            None => self.set_custom(name, value),
        }
    }

    /// Registers a custom header.
    ///
    /// Custom headers carry plain text only and render verbatim. A new
    /// name is appended after all existing fields; an existing name is
    /// replaced in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeaderField`] if the value is not plain
    /// text.
    pub fn set_custom(&mut self, name: &str, value: impl Into<HeaderValue>) -> Result<()> {
        let value = value.into();
        if value.as_text().is_none() {
            return Err(Error::InvalidHeaderField(
                "Custom header must have a text value".to_string(),
            ));
        }

        match self.find_mut(name) {
            Some(field) => {
                field.kind = FieldKind::Custom;
                field.required = false;
                field.state = FieldState::UserSet(value);
            }
            None => self.fields.push(HeaderField {
                name: name.to_string(),
                kind: FieldKind::Custom,
                required: false,
                disabled: false,
                state: FieldState::UserSet(value),
            }),
        }
        Ok(())
    }

    /// Enables or disables a field.
    ///
    /// Disabled fields are skipped entirely by [`Headers::dump`], whatever
    /// their value or required flag. Unknown names are ignored.
    pub fn set_disabled(&mut self, name: &str, disabled: bool) {
        if let Some(field) = self.find_mut(name) {
            field.disabled = disabled;
        }
    }

    /// Iterates all field names and current values in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&HeaderValue>)> {
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.state.value()))
    }

    /// Serializes the header block.
    ///
    /// Fields render in registry order as `Name: value` lines joined by the
    /// environment's line terminator, without a trailing terminator. Unset
    /// generator-backed fields materialize their value on the first call
    /// and keep it afterwards, so repeated dumps produce identical text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeader`] if a required field has neither a
    /// value nor a generator. A failed dump produces no text; values set
    /// before the failure stay set.
    pub fn dump(&mut self, env: &impl Environment) -> Result<String> {
        let mut lines = String::new();

        for index in 0..self.fields.len() {
            if self.fields[index].disabled {
                continue;
            }

            if self.fields[index].state.value().is_none() {
                match self.fields[index].kind {
                    FieldKind::Generated(generator) => {
                        let generated = self.generate(generator)?;
                        self.fields[index].state =
                            FieldState::Generated(HeaderValue::Text(generated));
                    }
                    _ if self.fields[index].required => {
                        return Err(Error::MissingHeader(self.fields[index].name.clone()));
                    }
                    _ => continue,
                }
            }

            let field = &self.fields[index];
            lines.push_str(&field.name);
            lines.push_str(": ");
            lines.push_str(&render(field, env));
            lines.push_str(env.eol());
        }

        match lines.strip_suffix(env.eol()) {
            Some(stripped) => Ok(stripped.to_string()),
            None => Ok(lines),
        }
    }

    fn generate(&self, generator: Generator) -> Result<String> {
        match generator {
            Generator::Date => Ok(chrono::Utc::now()
                .format("%a, %d %b %Y %H:%M:%S +0000")
                .to_string()),
            Generator::MessageId => {
                let from = self
                    .get("From")
                    .and_then(HeaderValue::as_mailbox)
                    .ok_or_else(|| Error::MissingHeader("From".to_string()))?;
                Ok(format!("<{}@{}>", random_token(), from.addr_domain()))
            }
            Generator::MimeVersion => Ok("1.0".to_string()),
        }
    }
}

/// Random lowercase base-36 token for Message-ID uniqueness.
fn random_token() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..12)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn render(field: &HeaderField, env: &impl Environment) -> String {
    let Some(value) = field.state.value() else {
        return String::new();
    };

    match field.kind {
        FieldKind::PlainText | FieldKind::Generated(_) | FieldKind::Custom => {
            value.as_text().unwrap_or_default().to_string()
        }
        FieldKind::EncodedText => value
            .as_text()
            .map(|text| encode_word(text, env))
            .unwrap_or_default(),
        FieldKind::SingleMailbox => value
            .as_mailbox()
            .map(|mailbox| render_mailbox(mailbox, env))
            .unwrap_or_default(),
        FieldKind::MailboxList => match value {
            HeaderValue::Mailbox(mailbox) => render_mailbox(mailbox, env),
            HeaderValue::MailboxList(list) => list
                .iter()
                .map(|mailbox| render_mailbox(mailbox, env))
                .collect::<Vec<_>>()
                .join(&format!(",{} ", env.eol())),
            HeaderValue::Text(_) => String::new(),
        },
    }
}

/// Renders a mailbox, word-encoding the display name when present.
fn render_mailbox(mailbox: &Mailbox, env: &impl Environment) -> String {
    match mailbox.name() {
        Some(name) if !name.is_empty() => {
            format!("{} <{}>", encode_word(name, env), mailbox.addr())
        }
        _ => mailbox.to_string(),
    }
}

/// RFC 2047 encoded word with a Base64 payload.
fn encode_word(text: &str, env: &impl Environment) -> String {
    format!("=?utf-8?B?{}?=", env.to_base64(text))
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
    use crate::environment::StandardEnvironment;
    use proptest::prelude::*;

    const ENV: StandardEnvironment = StandardEnvironment;

    #[test]
    fn test_get_unset_returns_none() {
        let headers = Headers::message();
        assert!(headers.get("Date").is_none());
        assert!(headers.get("Subject").is_none());
        assert!(headers.get("X-Unknown").is_none());
    }

    #[test]
    fn test_set_and_get_mailbox() {
        let mut headers = Headers::message();
        let mailbox = Mailbox::new("test@test.com").unwrap();
        headers.set("From", mailbox.clone()).unwrap();
        assert_eq!(headers.get("From").and_then(HeaderValue::as_mailbox), Some(&mailbox));
    }

    #[test]
    fn test_dump_full_block() {
        let mut headers = Headers::message();
        headers.set("From", Mailbox::new("test@test.com").unwrap()).unwrap();
        headers.set("To", Mailbox::new("to@test.com").unwrap()).unwrap();
        headers
            .set(
                "Cc",
                vec![
                    Mailbox::new("cc@test.com").unwrap(),
                    Mailbox::new("cc2@test.com").unwrap(),
                ],
            )
            .unwrap();
        headers
            .set(
                "Bcc",
                vec![
                    Mailbox::new("bcc@test.com").unwrap(),
                    Mailbox::new("bcc2@test.com").unwrap(),
                ],
            )
            .unwrap();
        headers.set("Subject", "Testing").unwrap();
        headers.set("Date", "Wed, 22 Mar 2023 12:12:02 +0000").unwrap();
        headers.set("Message-ID", "<qjuijvi0ie@test.com>").unwrap();
        headers.set("X-Custom", "true").unwrap();
        headers.set_custom("X-Something", "thing").unwrap();

        let dump = headers.dump(&ENV).unwrap();
        assert_eq!(
            dump,
            concat!(
                "Date: Wed, 22 Mar 2023 12:12:02 +0000\r\n",
                "From: <test@test.com>\r\n",
                "To: <to@test.com>\r\n",
                "Cc: <cc@test.com>,\r\n",
                " <cc2@test.com>\r\n",
                "Bcc: <bcc@test.com>,\r\n",
                " <bcc2@test.com>\r\n",
                "Message-ID: <qjuijvi0ie@test.com>\r\n",
                "Subject: =?utf-8?B?VGVzdGluZw==?=\r\n",
                "MIME-Version: 1.0\r\n",
                "X-Custom: true\r\n",
                "X-Something: thing",
            )
        );
    }

    #[test]
    fn test_dump_missing_from() {
        let mut headers = Headers::message();
        headers.set("Subject", "Testing").unwrap();
        let err = headers.dump(&ENV).unwrap_err();
        assert!(matches!(err, Error::MissingHeader(name) if name == "From"));
    }

    #[test]
    fn test_dump_missing_subject() {
        let mut headers = Headers::message();
        headers.set("From", Mailbox::new("test@test.com").unwrap()).unwrap();
        let err = headers.dump(&ENV).unwrap_err();
        assert!(matches!(err, Error::MissingHeader(name) if name == "Subject"));
    }

    #[test]
    fn test_set_rejects_wrong_shape() {
        let mut headers = Headers::message();
        let err = headers.set("Sender", "some").unwrap_err();
        assert!(matches!(err, Error::InvalidHeaderValue(name) if name == "Sender"));

        headers.set("From", Mailbox::new("from@test.com").unwrap()).unwrap();
        let err = headers
            .set(
                "From",
                vec![
                    Mailbox::new("from@test.com").unwrap(),
                    Mailbox::new("from2@test.com").unwrap(),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeaderValue(_)));

        // The rejected assignment left the previous value alone.
        assert_eq!(
            headers.get("From").and_then(HeaderValue::as_mailbox).map(Mailbox::addr),
            Some("from@test.com")
        );
    }

    #[test]
    fn test_set_custom_rejects_non_text() {
        let mut headers = Headers::message();
        let err = headers
            .set_custom("X-Box", Mailbox::new("x@test.com").unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeaderField(_)));
        assert!(headers.get("X-Box").is_none());
    }

    #[test]
    fn test_set_custom_overwrites_in_place() {
        let mut headers = Headers::message();
        headers.set_custom("X-Foo", "bar").unwrap();
        headers.set_custom("X-Bar", "one").unwrap();
        headers.set_custom("X-Foo", "baz").unwrap();

        let customs: Vec<_> = headers
            .iter()
            .filter(|(name, _)| name.starts_with("X-"))
            .collect();
        assert_eq!(customs.len(), 2);
        assert_eq!(customs[0].0, "X-Foo");
        assert_eq!(customs[0].1.and_then(HeaderValue::as_text), Some("baz"));
        assert_eq!(customs[1].0, "X-Bar");
    }

    #[test]
    fn test_disabled_field_is_skipped() {
        let mut headers = Headers::message();
        headers.set("From", Mailbox::new("test@test.com").unwrap()).unwrap();
        headers.set("Subject", "Testing").unwrap();
        headers.set_disabled("MIME-Version", true);

        let dump = headers.dump(&ENV).unwrap();
        assert!(!dump.contains("MIME-Version"));
    }

    #[test]
    fn test_disabled_required_field_does_not_fail() {
        let mut headers = Headers::message();
        headers.set("From", Mailbox::new("test@test.com").unwrap()).unwrap();
        headers.set_disabled("Subject", true);

        let dump = headers.dump(&ENV).unwrap();
        assert!(!dump.contains("Subject"));
    }

    #[test]
    fn test_display_name_is_word_encoded() {
        let mut headers = Headers::message();
        headers
            .set("From", Mailbox::with_name("John Doe", "john@example.com").unwrap())
            .unwrap();
        headers.set("Subject", "Testing").unwrap();

        let dump = headers.dump(&ENV).unwrap();
        assert!(dump.contains("From: =?utf-8?B?Sm9obiBEb2U=?= <john@example.com>"));
    }

    #[test]
    fn test_generated_date_parses_back() {
        let mut headers = Headers::message();
        headers.set("From", Mailbox::new("test@test.com").unwrap()).unwrap();
        headers.set("Subject", "Testing").unwrap();

        let dump = headers.dump(&ENV).unwrap();
        let date_line = dump
            .lines()
            .find(|line| line.starts_with("Date: "))
            .unwrap();
        let date = date_line.trim_start_matches("Date: ");
        assert!(date.ends_with("+0000"));
        assert!(chrono::DateTime::parse_from_str(date, "%a, %d %b %Y %H:%M:%S %z").is_ok());
    }

    #[test]
    fn test_generated_message_id_uses_from_domain() {
        let mut headers = Headers::message();
        headers.set("From", Mailbox::new("test@test.com").unwrap()).unwrap();
        headers.set("Subject", "Testing").unwrap();

        let dump = headers.dump(&ENV).unwrap();
        let id_line = dump
            .lines()
            .find(|line| line.starts_with("Message-ID: "))
            .unwrap();
        let id = id_line.trim_start_matches("Message-ID: ");
        let (token, domain) = id
            .strip_prefix('<')
            .and_then(|id| id.strip_suffix('>'))
            .and_then(|id| id.split_once('@'))
            .unwrap();
        assert_eq!(domain, "test.com");
        assert!(!token.is_empty());
        assert!(token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_message_id_generation_requires_from() {
        let headers = Headers::message();
        let err = headers.generate(Generator::MessageId).unwrap_err();
        assert!(matches!(err, Error::MissingHeader(name) if name == "From"));
    }

    #[test]
    fn test_dump_freezes_generated_values() {
        let mut headers = Headers::message();
        headers.set("From", Mailbox::new("test@test.com").unwrap()).unwrap();
        headers.set("Subject", "Testing").unwrap();

        assert!(headers.get("MIME-Version").is_none());
        let first = headers.dump(&ENV).unwrap();
        assert_eq!(
            headers.get("MIME-Version").and_then(HeaderValue::as_text),
            Some("1.0")
        );

        // Date and Message-ID were materialized once and stay put.
        let second = headers.dump(&ENV).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iter_in_registry_order() {
        let mut headers = Headers::message();
        headers.set("X-Last", "1").unwrap();
        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names.first(), Some(&"Date"));
        assert_eq!(names.last(), Some(&"X-Last"));
        assert_eq!(names.len(), 11);
    }

    proptest! {
        #[test]
        fn prop_custom_header_round_trips(
            name in "X-[A-Za-z0-9-]{1,16}",
            value in "[ -~]{0,64}",
        ) {
            let mut headers = Headers::message();
            headers.set(&name, value.as_str()).unwrap();
            prop_assert_eq!(
                headers.get(&name).and_then(HeaderValue::as_text),
                Some(value.as_str())
            );
        }

        #[test]
        fn prop_dump_is_idempotent(subject in "[ -~]{1,64}") {
            let mut headers = Headers::message();
            headers.set("From", Mailbox::new("a@b.test").unwrap()).unwrap();
            headers.set("Subject", subject.as_str()).unwrap();
            let first = headers.dump(&ENV).unwrap();
            let second = headers.dump(&ENV).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
