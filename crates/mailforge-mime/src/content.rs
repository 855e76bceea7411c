//! Content part: a restricted header set over a raw body payload.

use crate::environment::Environment;
use crate::error::Result;
use crate::field::HeaderValue;
use crate::header::Headers;

/// A MIME body segment with its own content headers.
///
/// The headers are scoped to the content schema (`Content-ID`,
/// `Content-Type`, `Content-Transfer-Encoding`, `Content-Disposition`);
/// the body is carried as-is, raw or pre-encoded by the caller.
#[derive(Debug, Clone)]
pub struct ContentPart {
    headers: Headers,
    data: String,
}

impl ContentPart {
    /// Creates a content part over a body payload.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            headers: Headers::content(),
            data: data.into(),
        }
    }

    /// Creates a content part and applies initial headers in iteration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if any header value is rejected.
    pub fn with_headers<N, V>(
        data: impl Into<String>,
        headers: impl IntoIterator<Item = (N, V)>,
    ) -> Result<Self>
    where
        N: AsRef<str>,
        V: Into<HeaderValue>,
    {
        let mut part = Self::new(data);
        part.set_headers(headers)?;
        Ok(part)
    }

    /// Returns the body payload.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Serializes the part: header block, blank line, body.
    ///
    /// # Errors
    ///
    /// Returns an error if the header block fails to serialize.
    pub fn dump(&mut self, env: &impl Environment) -> Result<String> {
        let eol = env.eol();
        Ok(format!("{}{eol}{eol}{}", self.headers.dump(env)?, self.data))
    }

    /// True if `Content-Disposition` marks this part as an attachment.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.disposition_contains("attachment")
    }

    /// True if `Content-Disposition` marks this part as inline.
    #[must_use]
    pub fn is_inline_attachment(&self) -> bool {
        self.disposition_contains("inline")
    }

    // Substring match on the raw disposition text, not a parameter parse.
    fn disposition_contains(&self, marker: &str) -> bool {
        self.headers
            .get("Content-Disposition")
            .and_then(HeaderValue::as_text)
            .is_some_and(|text| text.contains(marker))
    }

    /// Sets one header.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is rejected.
    pub fn set_header(&mut self, name: &str, value: impl Into<HeaderValue>) -> Result<()> {
        self.headers.set(name, value)
    }

    /// Gets one header value.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Sets a batch of headers in iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error on the first rejected value; headers applied
    /// before it stay set.
    pub fn set_headers<N, V>(&mut self, headers: impl IntoIterator<Item = (N, V)>) -> Result<()>
    where
        N: AsRef<str>,
        V: Into<HeaderValue>,
    {
        for (name, value) in headers {
            self.headers.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Snapshot of all header names and current values in registry order.
    #[must_use]
    pub fn get_headers(&self) -> Vec<(&str, Option<&HeaderValue>)> {
        self.headers.iter().collect()
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
    use crate::environment::StandardEnvironment;

    const ENV: StandardEnvironment = StandardEnvironment;
    const SAMPLE_BASE64: &str = "c2FtcGxlLWJ5dGVz";

    #[test]
    fn test_plain_text_content() {
        let mut content =
            ContentPart::with_headers("hello there", [("Content-Type", "plain/text")]).unwrap();

        assert!(!content.is_attachment());
        assert_eq!(
            content.get_header("Content-Type").and_then(HeaderValue::as_text),
            Some("plain/text")
        );
        assert_eq!(
            content.dump(&ENV).unwrap(),
            "Content-Type: plain/text\r\n\r\nhello there"
        );
    }

    #[test]
    fn test_base64_encoded_attachment() {
        let mut content = ContentPart::with_headers(
            SAMPLE_BASE64,
            [
                ("Content-Type", "image/jpg; charset=UTF-8"),
                ("Content-Transfer-Encoding", "base64"),
                ("Content-Disposition", "attachment;filename=\"sample.jpg\""),
            ],
        )
        .unwrap();

        assert!(content.is_attachment());
        assert!(!content.is_inline_attachment());
        assert_eq!(
            content.dump(&ENV).unwrap(),
            concat!(
                "Content-Type: image/jpg; charset=UTF-8\r\n",
                "Content-Transfer-Encoding: base64\r\n",
                "Content-Disposition: attachment;filename=\"sample.jpg\"\r\n",
                "\r\n",
                "c2FtcGxlLWJ5dGVz",
            )
        );
    }

    #[test]
    fn test_inline_attachment() {
        let content = ContentPart::with_headers(
            SAMPLE_BASE64,
            [
                ("Content-Type", "image/jpg; charset=UTF-8"),
                ("Content-Transfer-Encoding", "base64"),
                ("Content-Disposition", "inline;filename=\"sample.jpg\""),
            ],
        )
        .unwrap();

        assert!(content.is_inline_attachment());
        assert!(!content.is_attachment());
    }

    #[test]
    fn test_no_disposition_is_neither() {
        let content = ContentPart::new("hello");
        assert!(!content.is_attachment());
        assert!(!content.is_inline_attachment());
    }

    #[test]
    fn test_set_header_unknown_name_registers_custom() {
        let mut content = ContentPart::new("hello");
        content.set_header("X-Part-Id", "p1").unwrap();
        assert_eq!(
            content.get_header("X-Part-Id").and_then(HeaderValue::as_text),
            Some("p1")
        );
    }

    #[test]
    fn test_get_headers_snapshot() {
        let mut content = ContentPart::new("hello");
        content.set_header("Content-Type", "text/plain").unwrap();

        let headers = content.get_headers();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[0].0, "Content-ID");
        assert!(headers[0].1.is_none());
        assert_eq!(
            headers[1].1.and_then(HeaderValue::as_text),
            Some("text/plain")
        );
    }

    #[test]
    fn test_data_accessor() {
        let content = ContentPart::new("payload");
        assert_eq!(content.data(), "payload");
    }
}
