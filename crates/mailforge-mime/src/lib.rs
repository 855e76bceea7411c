//! # mailforge-mime
//!
//! MIME message generation library for email.
//!
//! ## Features
//!
//! - **Header schema**: RFC 5322 header fields with per-field validation,
//!   requiredness, and stable output ordering
//! - **Encoded words**: RFC 2047 `=?utf-8?B?...?=` rendering for display
//!   names and subjects
//! - **Generated fields**: `Date`, `Message-ID` and `MIME-Version` defaults
//!   materialized at serialization time
//! - **Content parts**: RFC 2045 body segments with attachment
//!   classification
//!
//! ## Quick Start
//!
//! ### Building a Header Block
//!
//! ```ignore
//! use mailforge_mime::{Headers, Mailbox, StandardEnvironment};
//!
//! let env = StandardEnvironment;
//! let mut headers = Headers::message();
//! headers.set("From", Mailbox::with_name("Sender", "sender@example.com")?)?;
//! headers.set("To", Mailbox::new("recipient@example.com")?)?;
//! headers.set("Subject", "Hello")?;
//!
//! println!("{}", headers.dump(&env)?);
//! ```
//!
//! ### Custom Headers
//!
//! ```ignore
//! use mailforge_mime::Headers;
//!
//! let mut headers = Headers::message();
//! headers.set_custom("X-Mailer", "mailforge")?;
//! ```
//!
//! ### Content Parts
//!
//! ```ignore
//! use mailforge_mime::{ContentPart, StandardEnvironment};
//!
//! let env = StandardEnvironment;
//! let mut part = ContentPart::with_headers(
//!     "hello there",
//!     [("Content-Type", "text/plain; charset=utf-8")],
//! )?;
//!
//! println!("{}", part.dump(&env)?);
//! ```
//!
//! ### Custom Environments
//!
//! Serialization is parameterized over an [`Environment`] supplying Base64
//! encoding and the line terminator, so hosts with their own platform
//! services can inject them instead of using [`StandardEnvironment`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content;
mod error;
mod field;
mod header;
mod mailbox;

pub mod environment;

pub use content::ContentPart;
pub use environment::{Environment, StandardEnvironment};
pub use error::{Error, Result};
pub use field::HeaderValue;
pub use header::Headers;
pub use mailbox::Mailbox;
