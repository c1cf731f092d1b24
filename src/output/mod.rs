//! Control how documents are serialized.
//!
//! ```rust
//! use fluxml::output::{Format, LineSeparator, Parameters};
//!
//! let doc = fluxml::Document::parse("<root><data>foobar</data></root>")?;
//! let text = doc.to_text(&Parameters {
//!     format: Format::Compact,
//!     line_separator: LineSeparator::Lf,
//!     ..Default::default()
//! });
//! assert_eq!(
//!     text,
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root><data>foobar</data></root>\n"
//! );
//! # Ok::<(), fluxml::Error>(())
//! ```
mod pretty;
mod xml_serializer;

use encoding_rs::{Encoding, UTF_8};

pub(crate) use pretty::{Layout, Pretty};
pub(crate) use xml_serializer::XmlSerializer;

/// Layout of serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Indented with two spaces per level, one element per line; text is
    /// trimmed.
    #[default]
    Standard,
    /// No indentation and no line breaks inside the document element; text
    /// whitespace is normalized.
    Compact,
}

/// The line break written after the declaration, after top-level items, and
/// between indented lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineSeparator {
    /// `\r\n`
    #[default]
    Crlf,
    /// `\n`
    Lf,
    /// `\r\n` on Windows, `\n` elsewhere.
    Platform,
}

impl LineSeparator {
    /// The separator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineSeparator::Crlf => "\r\n",
            LineSeparator::Lf => "\n",
            LineSeparator::Platform => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

/// Serialization parameters.
///
/// The declaration names `encoding` by its canonical name. When writing bytes
/// the text is encoded with it as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    /// Layout of the output.
    pub format: Format,
    /// Output charset.
    pub encoding: &'static Encoding,
    /// Line break style.
    pub line_separator: LineSeparator,
}

impl Parameters {
    /// Standard format, UTF-8.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Compact format, UTF-8.
    pub fn compact() -> Self {
        Parameters {
            format: Format::Compact,
            ..Default::default()
        }
    }

    /// These parameters with another encoding.
    pub fn with_encoding(self, encoding: &'static Encoding) -> Self {
        Parameters { encoding, ..self }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            format: Format::Standard,
            encoding: UTF_8,
            line_separator: LineSeparator::Crlf,
        }
    }
}
