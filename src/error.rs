use std::fmt;
use std::ops::Range;

/// A byte range in the parsed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub(crate) fn from_strspan(span: xmlparser::StrSpan) -> Self {
        Span::new(span.start(), span.end())
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// Errors that can occur while turning markup into a tree.
#[derive(Debug)]
pub enum ParseError {
    /// The tokenizer rejected the input.
    XmlParser(xmlparser::Error),
    /// A close tag doesn't match the open tag.
    InvalidCloseTag {
        /// Name of the element that is open.
        expected: String,
        /// Name found in the close tag.
        found: String,
        /// Where the close tag name is.
        span: Span,
    },
    /// Input ended while an element was still open.
    UnclosedTag(Span),
    /// The same attribute appears twice on one element.
    DuplicateAttribute {
        /// The attribute name.
        name: String,
        /// Where the second occurrence is.
        span: Span,
    },
    /// An entity reference without a closing `;`.
    UnclosedEntity {
        /// The text after `&`.
        entity: String,
        /// Where the text containing the entity is.
        span: Span,
    },
    /// An entity reference that is not predefined or a valid character
    /// reference.
    InvalidEntity {
        /// The entity name.
        entity: String,
        /// Where the text containing the entity is.
        span: Span,
    },
    /// Document type declarations are not supported.
    DtdUnsupported(Span),
    /// A second top-level element.
    MultipleRootElements(Span),
    /// There is no document element at all.
    NoRootElement,
    /// The bytes could not be decoded with the detected or given encoding.
    InvalidEncoding(String),
}

impl ParseError {
    /// The span in the input where the problem was found.
    ///
    /// Tokenizer errors only know a row and column, so they report an empty
    /// span.
    pub fn span(&self) -> Span {
        match self {
            ParseError::InvalidCloseTag { span, .. }
            | ParseError::DuplicateAttribute { span, .. }
            | ParseError::UnclosedEntity { span, .. }
            | ParseError::InvalidEntity { span, .. } => *span,
            ParseError::UnclosedTag(span)
            | ParseError::DtdUnsupported(span)
            | ParseError::MultipleRootElements(span) => *span,
            ParseError::XmlParser(_)
            | ParseError::NoRootElement
            | ParseError::InvalidEncoding(_) => Span::new(0, 0),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::XmlParser(e) => write!(f, "{}", e),
            ParseError::InvalidCloseTag {
                expected, found, ..
            } => write!(f, "expected close tag for \"{}\", found \"{}\"", expected, found),
            ParseError::UnclosedTag(_) => write!(f, "unclosed tag at end of input"),
            ParseError::DuplicateAttribute { name, .. } => {
                write!(f, "duplicate attribute \"{}\"", name)
            }
            ParseError::UnclosedEntity { entity, .. } => {
                write!(f, "unclosed entity \"&{}\"", entity)
            }
            ParseError::InvalidEntity { entity, .. } => {
                write!(f, "invalid entity \"&{};\"", entity)
            }
            ParseError::DtdUnsupported(_) => write!(f, "DTD is not supported"),
            ParseError::MultipleRootElements(_) => write!(f, "more than one document element"),
            ParseError::NoRootElement => write!(f, "no document element"),
            ParseError::InvalidEncoding(name) => {
                write!(f, "input is not valid {}", name)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::XmlParser(e) => Some(e),
            _ => None,
        }
    }
}

/// The broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed markup, coercion of an absent or empty value, or a strict
    /// lookup that found nothing.
    Parse,
    /// A required argument was missing or unset.
    InvalidArgument,
    /// A structurally invalid mutation.
    UnsupportedOperation,
    /// A type name that is not registered.
    ClassNotFound,
    /// A registered type that cannot be constructed as requested.
    Instantiation,
    /// Reading or writing failed.
    Io,
}

/// Errors returned by this crate.
#[derive(Debug)]
pub enum Error {
    /// The markup could not be parsed.
    Parse(ParseError),
    /// A coercion was attempted on a value that does not exist.
    AbsentValue,
    /// A typed coercion was attempted on an empty value.
    EmptyValue,
    /// The text could not be parsed as the requested type.
    InvalidValue {
        /// The text.
        value: String,
        /// The requested type.
        target: &'static str,
        /// What the type's parser reported.
        reason: String,
    },
    /// The strict child accessor found no child with this name.
    NodeNotFound(String),
    /// The strict attribute accessor found no attribute with this name.
    AttributeNotFound(String),
    /// A required argument was empty or unset.
    InvalidArgument(String),
    /// A write was directed at a placeholder node with this name.
    PlaceholderTarget(String),
    /// The operation is not allowed on this node.
    UnsupportedOperation(String),
    /// A placeholder node with this name cannot be copied, moved or removed.
    PlaceholderSource(String),
    /// No type is registered under this name.
    ClassNotFound(String),
    /// The type with this name could not be constructed.
    Instantiation(String),
    /// An I/O error.
    Io(std::io::Error),
}

impl Error {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_)
            | Error::AbsentValue
            | Error::EmptyValue
            | Error::InvalidValue { .. }
            | Error::NodeNotFound(_)
            | Error::AttributeNotFound(_) => ErrorKind::Parse,
            Error::InvalidArgument(_) | Error::PlaceholderTarget(_) => ErrorKind::InvalidArgument,
            Error::UnsupportedOperation(_) | Error::PlaceholderSource(_) => {
                ErrorKind::UnsupportedOperation
            }
            Error::ClassNotFound(_) => ErrorKind::ClassNotFound,
            Error::Instantiation(_) => ErrorKind::Instantiation,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// The underlying parse error, if this is a markup error.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "parse error: {}", e),
            Error::AbsentValue => write!(f, "can't parse absent value"),
            Error::EmptyValue => write!(f, "can't parse empty value"),
            Error::InvalidValue {
                value,
                target,
                reason,
            } => write!(f, "can't parse \"{}\" as {}: {}", value, target, reason),
            Error::NodeNotFound(name) => write!(f, "\"{}\" node is not found", name),
            Error::AttributeNotFound(name) => write!(f, "\"{}\" attribute is not found", name),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::PlaceholderTarget(name) => {
                write!(f, "\"{}\" does not exist and can't be written to", name)
            }
            Error::UnsupportedOperation(msg) => write!(f, "unsupported operation: {}", msg),
            Error::PlaceholderSource(name) => write!(f, "\"{}\" does not exist", name),
            Error::ClassNotFound(name) => write!(f, "type \"{}\" is not registered", name),
            Error::Instantiation(name) => write!(f, "can't instantiate \"{}\"", name),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    #[inline]
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::Parse(ParseError::XmlParser(e))
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<indextree::NodeError> for Error {
    #[inline]
    fn from(e: indextree::NodeError) -> Self {
        Error::UnsupportedOperation(e.to_string())
    }
}
