use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use xhtmlchardet::detect;

use crate::error::ParseError;

/// Detect the encoding of XML input from its byte order mark, its first
/// bytes or its declaration.
pub(crate) fn encoding(data: &[u8], hint: Option<String>) -> Option<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return Some(encoding);
    }
    let mut cursor = std::io::Cursor::new(data);
    let charsets = detect(&mut cursor, hint).ok()?;
    // no encoding detected
    let label = if charsets.is_empty() {
        "UTF-8"
    } else {
        &charsets[0]
    };
    Encoding::for_label(label.as_bytes())
}

/// Decode input bytes. A byte order mark overrides the given encoding.
pub(crate) fn decode<'a>(
    data: &'a [u8],
    encoding: Option<&'static Encoding>,
) -> Result<(Cow<'a, str>, &'static Encoding), ParseError> {
    let encoding = encoding
        .or_else(|| self::encoding(data, None))
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(data);
    if had_errors {
        return Err(ParseError::InvalidEncoding(used.name().to_string()));
    }
    Ok((text, used))
}

/// Encode serialized output.
///
/// UTF-16 output starts with a byte order mark. Characters the target
/// encoding can't represent are written as numeric character references.
pub(crate) fn encode<'a>(text: &'a str, encoding: &'static Encoding) -> Cow<'a, [u8]> {
    if encoding == UTF_16LE || encoding == UTF_16BE {
        let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
        let little_endian = encoding == UTF_16LE;
        for unit in std::iter::once(0xFEFF_u16).chain(text.encode_utf16()) {
            if little_endian {
                bytes.extend_from_slice(&unit.to_le_bytes());
            } else {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
        }
        return bytes.into();
    }
    let (bytes, _, _) = encoding.encode(text);
    bytes
}
