use std::borrow::Cow;

use crate::error::{ParseError, Span};

/// Decode predefined entities (`&amp;` and friends) and character references
/// (`&#65;`, `&#x41;`).
pub(crate) fn parse_entities(content: &str, span: Span) -> Result<Cow<'_, str>, ParseError> {
    if !content.contains('&') {
        return Ok(content.into());
    }
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }
        let mut entity = String::new();
        let mut is_complete = false;
        for c in chars.by_ref() {
            if c == ';' {
                is_complete = true;
                break;
            }
            entity.push(c);
        }
        if !is_complete {
            return Err(ParseError::UnclosedEntity { entity, span });
        }
        match entity.as_str() {
            "amp" => result.push('&'),
            "apos" => result.push('\''),
            "gt" => result.push('>'),
            "lt" => result.push('<'),
            "quot" => result.push('"'),
            _ => match parse_char_reference(&entity) {
                Some(c) => result.push(c),
                None => return Err(ParseError::InvalidEntity { entity, span }),
            },
        }
    }
    Ok(result.into())
}

fn parse_char_reference(entity: &str) -> Option<char> {
    let code = entity.strip_prefix('#')?;
    let code = if let Some(hex) = code.strip_prefix('x') {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        code.parse::<u32>().ok()?
    };
    char::from_u32(code).filter(|c| *c != '\0')
}

/// Turn CRLF and lone CR into LF. Runs on raw markup, before entities are
/// decoded, so `&#13;` survives.
pub(crate) fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n").into()
    } else {
        text.into()
    }
}

/// Decode an attribute value: line ends are normalized, literal tab and
/// newline become spaces, then entities are decoded.
pub(crate) fn parse_attribute(content: &str, span: Span) -> Result<Cow<'_, str>, ParseError> {
    if content.contains(['\t', '\n', '\r']) {
        let normalized = normalize_newlines(content).replace(['\t', '\n'], " ");
        return Ok(parse_entities(&normalized, span)?.into_owned().into());
    }
    parse_entities(content, span)
}

pub(crate) fn serialize_text(content: Cow<'_, str>) -> Cow<'_, str> {
    if !content.contains(['&', '<', '>', '\r']) {
        return content;
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\r' => result.push_str("&#xD;"),
            _ => result.push(c),
        }
    }
    result.into()
}

pub(crate) fn serialize_attribute(content: Cow<'_, str>) -> Cow<'_, str> {
    if !content.contains(['&', '<', '>', '"', '\t', '\n', '\r']) {
        return content;
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\t' => result.push_str("&#x9;"),
            '\n' => result.push_str("&#xA;"),
            '\r' => result.push_str("&#xD;"),
            _ => result.push(c),
        }
    }
    result.into()
}
