use crate::error::Error;
use crate::idmap::{IdIndex, IdMap};

/// Id of an interned element or attribute name.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct NameId(u32);

impl IdIndex<NameId> for NameId {
    fn to_id(index: usize) -> NameId {
        NameId(index as u32)
    }

    fn from_id(id: NameId) -> usize {
        id.0 as usize
    }
}

/// Names are kept verbatim, prefix included (`x:item`); no namespace is
/// resolved.
pub(crate) type NameLookup = IdMap<NameId, String>;

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Whether `name` matches the XML `Name` production.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

/// Reject element and attribute names that can't be written as markup.
pub(crate) fn check_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::InvalidArgument("name is empty".into()));
    }
    if !is_valid_name(name) {
        return Err(Error::InvalidArgument(format!(
            "\"{}\" is not a valid XML name",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["a", "_a", "x:item", "a-b.c1", "\u{e9}t\u{e9}", "xml:space"] {
            assert!(is_valid_name(name), "{}", name);
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "1a", "-a", "b c", "1<x", "a>", "a\"b", "a=b"] {
            assert!(!is_valid_name(name), "{:?}", name);
        }
    }
}
