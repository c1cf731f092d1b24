//! Proptest support.
//!
//! Proptests allow you to test for *properties* of your code that must hold
//! for arbitrary data. This module helps you write one by generating
//! arbitrary well-formed XML documents.
//!
//! This can be enabled by adding the `proptest` feature to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! fluxml = { version = "0.1", features = ["proptest"] }
//! ```
//!
//! See the [`proptest`](https://docs.rs/proptest/latest/proptest/)
//! documentation for more information.

use ahash::HashSet;
use proptest::prelude::*;

const ELEMENT_NAMES: &[&str] = &["a", "b", "c", "x:d"];
const ATTRIBUTE_NAMES: &[&str] = &["q", "r", "x:s"];
const PI_TARGETS: &[&str] = &["pi1", "pi2", "pi3"];
const TEXT: &str = "[a-z <>&\"'\n\t]{0,12}";
const ATTRIBUTE_VALUE: &str = "[a-z <>&\"'\n\t]{0,8}";
const COMMENT: &str = "[a-z ]{0,10}";
const PI_DATA: &str = "[a-z]{1,8}";

/// A generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbDocument {
    /// Comments and processing instructions before the document element.
    pub before: Vec<ArbContent>,
    pub document_element: ArbElement,
    /// Comments and processing instructions after the document element.
    pub after: Vec<ArbContent>,
}

/// A generated element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbElement {
    pub name: String,
    /// Unique names, in order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<ArbContent>,
}

/// Generated element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArbContent {
    Text(String),
    Comment(String),
    ProcessingInstruction(String, Option<String>),
    Element(ArbElement),
}

fn escape(text: &str, attribute: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if attribute => result.push_str("&quot;"),
            '\t' if attribute => result.push_str("&#9;"),
            '\n' if attribute => result.push_str("&#10;"),
            _ => result.push(c),
        }
    }
    result
}

impl ArbDocument {
    /// Render as markup, without declaration.
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        for content in &self.before {
            content.write(&mut xml);
        }
        self.document_element.write(&mut xml);
        for content in &self.after {
            content.write(&mut xml);
        }
        xml
    }
}

impl ArbElement {
    fn write(&self, xml: &mut String) {
        xml.push('<');
        xml.push_str(&self.name);
        for (name, value) in &self.attributes {
            xml.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
        }
        xml.push('>');
        for child in &self.children {
            child.write(xml);
        }
        xml.push_str(&format!("</{}>", self.name));
    }
}

impl ArbContent {
    fn write(&self, xml: &mut String) {
        match self {
            ArbContent::Text(text) => xml.push_str(&escape(text, false)),
            ArbContent::Comment(comment) => xml.push_str(&format!("<!--{}-->", comment)),
            ArbContent::ProcessingInstruction(target, Some(data)) => {
                xml.push_str(&format!("<?{} {}?>", target, data))
            }
            ArbContent::ProcessingInstruction(target, None) => {
                xml.push_str(&format!("<?{}?>", target))
            }
            ArbContent::Element(element) => element.write(xml),
        }
    }
}

fn arb_attributes() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (prop::sample::select(ATTRIBUTE_NAMES), ATTRIBUTE_VALUE),
        0..4,
    )
    .prop_map(|attributes| {
        let mut seen = HashSet::default();
        attributes
            .into_iter()
            .filter(|(name, _)| seen.insert(*name))
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    })
}

fn arb_misc() -> impl Strategy<Value = ArbContent> {
    prop_oneof![
        COMMENT.prop_map(ArbContent::Comment),
        (prop::sample::select(PI_TARGETS), prop::option::of(PI_DATA))
            .prop_map(|(target, data)| ArbContent::ProcessingInstruction(target.to_string(), data)),
    ]
}

fn arb_content() -> impl Strategy<Value = ArbContent> {
    let leaf = prop_oneof![TEXT.prop_map(ArbContent::Text), arb_misc()];
    leaf.prop_recursive(
        6,  // levels deep
        64, // maximum number of nodes
        6,  // up to 6 items per collection
        |inner| {
            (
                prop::sample::select(ELEMENT_NAMES),
                arb_attributes(),
                prop::collection::vec(inner, 0..6),
            )
                .prop_map(|(name, attributes, children)| {
                    ArbContent::Element(ArbElement {
                        name: name.to_string(),
                        attributes,
                        children,
                    })
                })
        },
    )
}

prop_compose! {
    fn arb_element()(name in prop::sample::select(ELEMENT_NAMES),
                     attributes in arb_attributes(),
                     children in prop::collection::vec(arb_content(), 0..6)) -> ArbElement {
        ArbElement {
            name: name.to_string(),
            attributes,
            children,
        }
    }
}

/// Configure document generation.
#[derive(Debug, Default, Clone)]
pub struct Config {
    /// Generate comments and processing instructions around the document
    /// element.
    pub misc_outside_document_element: bool,
}

/// Generate an arbitrary document, with comments and processing
/// instructions around the document element.
///
/// ```notrust
/// use fluxml::proptest::arb_document;
/// use fluxml::Document;
///
/// proptest! {
///   #[test]
///   fn test_parses(doc in arb_document()) {
///     prop_assert!(Document::parse(&doc.to_xml()).is_ok());
///   }
/// }
/// ```
pub fn arb_document() -> BoxedStrategy<ArbDocument> {
    arb_document_with_config(Config {
        misc_outside_document_element: true,
    })
}

/// Generate an arbitrary document, with configuration.
pub fn arb_document_with_config(config: Config) -> BoxedStrategy<ArbDocument> {
    if config.misc_outside_document_element {
        let before = prop::collection::vec(arb_misc(), 0..4);
        let after = prop::collection::vec(arb_misc(), 0..4);
        (before, arb_element(), after)
            .prop_map(|(before, document_element, after)| ArbDocument {
                before,
                document_element,
                after,
            })
            .boxed()
    } else {
        arb_element()
            .prop_map(|document_element| ArbDocument {
                before: vec![],
                document_element,
                after: vec![],
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Parameters;
    use crate::Document;

    proptest! {
        #[test]
        fn test_arb_document_parses(arb in arb_document()) {
            let xml = arb.to_xml();
            let parsed = Document::parse(&xml);
            prop_assert!(parsed.is_ok(), "Cannot parse: {:?} {:?}", xml, parsed.err());
            let doc = parsed.unwrap();
            prop_assert_eq!(doc.root().tag_name(), arb.document_element.name);
        }
    }

    proptest! {
        #[test]
        fn test_compact_is_fixed_point(arb in arb_document()) {
            let parameters = Parameters::compact();
            let first = Document::parse(&arb.to_xml()).unwrap().to_text(&parameters);
            let second = Document::parse(&first).unwrap().to_text(&parameters);
            prop_assert_eq!(first, second);
        }
    }

    proptest! {
        #[test]
        fn test_standard_output_parses(arb in arb_document_with_config(Config::default())) {
            let doc = Document::parse(&arb.to_xml()).unwrap();
            let text = doc.to_text(&Parameters::standard());
            let reparsed = Document::parse(&text).unwrap();
            prop_assert_eq!(reparsed.root().attr_names(), doc.root().attr_names());
        }
    }
}
