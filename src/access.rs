use indextree::NodeId;

use crate::error::Error;
use crate::name::NameId;
use crate::tree::Tree;
use crate::xmlnode::{XmlNode, XmlNodeType};

/// Whitespace as XML defines it.
#[inline]
pub(crate) fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Trim and collapse every internal whitespace run to a single space.
pub(crate) fn normalize_space(text: &str) -> String {
    text.split(is_xml_space)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse whitespace runs to a single space, keeping one at either end if
/// there was any.
pub(crate) fn collapse_space(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if is_xml_space(c) {
            if !in_space {
                result.push(' ');
            }
            in_space = true;
        } else {
            result.push(c);
            in_space = false;
        }
    }
    result
}

pub(crate) fn is_whitespace_only(text: &str) -> bool {
    text.chars().all(is_xml_space)
}

/// Whether `c` matches the XML `Char` production.
#[inline]
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF
    )
}

/// Reject text containing characters XML can't represent, not even as a
/// character reference.
pub(crate) fn check_text(text: &str) -> Result<(), Error> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(Error::InvalidArgument(format!(
            "{:?} is not a valid XML character",
            c
        ))),
        None => Ok(()),
    }
}

/// ## Read-only access
impl Tree {
    /// Get parent node.
    ///
    /// Returns [`None`] for the document root and for detached nodes.
    pub(crate) fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena()[node].parent()
    }

    pub(crate) fn is_root(&self, node: NodeId) -> bool {
        self.node_type(node) == XmlNodeType::Root
    }

    /// Directly under the document root.
    pub(crate) fn is_under_root(&self, node: NodeId) -> bool {
        self.parent(node).map(|p| self.is_root(p)).unwrap_or(false)
    }

    /// Reachable from a document root, i.e. not part of a detached fragment.
    pub(crate) fn is_attached(&self, node: NodeId) -> bool {
        node.ancestors(self.arena())
            .any(|ancestor| self.is_root(ancestor))
    }

    pub(crate) fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(self.arena())
    }

    pub(crate) fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.arena()[node].last_child()
    }

    pub(crate) fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena()[node].previous_sibling()
    }

    pub(crate) fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena()[node].next_sibling()
    }

    /// Element children in document order.
    pub(crate) fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .filter(move |child| self.node_type(*child) == XmlNodeType::Element)
    }

    /// The element children with a given name.
    pub(crate) fn children_with_name(
        &self,
        node: NodeId,
        name_id: NameId,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.element_children(node).filter(move |child| {
            self.element(*child)
                .map(|e| e.name() == name_id)
                .unwrap_or(false)
        })
    }

    /// The first element child with a given name.
    pub(crate) fn first_child_named(&self, node: NodeId, name: &str) -> Option<NodeId> {
        let name_id = self.name(name)?;
        self.children_with_name(node, name_id).next()
    }

    /// The document element below a document root.
    pub(crate) fn document_element(&self, root: NodeId) -> Option<NodeId> {
        self.element_children(root).next()
    }

    /// The value of an attribute by name.
    pub(crate) fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let name_id = self.name(name)?;
        self.element(node)?.get_attribute(name_id)
    }

    /// Attribute names and values in document order.
    pub(crate) fn attribute_entries(&self, node: NodeId) -> Vec<(String, String)> {
        match self.element(node) {
            Some(element) => element
                .attributes
                .iter()
                .map(|(name_id, value)| (self.name_str(name_id).to_string(), value.to_string()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// The concatenated direct text children of a node.
    ///
    /// Text inside child elements is not included.
    pub(crate) fn direct_text(&self, node: NodeId) -> String {
        let mut result = String::new();
        for child in self.children(node) {
            if let XmlNode::Text(text) = self.value(child) {
                result.push_str(text);
            }
        }
        result
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        node.ancestors(self.arena()).any(|n| n == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_space() {
        assert_eq!(normalize_space("  a \n\t b  "), "a b");
        assert_eq!(normalize_space(" \n "), "");
        assert_eq!(normalize_space(""), "");
    }

    #[test]
    fn test_check_text() {
        assert!(check_text("tab\tnewline\n\u{e9}\u{1F600}").is_ok());
        assert!(check_text("x\u{1}y").is_err());
        assert!(check_text("\u{FFFE}").is_err());
    }

    #[test]
    fn test_collapse_space() {
        assert_eq!(collapse_space("  a \n\t b  "), " a b ");
        assert_eq!(collapse_space("ab"), "ab");
    }
}
