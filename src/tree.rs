use indextree::{Arena, NodeId};

use crate::name::{NameId, NameLookup};
use crate::xmlnode::{Element, XmlNode, XmlNodeType};

pub(crate) type XmlArena = Arena<XmlNode>;

/// The arena holding one document's nodes, plus the names they use.
///
/// Everything is addressed by [`NodeId`]. Nodes are never freed: a detached
/// subtree stays in the arena so ids held elsewhere keep pointing at it.
pub(crate) struct Tree {
    pub(crate) arena: XmlArena,
    pub(crate) names: NameLookup,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Tree {
            arena: XmlArena::new(),
            names: NameLookup::new(),
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &XmlArena {
        &self.arena
    }

    #[inline]
    pub(crate) fn arena_mut(&mut self) -> &mut XmlArena {
        &mut self.arena
    }

    #[inline]
    pub(crate) fn value(&self, node: NodeId) -> &XmlNode {
        self.arena[node].get()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, node: NodeId) -> &mut XmlNode {
        self.arena[node].get_mut()
    }

    pub(crate) fn node_type(&self, node: NodeId) -> XmlNodeType {
        self.value(node).node_type()
    }

    pub(crate) fn element(&self, node: NodeId) -> Option<&Element> {
        if let XmlNode::Element(element) = self.value(node) {
            Some(element)
        } else {
            None
        }
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        if let XmlNode::Element(element) = self.value_mut(node) {
            Some(element)
        } else {
            None
        }
    }

    pub(crate) fn text(&self, node: NodeId) -> Option<&str> {
        if let XmlNode::Text(text) = self.value(node) {
            Some(text)
        } else {
            None
        }
    }

    /// Intern a name.
    pub(crate) fn add_name(&mut self, name: &str) -> NameId {
        if let Some(name_id) = self.names.get_id(name) {
            return name_id;
        }
        self.names.get_id_mut(name.to_string())
    }

    /// Look up a name without interning it. A name nobody uses has no id.
    pub(crate) fn name(&self, name: &str) -> Option<NameId> {
        self.names.get_id(name)
    }

    #[inline]
    pub(crate) fn name_str(&self, name_id: NameId) -> &str {
        self.names.get_value(name_id)
    }

    /// The tag name of an element node.
    pub(crate) fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| self.name_str(e.name()))
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
