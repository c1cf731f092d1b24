use ahash::HashMap;
use indextree::NodeId;

use crate::error::Error;
use crate::name::NameId;
use crate::tree::Tree;
use crate::xmlnode::{Element, XmlNode, XmlNodeType};

/// Manipulation of the tree structure.
///
/// This maintains an XML structure:
/// - There is only one document element under the root node, and it cannot
///   be detached.
/// - Nodes can only be added to elements, or to the root node.
///
/// Text nodes are kept consolidated: two text nodes never appear next to each
/// other. Appending text after text extends the existing node, and detaching
/// a node that separated two text nodes merges them.
impl Tree {
    /// Append a child to the end of the children of the given parent.
    ///
    /// If the child is attached elsewhere it is detached first.
    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        self.add_structure_check(parent, child)?;
        if self.parent(child).is_some() {
            self.detach(child)?;
        }
        if self.add_consolidate_text_nodes(child, self.last_child(parent)) {
            return Ok(());
        }
        parent.checked_append(child, self.arena_mut())?;
        Ok(())
    }

    /// Append a text node to a parent node given text.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) -> Result<(), Error> {
        let text_node = self.new_text(text);
        self.append(parent, text_node)
    }

    /// Detach a node (and its descendants) from the tree.
    ///
    /// The subtree stays in the arena as a fragment. Detaching a node that
    /// is already detached does nothing.
    pub(crate) fn detach(&mut self, node: NodeId) -> Result<(), Error> {
        self.remove_structure_check(node)?;
        let prev_node = self.previous_sibling(node);
        let next_node = self.next_sibling(node);
        node.detach(self.arena_mut());
        self.remove_consolidate_text_nodes(prev_node, next_node);
        Ok(())
    }

    /// Replace all content of a node with a single text node.
    ///
    /// An empty string leaves the node without children.
    pub(crate) fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), Error> {
        let children: Vec<NodeId> = self.children(node).collect();
        for child in children {
            child.detach(self.arena_mut());
        }
        if !text.is_empty() {
            self.append_text(node, text)?;
        }
        Ok(())
    }

    /// Detach every element child with the given name.
    pub(crate) fn remove_children_named(
        &mut self,
        node: NodeId,
        name_id: NameId,
    ) -> Result<(), Error> {
        let matching: Vec<NodeId> = self.children_with_name(node, name_id).collect();
        for child in matching {
            self.detach(child)?;
        }
        Ok(())
    }

    /// Deep-copy a subtree. The copy is unattached.
    pub(crate) fn duplicate(&mut self, node: NodeId) -> Result<NodeId, Error> {
        let items = self.snapshot(node);
        self.rebuild(items)
    }

    /// Deep-copy a subtree from another tree into this one. The copy is
    /// unattached; names are re-interned here.
    pub(crate) fn import(&mut self, source: &Tree, node: NodeId) -> Result<NodeId, Error> {
        let items: Vec<_> = source
            .snapshot(node)
            .into_iter()
            .map(|(parent, value)| (parent, self.remap_names(value, source)))
            .collect();
        self.rebuild(items)
    }

    // pre-order list of values, each with the index of its parent in the list
    fn snapshot(&self, node: NodeId) -> Vec<(Option<usize>, XmlNode)> {
        let mut index: HashMap<NodeId, usize> = HashMap::default();
        let mut items = Vec::new();
        for (i, descendant) in node.descendants(self.arena()).enumerate() {
            let parent = if descendant == node {
                None
            } else {
                self.parent(descendant)
                    .and_then(|parent| index.get(&parent).copied())
            };
            index.insert(descendant, i);
            items.push((parent, self.value(descendant).clone()));
        }
        items
    }

    fn rebuild(&mut self, items: Vec<(Option<usize>, XmlNode)>) -> Result<NodeId, Error> {
        let mut ids: Vec<NodeId> = Vec::with_capacity(items.len());
        for (parent, value) in items {
            let id = self.new_node(value);
            if let Some(parent_id) = parent.and_then(|p| ids.get(p).copied()) {
                parent_id.checked_append(id, self.arena_mut())?;
            }
            ids.push(id);
        }
        ids.first()
            .copied()
            .ok_or_else(|| Error::UnsupportedOperation("Cannot copy an empty subtree".into()))
    }

    fn remap_names(&mut self, value: XmlNode, source: &Tree) -> XmlNode {
        match value {
            XmlNode::Element(element) => {
                let mut remapped = Element::new(self.add_name(source.name_str(element.name())));
                for (name_id, attribute_value) in element.attributes.iter() {
                    let name_id = self.add_name(source.name_str(name_id));
                    remapped.set_attribute(name_id, attribute_value);
                }
                XmlNode::Element(remapped)
            }
            other => other,
        }
    }

    fn add_structure_check(&self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        if !matches!(
            self.node_type(parent),
            XmlNodeType::Element | XmlNodeType::Root
        ) {
            return Err(Error::UnsupportedOperation(
                "Cannot add children to non-element and non-root node".into(),
            ));
        }
        match self.node_type(child) {
            XmlNodeType::Root => {
                return Err(Error::UnsupportedOperation(
                    "Cannot move document root".into(),
                ));
            }
            XmlNodeType::Element => {
                if self.is_under_root(child) {
                    return Err(Error::UnsupportedOperation(
                        "Cannot move root element".into(),
                    ));
                }
                if self.is_root(parent) && self.document_element(parent).is_some() {
                    return Err(Error::UnsupportedOperation(
                        "Cannot add a second element under document root".into(),
                    ));
                }
                if self.is_ancestor_or_self(child, parent) {
                    return Err(Error::UnsupportedOperation(
                        "Cannot move a node into itself".into(),
                    ));
                }
            }
            XmlNodeType::Text => {
                if self.is_root(parent) {
                    return Err(Error::UnsupportedOperation(
                        "Cannot add text under document root".into(),
                    ));
                }
            }
            XmlNodeType::Comment | XmlNodeType::ProcessingInstruction => {}
        }
        Ok(())
    }

    fn remove_structure_check(&self, node: NodeId) -> Result<(), Error> {
        match self.node_type(node) {
            XmlNodeType::Root => Err(Error::UnsupportedOperation(
                "Can't remove document root".into(),
            )),
            XmlNodeType::Element if self.is_under_root(node) => Err(
                Error::UnsupportedOperation("Can't remove root node".into()),
            ),
            _ => Ok(()),
        }
    }

    fn add_consolidate_text_nodes(&mut self, node: NodeId, prev_node: Option<NodeId>) -> bool {
        let added_text = match self.text(node) {
            Some(text) => text.to_string(),
            None => return false,
        };
        if let Some(prev_node) = prev_node {
            if let XmlNode::Text(prev) = self.value_mut(prev_node) {
                prev.push_str(&added_text);
                return true;
            }
        }
        false
    }

    fn remove_consolidate_text_nodes(
        &mut self,
        prev_node: Option<NodeId>,
        next_node: Option<NodeId>,
    ) -> bool {
        let (prev_node, next_node) = match (prev_node, next_node) {
            (Some(prev_node), Some(next_node)) => (prev_node, next_node),
            _ => return false,
        };
        let to_add = match (self.text(prev_node), self.text(next_node)) {
            (Some(_), Some(next_text)) => next_text.to_string(),
            _ => return false,
        };
        if let XmlNode::Text(prev) = self.value_mut(prev_node) {
            prev.push_str(&to_add);
        }
        next_node.detach(self.arena_mut());
        true
    }
}
