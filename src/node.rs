use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::HashSet;
use indextree::NodeId;
use tracing::trace;

use crate::access::{check_text, normalize_space};
use crate::attribute::Attribute;
use crate::error::Error;
use crate::name::check_name;
use crate::output::{Parameters, XmlSerializer};
use crate::tree::Tree;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Bound(NodeId),
    Placeholder(String),
}

/// A view of one element in a document.
///
/// A node is either *bound* to an element, or a *placeholder*: the result of
/// a lookup that found nothing, which remembers the name it was looked up
/// by. Placeholders read as empty, and let you chain through missing parts
/// of a document without checking every step:
///
/// ```rust
/// use fluxml::Document;
///
/// let doc = Document::parse(r#"<config><db port="5432"/></config>"#)?;
/// let root = doc.root();
///
/// assert_eq!(root.try_child("db").attr("port").value().as_u16()?, 5432);
///
/// let missing = root.try_child("cache").try_child("size");
/// assert!(!missing.exists());
/// assert_eq!(missing.tag_name(), "size");
/// assert!(root.child("cache").is_err());
/// # Ok::<(), fluxml::Error>(())
/// ```
///
/// Nodes are cheap to clone. All nodes of a document share its tree, so a
/// change made through one node is visible through every other.
#[derive(Clone)]
pub struct Node {
    tree: Rc<RefCell<Tree>>,
    state: State,
}

impl Node {
    pub(crate) fn bound(tree: Rc<RefCell<Tree>>, node: NodeId) -> Self {
        Node {
            tree,
            state: State::Bound(node),
        }
    }

    fn with_id(&self, node: NodeId) -> Node {
        Node::bound(self.tree.clone(), node)
    }

    fn placeholder(&self, name: &str) -> Node {
        Node {
            tree: self.tree.clone(),
            state: State::Placeholder(name.to_string()),
        }
    }

    fn id(&self) -> Option<NodeId> {
        match &self.state {
            State::Bound(node) => Some(*node),
            State::Placeholder(_) => None,
        }
    }

    // a node that is written to
    fn target_id(&self) -> Result<NodeId, Error> {
        match &self.state {
            State::Bound(node) => Ok(*node),
            State::Placeholder(name) => Err(Error::PlaceholderTarget(name.clone())),
        }
    }

    // a node that is copied, moved or removed
    fn source_id(&self) -> Result<NodeId, Error> {
        match &self.state {
            State::Bound(node) => Ok(*node),
            State::Placeholder(name) => Err(Error::PlaceholderSource(name.clone())),
        }
    }

    /// Whether this node is bound to an element.
    pub fn exists(&self) -> bool {
        matches!(self.state, State::Bound(_))
    }

    /// The element name, prefix included. For a placeholder, the name it
    /// was looked up by.
    pub fn tag_name(&self) -> String {
        match &self.state {
            State::Bound(node) => self
                .tree
                .borrow()
                .tag_name(*node)
                .unwrap_or_default()
                .to_string(),
            State::Placeholder(name) => name.clone(),
        }
    }

    // attributes

    /// The attribute with this name. Its value is absent if there's no such
    /// attribute.
    pub fn attr(&self, name: &str) -> Attribute {
        let value = match self.id() {
            Some(node) => {
                let tree = self.tree.borrow();
                Value::from(tree.attribute(node, name))
            }
            None => Value::absent(),
        };
        Attribute::new(name, value)
    }

    /// Same as [`Node::attr`].
    pub fn try_attr(&self, name: &str) -> Attribute {
        self.attr(name)
    }

    /// The first of the named attributes that exists. If none does, the
    /// absent attribute for the first name.
    pub fn try_attr_of(&self, names: &[&str]) -> Result<Attribute, Error> {
        let first = names
            .first()
            .ok_or_else(|| Error::InvalidArgument("no attribute names given".into()))?;
        for name in names {
            let attribute = self.attr(name);
            if attribute.exists() {
                return Ok(attribute);
            }
        }
        trace!(candidates = ?names, "no attribute found, using first candidate");
        Ok(Attribute::new(*first, Value::absent()))
    }

    /// The attribute with this name, or [`Error::AttributeNotFound`].
    pub fn require_attr(&self, name: &str) -> Result<Attribute, Error> {
        let attribute = self.attr(name);
        if attribute.exists() {
            Ok(attribute)
        } else {
            Err(Error::AttributeNotFound(name.to_string()))
        }
    }

    /// Set an attribute. An existing attribute keeps its position.
    ///
    /// The name must be a valid XML name and the value may only contain
    /// characters XML allows.
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> Result<Node, Error> {
        let value = value.into();
        check_name(name)?;
        let value = value
            .raw()
            .ok_or_else(|| Error::InvalidArgument(format!("value for \"{}\" is absent", name)))?
            .to_string();
        check_text(&value)?;
        let node = self.target_id()?;
        let mut tree = self.tree.borrow_mut();
        let name_id = tree.add_name(name);
        if let Some(element) = tree.element_mut(node) {
            element.set_attribute(name_id, value);
        }
        Ok(self.clone())
    }

    pub fn set_attribute(&self, attribute: &Attribute) -> Result<Node, Error> {
        self.set_attr(attribute.name(), attribute.value())
    }

    /// Attribute names in document order.
    pub fn attr_names(&self) -> Vec<String> {
        self.attrs()
            .into_iter()
            .map(|attribute| attribute.into_parts().0)
            .collect()
    }

    /// Attributes in document order.
    pub fn attrs(&self) -> Vec<Attribute> {
        match self.id() {
            Some(node) => self
                .tree
                .borrow()
                .attribute_entries(node)
                .into_iter()
                .map(|(name, value)| Attribute::new(name, value))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn attrs_where(&self, mut predicate: impl FnMut(&Attribute) -> bool) -> Vec<Attribute> {
        self.attrs()
            .into_iter()
            .filter(|attribute| predicate(attribute))
            .collect()
    }

    /// Remove an attribute if it is there.
    pub fn remove_attr(&self, name: &str) -> Node {
        if let Some(node) = self.id() {
            let mut tree = self.tree.borrow_mut();
            if let Some(name_id) = tree.name(name) {
                if let Some(element) = tree.element_mut(node) {
                    element.remove_attribute(name_id);
                }
            }
        }
        self.clone()
    }

    /// Remove the attribute with the same name.
    pub fn remove_attribute(&self, attribute: &Attribute) -> Node {
        self.remove_attr(attribute.name())
    }

    pub fn remove_attrs_named(&self, names: &[&str]) -> Node {
        for name in names {
            self.remove_attr(name);
        }
        self.clone()
    }

    pub fn remove_attrs_where(&self, predicate: impl FnMut(&Attribute) -> bool) -> Node {
        for attribute in self.attrs_where(predicate) {
            self.remove_attr(attribute.name());
        }
        self.clone()
    }

    // children

    /// The first child element with this name, or [`Error::NodeNotFound`].
    pub fn child(&self, name: &str) -> Result<Node, Error> {
        let found = self.id().and_then(|node| {
            let tree = self.tree.borrow();
            tree.first_child_named(node, name)
        });
        found
            .map(|child| self.with_id(child))
            .ok_or_else(|| Error::NodeNotFound(name.to_string()))
    }

    /// The first child element with this name, or a placeholder.
    pub fn try_child(&self, name: &str) -> Node {
        self.child(name).unwrap_or_else(|_| self.placeholder(name))
    }

    /// The first of the named children that exists. If none does, the
    /// placeholder for the first name.
    pub fn try_child_of(&self, names: &[&str]) -> Result<Node, Error> {
        let first = names
            .first()
            .ok_or_else(|| Error::InvalidArgument("no child names given".into()))?;
        for name in names {
            if let Ok(child) = self.child(name) {
                return Ok(child);
            }
        }
        trace!(candidates = ?names, "no child found, using first candidate");
        Ok(self.placeholder(first))
    }

    /// Child elements in document order.
    ///
    /// Text, comments and processing instructions are not included.
    pub fn children(&self) -> Vec<Node> {
        match self.id() {
            Some(node) => {
                let tree = self.tree.borrow();
                let children = tree
                    .element_children(node)
                    .map(|child| self.with_id(child))
                    .collect();
                children
            }
            None => Vec::new(),
        }
    }

    pub fn children_where(&self, mut predicate: impl FnMut(&Node) -> bool) -> Vec<Node> {
        self.children()
            .into_iter()
            .filter(|child| predicate(child))
            .collect()
    }

    pub fn children_named(&self, name: &str) -> Vec<Node> {
        match self.id() {
            Some(node) => {
                let tree = self.tree.borrow();
                let children = match tree.name(name) {
                    Some(name_id) => tree
                        .children_with_name(node, name_id)
                        .map(|child| self.with_id(child))
                        .collect(),
                    None => Vec::new(),
                };
                children
            }
            None => Vec::new(),
        }
    }

    /// The parent element.
    ///
    /// The document element has no parent element, and neither does a
    /// removed node.
    pub fn parent(&self) -> Result<Node, Error> {
        let node = self.source_id()?;
        let tree = self.tree.borrow();
        match tree.parent(node) {
            Some(parent) if tree.is_root(parent) => Err(Error::UnsupportedOperation(
                "the document element has no parent".into(),
            )),
            Some(parent) => Ok(self.with_id(parent)),
            None => Err(Error::UnsupportedOperation(
                "a detached node has no parent".into(),
            )),
        }
    }

    // structure

    /// Append a copy of `child` (from any document) as the last child of
    /// this node, and return the copy.
    ///
    /// Appending a placeholder does nothing and returns this node.
    pub fn append(&self, child: &Node) -> Result<Node, Error> {
        let source = match child.id() {
            Some(source) => source,
            None => return Ok(self.clone()),
        };
        let parent = self.target_id()?;
        let copy = if Rc::ptr_eq(&self.tree, &child.tree) {
            let mut tree = self.tree.borrow_mut();
            let copy = tree.duplicate(source)?;
            tree.append(parent, copy)?;
            copy
        } else {
            let source_tree = child.tree.borrow();
            let mut tree = self.tree.borrow_mut();
            let copy = tree.import(&source_tree, source)?;
            tree.append(parent, copy)?;
            copy
        };
        Ok(self.with_id(copy))
    }

    /// Append a new empty element and return it.
    pub fn add_child(&self, name: &str) -> Result<Node, Error> {
        check_name(name)?;
        let parent = self.target_id()?;
        let mut tree = self.tree.borrow_mut();
        let child = tree.new_element(name);
        tree.append(parent, child)?;
        Ok(self.with_id(child))
    }

    /// Append a copy of this node to `target`. Returns this node, which is
    /// left where it was.
    pub fn copy_to(&self, target: &Node) -> Result<Node, Error> {
        self.source_id()?;
        target.target_id()?;
        target.append(self)?;
        Ok(self.clone())
    }

    /// Move this node to the end of `target`'s children.
    ///
    /// Within one document the node itself moves, and the returned node is
    /// this one. Moving to another document attaches a copy there, removes
    /// this node, and returns the copy.
    pub fn move_to(&self, target: &Node) -> Result<Node, Error> {
        let node = self.source_id()?;
        self.check_detachable(node)?;
        let parent = target.target_id()?;
        if Rc::ptr_eq(&self.tree, &target.tree) {
            self.tree.borrow_mut().append(parent, node)?;
            Ok(self.clone())
        } else {
            let copy = target.append(self)?;
            self.tree.borrow_mut().detach(node)?;
            Ok(copy)
        }
    }

    /// Remove this node from its parent, and return the parent.
    pub fn remove(&self) -> Result<Node, Error> {
        let node = self.source_id()?;
        self.check_detachable(node)?;
        let mut tree = self.tree.borrow_mut();
        let parent = tree.parent(node).ok_or_else(|| {
            Error::UnsupportedOperation("cannot remove a detached node".into())
        })?;
        tree.detach(node)?;
        Ok(self.with_id(parent))
    }

    fn check_detachable(&self, node: NodeId) -> Result<(), Error> {
        let tree = self.tree.borrow();
        match tree.parent(node) {
            Some(parent) if tree.is_root(parent) => Err(Error::UnsupportedOperation(
                "cannot detach the document element".into(),
            )),
            Some(_) if tree.is_attached(node) => Ok(()),
            _ => Err(Error::UnsupportedOperation(
                "cannot detach a node that is not in the document".into(),
            )),
        }
    }

    /// Remove all child elements, one name at a time.
    ///
    /// Text, comments and processing instructions stay.
    pub fn remove_children(&self) -> Result<Node, Error> {
        let node = match self.id() {
            Some(node) => node,
            None => return Ok(self.clone()),
        };
        let mut seen = HashSet::default();
        let mut names = Vec::new();
        {
            let tree = self.tree.borrow();
            for child in tree.element_children(node) {
                if let Some(element) = tree.element(child) {
                    if seen.insert(element.name()) {
                        names.push(element.name());
                    }
                }
            }
        }
        let mut tree = self.tree.borrow_mut();
        for name_id in names {
            tree.remove_children_named(node, name_id)?;
        }
        Ok(self.clone())
    }

    /// For each child element matching `predicate`, remove every child
    /// element with the same name.
    ///
    /// The children are collected before the predicate runs. Groups are
    /// removed as they are found, so if `predicate` panics, the groups
    /// matched before it are already gone.
    pub fn remove_children_where(
        &self,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Result<Node, Error> {
        for child in self.children() {
            if predicate(&child) {
                self.remove_children_named(&child.tag_name())?;
            }
        }
        Ok(self.clone())
    }

    /// Remove every child element with this name.
    pub fn remove_children_named(&self, name: &str) -> Result<Node, Error> {
        if let Some(node) = self.id() {
            let mut tree = self.tree.borrow_mut();
            if let Some(name_id) = tree.name(name) {
                tree.remove_children_named(node, name_id)?;
            }
        }
        Ok(self.clone())
    }

    // text

    /// The text directly inside this element, trimmed, with whitespace runs
    /// collapsed to a single space. Text inside child elements is not
    /// included. Never absent.
    pub fn text(&self) -> Value {
        match self.id() {
            Some(node) => Value::new(normalize_space(&self.tree.borrow().direct_text(node))),
            None => Value::new(""),
        }
    }

    /// Replace all content, child elements included, with text.
    pub fn set_text(&self, text: impl Into<Value>) -> Result<Node, Error> {
        let text = text.into();
        let text = text
            .raw()
            .ok_or_else(|| Error::InvalidArgument("text is absent".into()))?;
        check_text(text)?;
        let node = self.target_id()?;
        self.tree.borrow_mut().set_text(node, text)?;
        Ok(self.clone())
    }

    /// Serialize this element and its descendants, without declaration.
    pub fn to_text(&self, parameters: &Parameters) -> String {
        match self.id() {
            Some(node) => {
                let tree = self.tree.borrow();
                let text = XmlSerializer::new(&tree, parameters).serialize_fragment(node);
                text
            }
            None => String::new(),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.state == other.state
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag_name", &self.tag_name())
            .field("exists", &self.exists())
            .finish()
    }
}
