use indextree::NodeId;

use crate::access::is_whitespace_only;
use crate::name::NameId;
use crate::output::Format;
use crate::tree::Tree;
use crate::xmlnode::XmlNode;

/// How the content of a node is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// The document root: each item on its own line, never indented.
    Document,
    /// The top of a serialized subtree: no line breaks around it.
    Fragment,
    /// No children, or only whitespace text: `<name />`.
    Empty,
    /// Only text: `<name>text</name>` on one line.
    TextOnly,
    /// Elements, comments or processing instructions with at most
    /// whitespace text between them. Standard format indents them.
    Block,
    /// Text mixed with other content. Nothing below is indented.
    Inline,
    /// Under `xml:space="preserve"`; written verbatim.
    Preserve,
}

// The stack holds the layout of every open element, so we know whether a
// child gets indentation and a line break, and how text is treated.
pub(crate) struct Pretty<'a> {
    tree: &'a Tree,
    format: Format,
    xml_space: Option<NameId>,
    stack: Vec<Layout>,
}

impl<'a> Pretty<'a> {
    pub(crate) fn new(tree: &'a Tree, format: Format, start: Layout) -> Self {
        Pretty {
            tree,
            format,
            xml_space: tree.name("xml:space"),
            stack: vec![start],
        }
    }

    /// Layout of the closest open element.
    pub(crate) fn current(&self) -> Layout {
        self.stack.last().copied().unwrap_or(Layout::Fragment)
    }

    pub(crate) fn push(&mut self, layout: Layout) {
        self.stack.push(layout);
    }

    pub(crate) fn pop(&mut self) -> Layout {
        self.stack.pop().unwrap_or(Layout::Fragment)
    }

    /// Whether children of the current element start on an indented line.
    pub(crate) fn indents(&self) -> bool {
        self.format == Format::Standard && self.current() == Layout::Block
    }

    /// Whether children of the current element are followed by a line break.
    pub(crate) fn breaks_lines(&self) -> bool {
        match self.current() {
            Layout::Document => true,
            Layout::Block => self.format == Format::Standard,
            _ => false,
        }
    }

    /// Indentation level for a child of the current element.
    pub(crate) fn level(&self) -> usize {
        self.stack.iter().filter(|l| **l == Layout::Block).count()
    }

    fn space(&self, node: NodeId) -> Option<&str> {
        let name_id = self.xml_space?;
        self.tree.element(node)?.get_attribute(name_id)
    }

    /// Decide the layout of an element about to be opened under the current
    /// element.
    pub(crate) fn classify(&self, node: NodeId) -> Layout {
        let has_children = self.tree.children(node).next().is_some();
        let parent = self.current();
        match (parent, self.space(node)) {
            (_, Some("preserve")) | (Layout::Preserve, None) => {
                return if has_children {
                    Layout::Preserve
                } else {
                    Layout::Empty
                };
            }
            (Layout::Inline, _) => {
                return if has_children {
                    Layout::Inline
                } else {
                    Layout::Empty
                };
            }
            _ => {}
        }
        let mut has_text = false;
        let mut has_other = false;
        for child in self.tree.children(node) {
            match self.tree.value(child) {
                XmlNode::Text(text) => {
                    if !is_whitespace_only(text) {
                        has_text = true;
                    }
                }
                _ => has_other = true,
            }
        }
        match (has_text, has_other) {
            (false, false) => Layout::Empty,
            (true, false) => Layout::TextOnly,
            (true, true) => Layout::Inline,
            (false, true) => Layout::Block,
        }
    }
}
