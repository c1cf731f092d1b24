use indextree::{NodeEdge, NodeId};

use crate::access::{collapse_space, is_xml_space, normalize_space};
use crate::entity::{serialize_attribute, serialize_text};
use crate::output::{Format, Layout, Parameters, Pretty};
use crate::tree::Tree;
use crate::xmlnode::{Element, ProcessingInstruction, XmlNode};

pub(crate) struct XmlSerializer<'a> {
    tree: &'a Tree,
    parameters: &'a Parameters,
    output: String,
}

impl<'a> XmlSerializer<'a> {
    pub(crate) fn new(tree: &'a Tree, parameters: &'a Parameters) -> Self {
        XmlSerializer {
            tree,
            parameters,
            output: String::new(),
        }
    }

    /// Serialize a whole document, starting at its root node.
    ///
    /// The declaration comes first. Each top-level item is followed by a line
    /// separator.
    pub(crate) fn serialize_document(mut self, root: NodeId) -> String {
        self.output.push_str(&format!(
            "<?xml version=\"1.0\" encoding=\"{}\"?>",
            self.parameters.encoding.name()
        ));
        self.newline();
        self.serialize(root, Layout::Document);
        self.output
    }

    /// Serialize a single node and its descendants, without declaration or
    /// surrounding line breaks.
    pub(crate) fn serialize_fragment(mut self, node: NodeId) -> String {
        self.serialize(node, Layout::Fragment);
        self.output
    }

    fn serialize(&mut self, top: NodeId, start: Layout) {
        let tree = self.tree;
        let mut pretty = Pretty::new(tree, self.parameters.format, start);
        for edge in top.traverse(tree.arena()) {
            match edge {
                NodeEdge::Start(node) => self.handle_edge_start(&mut pretty, node),
                NodeEdge::End(node) => self.handle_edge_end(&mut pretty, node),
            }
        }
    }

    fn handle_edge_start(&mut self, pretty: &mut Pretty, node: NodeId) {
        let tree = self.tree;
        match tree.value(node) {
            XmlNode::Root => {}
            XmlNode::Element(element) => {
                let layout = pretty.classify(node);
                if pretty.indents() {
                    self.indent(pretty.level());
                }
                self.write_start_tag(element);
                match layout {
                    Layout::Empty => self.output.push_str(" />"),
                    Layout::TextOnly => {
                        self.output.push('>');
                        let text = tree.direct_text(node);
                        let text = match self.parameters.format {
                            Format::Standard => text.trim_matches(is_xml_space).to_string(),
                            Format::Compact => normalize_space(&text),
                        };
                        self.output.push_str(&serialize_text(text.into()));
                        self.write_end_tag(element);
                    }
                    _ => {
                        self.output.push('>');
                        if layout == Layout::Block && self.parameters.format == Format::Standard
                        {
                            self.newline();
                        }
                    }
                }
                pretty.push(layout);
            }
            XmlNode::Text(text) => match pretty.current() {
                Layout::Inline => {
                    let text = match self.parameters.format {
                        Format::Standard => text.clone(),
                        Format::Compact => collapse_space(text),
                    };
                    self.output.push_str(&serialize_text(text.into()));
                }
                Layout::Preserve => self.output.push_str(&serialize_text(text.into())),
                // whitespace between blocks, or text already written
                _ => {}
            },
            XmlNode::Comment(comment) => {
                self.before_item(pretty);
                self.output.push_str("<!--");
                self.output.push_str(comment);
                self.output.push_str("-->");
                self.after_item(pretty);
            }
            XmlNode::ProcessingInstruction(pi) => {
                self.before_item(pretty);
                self.write_processing_instruction(pi);
                self.after_item(pretty);
            }
        }
    }

    fn handle_edge_end(&mut self, pretty: &mut Pretty, node: NodeId) {
        let element = match self.tree.value(node) {
            XmlNode::Element(element) => element,
            _ => return,
        };
        match pretty.pop() {
            Layout::Block => {
                if self.parameters.format == Format::Standard {
                    self.indent(pretty.level());
                }
                self.write_end_tag(element);
            }
            Layout::Inline | Layout::Preserve => self.write_end_tag(element),
            _ => {}
        }
        self.after_item(pretty);
    }

    fn before_item(&mut self, pretty: &Pretty) {
        if pretty.indents() {
            self.indent(pretty.level());
        }
    }

    fn after_item(&mut self, pretty: &Pretty) {
        if pretty.breaks_lines() {
            self.newline();
        }
    }

    fn write_start_tag(&mut self, element: &Element) {
        self.output.push('<');
        self.output.push_str(self.tree.name_str(element.name()));
        for (name_id, value) in element.attributes.iter() {
            self.output.push(' ');
            self.output.push_str(self.tree.name_str(name_id));
            self.output.push_str("=\"");
            self.output.push_str(&serialize_attribute(value.into()));
            self.output.push('"');
        }
    }

    fn write_end_tag(&mut self, element: &Element) {
        self.output.push_str("</");
        self.output.push_str(self.tree.name_str(element.name()));
        self.output.push('>');
    }

    fn write_processing_instruction(&mut self, pi: &ProcessingInstruction) {
        self.output.push_str("<?");
        self.output.push_str(&pi.target);
        if let Some(data) = &pi.data {
            self.output.push(' ');
            self.output.push_str(data);
        }
        self.output.push_str("?>");
    }

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.output.push_str("  ");
        }
    }

    fn newline(&mut self) {
        self.output
            .push_str(self.parameters.line_separator.as_str());
    }
}
