use indextree::NodeId;

use crate::tree::Tree;
use crate::xmlnode::{Element, ProcessingInstruction, XmlNode};

/// Creation of new, unattached nodes.
impl Tree {
    pub(crate) fn new_node(&mut self, value: XmlNode) -> NodeId {
        self.arena_mut().new_node(value)
    }

    pub(crate) fn new_root(&mut self) -> NodeId {
        self.new_node(XmlNode::Root)
    }

    pub(crate) fn new_element(&mut self, name: &str) -> NodeId {
        let name_id = self.add_name(name);
        self.new_node(XmlNode::Element(Element::new(name_id)))
    }

    pub(crate) fn new_text(&mut self, text: &str) -> NodeId {
        self.new_node(XmlNode::Text(text.to_string()))
    }

    pub(crate) fn new_comment(&mut self, comment: &str) -> NodeId {
        self.new_node(XmlNode::Comment(comment.to_string()))
    }

    pub(crate) fn new_processing_instruction(&mut self, target: &str, data: Option<&str>) -> NodeId {
        self.new_node(XmlNode::ProcessingInstruction(ProcessingInstruction::new(
            target.to_string(),
            data.map(|s| s.to_string()),
        )))
    }
}
