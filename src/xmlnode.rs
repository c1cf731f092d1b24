use crate::name::NameId;

/// The kind of an arena node.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub(crate) enum XmlNodeType {
    Root,
    Element,
    Text,
    Comment,
    ProcessingInstruction,
}

/// What an arena node holds.
#[derive(Debug, Clone)]
pub(crate) enum XmlNode {
    /// Document root holding the document element plus any comments and
    /// processing instructions around it. Not the document element itself.
    Root,
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction(ProcessingInstruction),
}

impl XmlNode {
    pub(crate) fn node_type(&self) -> XmlNodeType {
        match self {
            XmlNode::Root => XmlNodeType::Root,
            XmlNode::Element(_) => XmlNodeType::Element,
            XmlNode::Text(_) => XmlNodeType::Text,
            XmlNode::Comment(_) => XmlNodeType::Comment,
            XmlNode::ProcessingInstruction(_) => XmlNodeType::ProcessingInstruction,
        }
    }
}

/// Attributes of an element, in document order.
///
/// Setting an attribute that already exists replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Attributes {
    entries: Vec<(NameId, String)>,
}

impl Attributes {
    pub(crate) fn new() -> Self {
        Attributes {
            entries: Vec::new(),
        }
    }

    pub(crate) fn get(&self, name_id: NameId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name_id)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the previous value, if any.
    pub(crate) fn insert(&mut self, name_id: NameId, value: String) -> Option<String> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name_id) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((name_id, value));
        None
    }

    pub(crate) fn remove(&mut self, name_id: NameId) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| *n == name_id)?;
        Some(self.entries.remove(index).1)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (NameId, &str)> + '_ {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }
}

/// XML element value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub(crate) name_id: NameId,
    pub(crate) attributes: Attributes,
}

impl Element {
    pub(crate) fn new(name_id: NameId) -> Self {
        Element {
            name_id,
            attributes: Attributes::new(),
        }
    }

    pub(crate) fn name(&self) -> NameId {
        self.name_id
    }

    pub(crate) fn get_attribute(&self, name_id: NameId) -> Option<&str> {
        self.attributes.get(name_id)
    }

    pub(crate) fn set_attribute<S: Into<String>>(&mut self, name_id: NameId, value: S) {
        self.attributes.insert(name_id, value.into());
    }

    pub(crate) fn remove_attribute(&mut self, name_id: NameId) {
        self.attributes.remove(name_id);
    }
}

/// XML processing instruction, e.g. `<?target data?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: Option<String>,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: Option<String>) -> Self {
        ProcessingInstruction { target, data }
    }
}
