use crate::value::Value;

/// An attribute name with its value.
///
/// Attributes read from a [`Node`](crate::Node) are snapshots: changing the
/// element afterwards doesn't change an `Attribute` you already hold. To
/// write one back, use [`Node::set_attribute`](crate::Node::set_attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    name: String,
    value: Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether the attribute was present on the element.
    pub fn exists(&self) -> bool {
        self.value.exists()
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}
