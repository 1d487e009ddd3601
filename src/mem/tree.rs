//! In-memory node tree.

use crate::core::TypedBuffer;
use crate::util::ElementType;

/// A named typed value attached to a group or dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: TypedBuffer,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: TypedBuffer) -> Self {
        Self { name: name.into(), value }
    }

    /// Character attribute.
    pub fn text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, TypedBuffer::from_text(text))
    }

    /// Length as reported by the attribute directory: bytes for
    /// character data, elements otherwise.
    pub fn length(&self) -> i64 {
        self.value.len() as i64
    }
}

/// A leaf array node.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub data: TypedBuffer,
    pub attributes: Vec<Attribute>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, data: TypedBuffer) -> Self {
        Self { name: name.into(), data, attributes: Vec::new() }
    }

    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }
}

/// A container node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub class: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Group {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self { name: name.into(), class: class.into(), ..Default::default() }
    }

    /// The unnamed root group.
    pub fn root() -> Self {
        Self::new("", "")
    }

    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.children.push(Node::Group(group));
        self
    }

    pub fn with_data(mut self, data: Dataset) -> Self {
        self.children.push(Node::Data(data));
        self
    }

    /// Index of the child called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name() == name)
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name() == name)
    }
}

/// A child of a group.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Group(Group),
    Data(Dataset),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Self::Group(g) => &g.name,
            Self::Data(d) => &d.name,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::Group(g) => &g.attributes,
            Self::Data(d) => &d.attributes,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(g) => Some(g),
            Self::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&Dataset> {
        match self {
            Self::Data(d) => Some(d),
            Self::Group(_) => None,
        }
    }
}
