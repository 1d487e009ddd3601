//! Text container format.
//!
//! A container is a JSON document:
//!
//! ```text
//! {
//!   "attributes": [ { "name": "title", "type": "CHAR", "value": "run 42" } ],
//!   "entries": [
//!     { "name": "entry", "class": "NXentry", "attributes": [], "entries": [
//!       { "name": "counts", "type": "INT32", "shape": [2, 3],
//!         "value": [[1, 2, 3], [4, 5, 6]], "attributes": [] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Values are validated and packed by the array encoder on load, so a
//! container holding `300` in a `UINT8` dataset is rejected.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::tree::{Attribute, Dataset, Group, Node};
use crate::core::TypedBuffer;
use crate::marshal::{decode, encode, ResultKind, Value};
use crate::util::{Dimensions, ElementType, Error, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocRoot {
    #[serde(default)]
    attributes: Vec<DocAttribute>,
    #[serde(default)]
    entries: Vec<DocEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum DocEntry {
    Group(DocGroup),
    Data(DocData),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocGroup {
    name: String,
    class: String,
    #[serde(default)]
    attributes: Vec<DocAttribute>,
    #[serde(default)]
    entries: Vec<DocEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocData {
    name: String,
    #[serde(rename = "type")]
    element_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shape: Option<Vec<i64>>,
    value: JsonValue,
    #[serde(default)]
    attributes: Vec<DocAttribute>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocAttribute {
    name: String,
    #[serde(rename = "type")]
    element_type: String,
    value: JsonValue,
}

/// Read a container file into a root group.
pub fn load(path: &Path) -> Result<Group> {
    let text = fs::read_to_string(path)?;
    from_str(&text)
}

/// Parse a container document.
pub fn from_str(text: &str) -> Result<Group> {
    let doc: DocRoot = serde_json::from_str(text)?;
    Ok(Group {
        name: String::new(),
        class: String::new(),
        attributes: doc.attributes.into_iter().map(attr_from_doc).collect::<Result<_>>()?,
        children: doc.entries.into_iter().map(entry_from_doc).collect::<Result<_>>()?,
    })
}

/// Write a root group as a container file.
pub fn save(root: &Group, path: &Path) -> Result<()> {
    fs::write(path, to_string(root)?)?;
    Ok(())
}

/// Serialise a root group as a container document.
pub fn to_string(root: &Group) -> Result<String> {
    let doc = DocRoot {
        attributes: root.attributes.iter().map(attr_to_doc).collect::<Result<_>>()?,
        entries: root.children.iter().map(entry_to_doc).collect::<Result<_>>()?,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn element_type(token: &str) -> Result<ElementType> {
    ElementType::from_name(token).ok_or_else(|| Error::invalid(format!("unknown element type {token:?}")))
}

fn buffer_from_doc(token: &str, value: &JsonValue, shape: Option<Vec<i64>>) -> Result<TypedBuffer> {
    let element_type = element_type(token)?;
    let dims = shape.map(Dimensions::from);
    encode(&Value::from_json(value)?, element_type, dims.as_ref())
}

fn buffer_to_doc(buf: &TypedBuffer) -> Result<JsonValue> {
    if buf.is_empty() && buf.element_type() != ElementType::Char {
        return Ok(JsonValue::Array(Vec::new()));
    }
    let kind = if buf.element_type().is_float() { ResultKind::Float } else { ResultKind::Int };
    Ok(decode(buf, kind)?.to_json())
}

fn attr_from_doc(doc: DocAttribute) -> Result<Attribute> {
    let value = buffer_from_doc(&doc.element_type, &doc.value, None)?;
    Ok(Attribute::new(doc.name, value))
}

fn attr_to_doc(attr: &Attribute) -> Result<DocAttribute> {
    Ok(DocAttribute {
        name: attr.name.clone(),
        element_type: attr.value.element_type().name().to_string(),
        value: buffer_to_doc(&attr.value)?,
    })
}

fn entry_from_doc(doc: DocEntry) -> Result<Node> {
    Ok(match doc {
        DocEntry::Group(g) => Node::Group(Group {
            name: g.name,
            class: g.class,
            attributes: g.attributes.into_iter().map(attr_from_doc).collect::<Result<_>>()?,
            children: g.entries.into_iter().map(entry_from_doc).collect::<Result<_>>()?,
        }),
        DocEntry::Data(d) => Node::Data(Dataset {
            data: buffer_from_doc(&d.element_type, &d.value, d.shape)?,
            name: d.name,
            attributes: d.attributes.into_iter().map(attr_from_doc).collect::<Result<_>>()?,
        }),
    })
}

fn entry_to_doc(node: &Node) -> Result<DocEntry> {
    Ok(match node {
        Node::Group(g) => DocEntry::Group(DocGroup {
            name: g.name.clone(),
            class: g.class.clone(),
            attributes: g.attributes.iter().map(attr_to_doc).collect::<Result<_>>()?,
            entries: g.children.iter().map(entry_to_doc).collect::<Result<_>>()?,
        }),
        Node::Data(d) => DocEntry::Data(DocData {
            name: d.name.clone(),
            element_type: d.element_type().name().to_string(),
            shape: (d.element_type() != ElementType::Char).then(|| d.data.dims().sizes().to_vec()),
            value: buffer_to_doc(&d.data)?,
            attributes: d.attributes.iter().map(attr_to_doc).collect::<Result<_>>()?,
        }),
    })
}
