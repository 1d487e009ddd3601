//! Directory cursor state and the entries it yields.

use crate::marshal::Value;
use crate::util::{type_to_string, ElementType};

/// Position of a directory cursor on one handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorState {
    /// No `init_*` call since the handle opened or last navigated
    #[default]
    Uninitialized,
    /// Initialised and not yet exhausted
    Ready,
    /// The last step reported end of directory
    Exhausted,
}

/// One child of the current group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildEntry {
    pub name: String,
    /// NeXus class, or `"SDS"` for datasets
    pub class: String,
    /// Element type code for datasets
    pub type_code: i32,
}

impl ChildEntry {
    /// True if this entry is a dataset.
    pub fn is_data(&self) -> bool {
        self.class == "SDS"
    }

    /// Element type of a dataset entry.
    pub fn element_type(&self) -> Option<ElementType> {
        ElementType::from_code(self.type_code)
    }

    pub fn type_name(&self) -> Option<&'static str> {
        type_to_string(self.type_code)
    }
}

/// One attribute of the current node with its decoded value.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeEntry {
    pub name: String,
    pub element_type: ElementType,
    pub value: Value,
}
