//! The native library seam.
//!
//! [`NapiBackend`] is the handle-based interface every file operation goes
//! through. A value implementing it *is* the native handle: opening
//! produces one, [`NapiBackend::close`] releases it.

use std::path::Path;

use super::{AccessMode, NodeLink, TypedBuffer};
use crate::util::{type_to_string, Dimensions, ElementType};

/// Failure status of a native call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NxStatus {
    /// `NX_ERROR`
    Error,
    /// `NX_EOD`, returned by directory primitives past the last entry
    EndOfData,
}

/// Result of a native call.
pub type NxResult<T> = std::result::Result<T, NxStatus>;

/// Shape and raw type code of the open dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataInfo {
    pub dims: Dimensions,
    pub type_code: i32,
}

impl DataInfo {
    pub fn new(dims: Dimensions, element_type: ElementType) -> Self {
        Self { dims, type_code: element_type.code() }
    }

    /// Decoded element type, `None` for codes outside the enumeration.
    pub fn element_type(&self) -> Option<ElementType> {
        ElementType::from_code(self.type_code)
    }

    /// Type token, `None` for unknown codes.
    pub fn type_name(&self) -> Option<&'static str> {
        type_to_string(self.type_code)
    }
}

/// One entry of a group directory: name, class and type code.
///
/// Datasets report class `"SDS"` and their element type code; groups
/// report their class and type code 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub class: String,
    pub type_code: i32,
}

/// One entry of an attribute directory: name, element count and type code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAttr {
    pub name: String,
    pub length: i64,
    pub type_code: i32,
}

/// Handle-based native file library.
///
/// Every method mirrors one `NX*` primitive. The binding layer in
/// [`crate::file`] turns `NxStatus` failures into caller-visible errors.
pub trait NapiBackend: Sized {
    /// Open a file. No handle exists if this fails.
    fn open(path: &Path, mode: AccessMode) -> NxResult<Self>;

    /// Release the native handle.
    fn close(&mut self) -> NxResult<()>;

    fn open_group(&mut self, name: &str, class: &str) -> NxResult<()>;

    fn close_group(&mut self) -> NxResult<()>;

    /// Open a group or dataset by absolute or relative path.
    fn open_path(&mut self, path: &str) -> NxResult<()>;

    /// Open the groups along `path`, stopping before a trailing dataset.
    fn open_group_path(&mut self, path: &str) -> NxResult<()>;

    fn open_data(&mut self, name: &str) -> NxResult<()>;

    fn close_data(&mut self) -> NxResult<()>;

    /// Shape and type of the open dataset.
    fn get_info(&mut self) -> NxResult<DataInfo>;

    /// Read the whole open dataset into `buf`.
    fn get_data(&mut self, buf: &mut TypedBuffer) -> NxResult<()>;

    /// Read the region `start..start+size` of the open dataset into `buf`.
    fn get_slab(&mut self, buf: &mut TypedBuffer, start: &[i64], size: &[i64]) -> NxResult<()>;

    /// Read the named attribute of the current node into `buf`.
    fn get_attr(&mut self, name: &str, buf: &mut TypedBuffer) -> NxResult<()>;

    fn flush(&mut self) -> NxResult<()>;

    fn init_group_dir(&mut self) -> NxResult<()>;

    fn get_next_entry(&mut self) -> NxResult<RawEntry>;

    /// Number of attributes on the current node.
    fn get_attr_count(&mut self) -> NxResult<i64>;

    fn init_attr_dir(&mut self) -> NxResult<()>;

    fn get_next_attr(&mut self) -> NxResult<RawAttr>;

    fn get_group_id(&mut self) -> NxResult<NodeLink>;

    fn get_data_id(&mut self) -> NxResult<NodeLink>;
}
