//! The file handle wrapper.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::cursor::{AttributeEntry, ChildEntry, CursorState};
use crate::core::{AccessMode, DataInfo, NapiBackend, NodeLink, NxStatus, RawAttr, TypedBuffer};
use crate::marshal::{decode, encode, ResultKind, Value};
use crate::mem::MemoryBackend;
use crate::util::{Dimensions, ElementType, Error, Result};

/// An open NeXus file.
///
/// Owns exactly one native handle. [`close`](Self::close) releases it and
/// reports failure; dropping an unclosed file closes it as well, so the
/// native close runs exactly once on every path.
///
/// The handle carries the library's navigation position (open group and
/// dataset) plus one child cursor and one attribute cursor. Every
/// navigation call invalidates both cursors.
pub struct NexusFile<B: NapiBackend = MemoryBackend> {
    backend: Option<B>,
    filename: PathBuf,
    mode: AccessMode,
    children: CursorState,
    attrs: CursorState,
}

impl<B: NapiBackend> NexusFile<B> {
    /// Open `path` with the given access mode.
    pub fn open(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref();
        let backend = B::open(path, mode)
            .map_err(|_| Error::io(format!("Could not open file {}", path.display())))?;
        debug!(path = %path.display(), %mode, "opened file");
        Ok(Self::attach(backend, path, mode))
    }

    /// Wrap an already open native handle.
    pub fn attach(backend: B, filename: impl Into<PathBuf>, mode: AccessMode) -> Self {
        Self {
            backend: Some(backend),
            filename: filename.into(),
            mode,
            children: CursorState::Uninitialized,
            attrs: CursorState::Uninitialized,
        }
    }

    /// Close the file, reporting a failed native close.
    pub fn close(mut self) -> Result<()> {
        let mut backend = self.backend.take().ok_or(Error::ClosedHandle)?;
        debug!(path = %self.filename.display(), "closing file");
        backend.close().map_err(|_| Error::io("Could not close file"))
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Borrow the native handle.
    pub fn backend(&self) -> Result<&B> {
        self.backend.as_ref().ok_or(Error::ClosedHandle)
    }

    fn backend_mut(&mut self) -> Result<&mut B> {
        self.backend.as_mut().ok_or(Error::ClosedHandle)
    }

    /// Run a native call, mapping failure to an I/O error naming `op`.
    fn call<T>(&mut self, op: &str, f: impl FnOnce(&mut B) -> std::result::Result<T, NxStatus>) -> Result<T> {
        let backend = self.backend_mut()?;
        f(backend).map_err(|_| Error::io(format!("{op} failed")))
    }

    /// Navigation moves the library's directory; both cursors restart.
    fn navigated(&mut self) {
        self.children = CursorState::Uninitialized;
        self.attrs = CursorState::Uninitialized;
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn open_group(&mut self, name: &str, class: &str) -> Result<()> {
        trace!(name, class, "opengroup");
        self.call("opengroup", |b| b.open_group(name, class))?;
        self.navigated();
        Ok(())
    }

    pub fn close_group(&mut self) -> Result<()> {
        trace!("closegroup");
        self.call("closegroup", |b| b.close_group())?;
        self.navigated();
        Ok(())
    }

    pub fn open_path(&mut self, path: &str) -> Result<()> {
        trace!(path, "openpath");
        self.call("openpath", |b| b.open_path(path))?;
        self.navigated();
        Ok(())
    }

    pub fn open_group_path(&mut self, path: &str) -> Result<()> {
        trace!(path, "opengrouppath");
        self.call("opengrouppath", |b| b.open_group_path(path))?;
        self.navigated();
        Ok(())
    }

    pub fn open_data(&mut self, name: &str) -> Result<()> {
        trace!(name, "opendata");
        self.call("opendata", |b| b.open_data(name))?;
        self.navigated();
        Ok(())
    }

    pub fn close_data(&mut self) -> Result<()> {
        trace!("closedata");
        self.call("closedata", |b| b.close_data())?;
        self.navigated();
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.call("flush", |b| b.flush())
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Shape and raw type code of the open dataset.
    pub fn get_info(&mut self) -> Result<DataInfo> {
        self.call("getinfo", |b| b.get_info())
    }

    /// Shape and type token of the open dataset.
    ///
    /// The token is `None` when the library reports an unknown type code.
    pub fn get_dims(&mut self) -> Result<(Dimensions, Option<&'static str>)> {
        let info = self.get_info()?;
        let name = info.type_name();
        Ok((info.dims, name))
    }

    /// Read and decode the whole open dataset.
    pub fn get_data(&mut self, kind: ResultKind) -> Result<Value> {
        let info = self.get_info()?;
        let element_type = ElementType::try_from_code(info.type_code)?;
        let mut buf = TypedBuffer::alloc(element_type, info.dims)?;
        self.call("getdata", |b| b.get_data(&mut buf))?;
        decode(&buf, kind)
    }

    /// Read and decode the region `start..start+size` of the open dataset.
    pub fn get_slab(&mut self, start: &[i64], size: &[i64], kind: ResultKind) -> Result<Value> {
        if start.len() != size.len() {
            return Err(Error::invalid(format!(
                "start has rank {} but size has rank {}",
                start.len(),
                size.len()
            )));
        }
        let info = self.get_info()?;
        let element_type = ElementType::try_from_code(info.type_code)?;
        check_region(&info.dims, start, size)?;
        let mut buf = TypedBuffer::alloc(element_type, Dimensions::from_slice(size))?;
        self.call("getslab", |b| b.get_slab(&mut buf, start, size))?;
        decode(&buf, kind)
    }

    // ========================================================================
    // Child directory
    // ========================================================================

    /// Restart the child cursor at the first entry of the current group.
    pub fn init_group_dir(&mut self) -> Result<()> {
        self.call("initgroupdir", |b| b.init_group_dir())?;
        self.children = CursorState::Ready;
        Ok(())
    }

    /// Step the child cursor. `None` marks the end of the directory.
    ///
    /// Any native failure during a step is taken as the end of the
    /// directory, never as an error.
    pub fn next_entry(&mut self) -> Result<Option<ChildEntry>> {
        match self.children {
            CursorState::Uninitialized => return Err(Error::CursorNotInitialized("group")),
            CursorState::Exhausted => return Ok(None),
            CursorState::Ready => {}
        }
        let step = self.backend_mut()?.get_next_entry();
        match step {
            Ok(raw) => {
                trace!(name = %raw.name, class = %raw.class, "getnextentry");
                Ok(Some(ChildEntry { name: raw.name, class: raw.class, type_code: raw.type_code }))
            }
            Err(status) => {
                if status == NxStatus::Error {
                    warn!("getnextentry reported an error; treating it as end of directory");
                }
                self.children = CursorState::Exhausted;
                Ok(None)
            }
        }
    }

    /// All children of the current group, in directory order.
    pub fn entries(&mut self) -> Result<Vec<ChildEntry>> {
        self.init_group_dir()?;
        let mut out = Vec::new();
        while let Some(entry) = self.next_entry()? {
            out.push(entry);
        }
        Ok(out)
    }

    // ========================================================================
    // Attribute directory
    // ========================================================================

    /// Restart the attribute cursor at the first attribute of the current node.
    pub fn init_attr_dir(&mut self) -> Result<()> {
        self.call("initattrdir", |b| b.init_attr_dir())?;
        self.attrs = CursorState::Ready;
        Ok(())
    }

    /// Number of attributes on the current node.
    pub fn attr_count(&mut self) -> Result<i64> {
        self.call("getattrinfo", |b| b.get_attr_count())
    }

    /// Step the attribute cursor and fetch the attribute's value.
    ///
    /// `None` marks the end of the directory. A failure reading the value of
    /// an attribute the cursor did yield is an I/O error.
    pub fn next_attr(&mut self) -> Result<Option<AttributeEntry>> {
        match self.attrs {
            CursorState::Uninitialized => return Err(Error::CursorNotInitialized("attribute")),
            CursorState::Exhausted => return Ok(None),
            CursorState::Ready => {}
        }
        let step = self.backend_mut()?.get_next_attr();
        match step {
            Ok(raw) => {
                trace!(name = %raw.name, length = raw.length, "getnextattr");
                self.read_attr(raw).map(Some)
            }
            Err(status) => {
                if status == NxStatus::Error {
                    warn!("getnextattr reported an error; treating it as end of directory");
                }
                self.attrs = CursorState::Exhausted;
                Ok(None)
            }
        }
    }

    /// All attributes of the current node, in directory order.
    pub fn attributes(&mut self) -> Result<Vec<AttributeEntry>> {
        self.init_attr_dir()?;
        let mut out = Vec::new();
        while let Some(entry) = self.next_attr()? {
            out.push(entry);
        }
        Ok(out)
    }

    /// Look up an attribute of the current node by name.
    ///
    /// Scans the attribute directory from the start. A failed scan step is an
    /// I/O error; a complete scan without a match is
    /// [`Error::AttributeNotFound`].
    pub fn get_attr(&mut self, name: &str) -> Result<Value> {
        self.init_attr_dir()?;
        let count = self.attr_count()?;
        for _ in 0..count {
            let raw = self.call("getnextattr", |b| b.get_next_attr())?;
            if raw.name == name {
                return self.read_attr(raw).map(|entry| entry.value);
            }
        }
        Err(Error::AttributeNotFound(name.to_string()))
    }

    fn read_attr(&mut self, raw: RawAttr) -> Result<AttributeEntry> {
        let element_type = ElementType::try_from_code(raw.type_code)?;
        // Room for the terminator the library writes after character data.
        let length = if element_type == ElementType::Char { raw.length + 1 } else { raw.length };
        let mut buf = TypedBuffer::alloc(element_type, Dimensions::d1(length))?;
        self.call("getattr", |b| b.get_attr(&raw.name, &mut buf))?;
        let value = decode(&buf, ResultKind::Boxed)?;
        Ok(AttributeEntry { name: raw.name, element_type, value })
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Link identifier of the current group.
    pub fn get_group_id(&mut self) -> Result<NodeLink> {
        self.call("getgroupID", |b| b.get_group_id())
    }

    /// Link identifier of the open dataset.
    pub fn get_data_id(&mut self) -> Result<NodeLink> {
        self.call("getdataID", |b| b.get_data_id())
    }

    // ========================================================================
    // Writing (unimplemented)
    // ========================================================================

    pub fn make_group(&mut self, _name: &str, _class: &str) -> Result<()> {
        Err(Error::writing())
    }

    pub fn make_data(&mut self, _name: &str, _element_type: ElementType, _dims: &Dimensions) -> Result<()> {
        Err(Error::writing())
    }

    pub fn comp_make_data(
        &mut self,
        _name: &str,
        _element_type: ElementType,
        _dims: &Dimensions,
        _compression: i32,
    ) -> Result<()> {
        Err(Error::writing())
    }

    pub fn compress(&mut self, _compression: i32) -> Result<()> {
        Err(Error::writing())
    }

    pub fn put_data(&mut self, _value: &Value) -> Result<()> {
        Err(Error::writing())
    }

    pub fn put_slab(&mut self, _value: &Value, _start: &[i64], _size: &[i64]) -> Result<()> {
        Err(Error::writing())
    }

    /// The value is still checked against `element_type`, so a bad value
    /// reports an invalid argument rather than the missing write path.
    pub fn put_attr(&mut self, _name: &str, value: &Value, element_type: ElementType) -> Result<()> {
        encode(value, element_type, None)?;
        Err(Error::writing())
    }

    pub fn make_link(&mut self, _link: &NodeLink) -> Result<()> {
        Err(Error::writing())
    }
}

/// Check that `start..start+size` lies inside `dims` before a slab buffer
/// is allocated for it.
fn check_region(dims: &Dimensions, start: &[i64], size: &[i64]) -> Result<()> {
    if size.len() != dims.rank() {
        return Err(Error::io(format!(
            "getslab failed: rank {} region on dataset of shape {}",
            size.len(),
            dims
        )));
    }
    for ((&s, &n), &d) in start.iter().zip(size).zip(dims.sizes()) {
        let inside = s >= 0 && n >= 1 && s.checked_add(n).is_some_and(|end| end <= d);
        if !inside {
            return Err(Error::io(format!("getslab failed: region outside dataset of shape {dims}")));
        }
    }
    Ok(())
}

impl<B: NapiBackend> Drop for NexusFile<B> {
    fn drop(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            debug!(path = %self.filename.display(), "closing file on drop");
            if backend.close().is_err() {
                warn!(path = %self.filename.display(), "Could not close file");
            }
        }
    }
}

impl<B: NapiBackend> fmt::Debug for NexusFile<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NexusFile")
            .field("filename", &self.filename)
            .field("mode", &self.mode)
            .field("open", &self.backend.is_some())
            .finish()
    }
}
