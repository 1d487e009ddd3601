//! [`NapiBackend`] over an in-memory tree.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::document;
use super::tree::{Attribute, Group, Node};
use crate::core::{
    AccessMode, DataInfo, LinkKind, NapiBackend, NodeLink, NxResult, NxStatus, RawAttr, RawEntry,
    TypedBuffer,
};
use crate::util::ElementType;

/// Native handle over an owned node tree.
///
/// Files are JSON text containers (see [`document`]); writable handles
/// save the tree back on flush and close.
#[derive(Debug)]
pub struct MemoryBackend {
    root: Group,
    path: Option<PathBuf>,
    mode: AccessMode,
    /// Child indices of the open groups, from the root down
    groups: Vec<usize>,
    /// Child index of the open dataset in the current group
    data: Option<usize>,
    entry_cursor: Option<usize>,
    attr_cursor: Option<usize>,
    closed: bool,
}

impl MemoryBackend {
    /// Handle over `root` with no backing file.
    pub fn from_tree(root: Group) -> Self {
        Self::with_mode(root, None, AccessMode::Read)
    }

    fn with_mode(root: Group, path: Option<PathBuf>, mode: AccessMode) -> Self {
        Self {
            root,
            path,
            mode,
            groups: Vec::new(),
            data: None,
            entry_cursor: None,
            attr_cursor: None,
            closed: false,
        }
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    fn group_at<'a>(root: &'a Group, indices: &[usize]) -> Option<&'a Group> {
        indices
            .iter()
            .try_fold(root, |group, &i| group.children.get(i).and_then(Node::as_group))
    }

    fn current_group(&self) -> NxResult<&Group> {
        Self::group_at(&self.root, &self.groups).ok_or(NxStatus::Error)
    }

    fn current_node_attrs(&self) -> NxResult<&[Attribute]> {
        let group = self.current_group()?;
        match self.data {
            Some(i) => group.children.get(i).map(Node::attributes).ok_or(NxStatus::Error),
            None => Ok(&group.attributes),
        }
    }

    fn open_dataset(&self) -> NxResult<&super::Dataset> {
        let i = self.data.ok_or(NxStatus::Error)?;
        self.current_group()?.children.get(i).and_then(Node::as_data).ok_or(NxStatus::Error)
    }

    fn reset_cursors(&mut self) {
        self.entry_cursor = None;
        self.attr_cursor = None;
    }

    fn current_path(&self) -> String {
        let mut names = Vec::with_capacity(self.groups.len() + 1);
        let mut group = &self.root;
        for &i in &self.groups {
            match group.children.get(i) {
                Some(Node::Group(g)) => {
                    names.push(g.name.as_str());
                    group = g;
                }
                _ => break,
            }
        }
        if let Some(node) = self.data.and_then(|i| group.children.get(i)) {
            names.push(node.name());
        }
        format!("/{}", names.join("/"))
    }

    /// Walk `path` from the current position and return the resulting
    /// (groups, data) position without committing it.
    fn resolve(&self, path: &str, stop_before_data: bool) -> NxResult<(Vec<usize>, Option<usize>)> {
        let (mut groups, mut data) = if path.starts_with('/') {
            (Vec::new(), None)
        } else {
            (self.groups.clone(), self.data)
        };
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty() && *c != ".").collect();

        for (n, component) in components.iter().enumerate() {
            let last = n + 1 == components.len();
            if *component == ".." {
                if data.take().is_none() && groups.pop().is_none() {
                    return Err(NxStatus::Error);
                }
                continue;
            }
            if data.is_some() {
                return Err(NxStatus::Error);
            }
            let group = Self::group_at(&self.root, &groups).ok_or(NxStatus::Error)?;
            let index = group.position(component).ok_or(NxStatus::Error)?;
            match &group.children[index] {
                Node::Group(_) => groups.push(index),
                Node::Data(_) if last && !stop_before_data => data = Some(index),
                Node::Data(_) if last => {}
                Node::Data(_) => return Err(NxStatus::Error),
            }
        }
        Ok((groups, data))
    }

    /// Copy `src` into `dst`, stripping trailing whitespace from character
    /// data unless the file was opened with padding kept.
    fn copy_payload(&self, src: &[u8], element_type: ElementType, dst: &mut [u8]) {
        let src = if element_type == ElementType::Char && !self.mode.keeps_padding() {
            let end = src.iter().rposition(|b| !b.is_ascii_whitespace() && *b != 0).map_or(0, |p| p + 1);
            &src[..end]
        } else {
            src
        };
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        dst[n..].fill(0);
    }
}

impl NapiBackend for MemoryBackend {
    fn open(path: &Path, mode: AccessMode) -> NxResult<Self> {
        let root = if mode.creates() {
            Group::root()
        } else {
            document::load(path).map_err(|e| {
                warn!(path = %path.display(), error = %e, "cannot read container");
                NxStatus::Error
            })?
        };
        let backend = Self::with_mode(root, Some(path.to_path_buf()), mode);
        if mode.creates() {
            // Create the file up front so a bad path fails at open.
            let mut created = backend;
            created.flush()?;
            return Ok(created);
        }
        Ok(backend)
    }

    fn close(&mut self) -> NxResult<()> {
        if self.closed {
            return Err(NxStatus::Error);
        }
        let flushed = self.flush();
        self.closed = true;
        flushed
    }

    fn open_group(&mut self, name: &str, class: &str) -> NxResult<()> {
        let group = self.current_group()?;
        let index = group.position(name).ok_or(NxStatus::Error)?;
        match &group.children[index] {
            Node::Group(g) if g.class == class => {}
            _ => return Err(NxStatus::Error),
        }
        self.groups.push(index);
        self.data = None;
        self.reset_cursors();
        Ok(())
    }

    fn close_group(&mut self) -> NxResult<()> {
        self.groups.pop().ok_or(NxStatus::Error)?;
        self.data = None;
        self.reset_cursors();
        Ok(())
    }

    fn open_path(&mut self, path: &str) -> NxResult<()> {
        let (groups, data) = self.resolve(path, false)?;
        self.groups = groups;
        self.data = data;
        self.reset_cursors();
        Ok(())
    }

    fn open_group_path(&mut self, path: &str) -> NxResult<()> {
        let (groups, data) = self.resolve(path, true)?;
        self.groups = groups;
        self.data = data;
        self.reset_cursors();
        Ok(())
    }

    fn open_data(&mut self, name: &str) -> NxResult<()> {
        let group = self.current_group()?;
        let index = group.position(name).ok_or(NxStatus::Error)?;
        if !matches!(group.children[index], Node::Data(_)) {
            return Err(NxStatus::Error);
        }
        self.data = Some(index);
        self.reset_cursors();
        Ok(())
    }

    fn close_data(&mut self) -> NxResult<()> {
        self.data.take().ok_or(NxStatus::Error)?;
        self.reset_cursors();
        Ok(())
    }

    fn get_info(&mut self) -> NxResult<DataInfo> {
        let data = &self.open_dataset()?.data;
        Ok(DataInfo::new(data.dims().clone(), data.element_type()))
    }

    fn get_data(&mut self, buf: &mut TypedBuffer) -> NxResult<()> {
        let data = &self.open_dataset()?.data;
        let element_type = data.element_type();
        if buf.element_type() != element_type {
            return Err(NxStatus::Error);
        }
        if element_type != ElementType::Char && buf.as_bytes().len() != data.as_bytes().len() {
            return Err(NxStatus::Error);
        }
        let src = data.as_bytes().to_vec();
        self.copy_payload(&src, element_type, buf.as_bytes_mut());
        Ok(())
    }

    fn get_slab(&mut self, buf: &mut TypedBuffer, start: &[i64], size: &[i64]) -> NxResult<()> {
        let data = &self.open_dataset()?.data;
        let dims = data.dims().sizes();
        let width = data.element_type().num_bytes();
        if buf.element_type() != data.element_type() || start.len() != dims.len() || size.len() != dims.len() {
            return Err(NxStatus::Error);
        }
        for ((&s, &n), &d) in start.iter().zip(size).zip(dims) {
            if s < 0 || n < 1 || s.checked_add(n).map_or(true, |end| end > d) {
                return Err(NxStatus::Error);
            }
        }

        let total: usize = size.iter().map(|&n| n as usize).product();
        if buf.as_bytes().len() != total * width {
            return Err(NxStatus::Error);
        }

        // Row-major strides of the full dataset.
        let mut strides = vec![1usize; dims.len()];
        for d in (0..dims.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * dims[d + 1] as usize;
        }

        let src = data.as_bytes();
        let dst = buf.as_bytes_mut();
        let mut index = vec![0usize; size.len()];
        for k in 0..total {
            let offset: usize = index
                .iter()
                .zip(start)
                .zip(&strides)
                .map(|((&i, &s), &stride)| (s as usize + i) * stride)
                .sum();
            dst[k * width..(k + 1) * width].copy_from_slice(&src[offset * width..(offset + 1) * width]);

            for d in (0..index.len()).rev() {
                index[d] += 1;
                if index[d] < size[d] as usize {
                    break;
                }
                index[d] = 0;
            }
        }
        Ok(())
    }

    fn get_attr(&mut self, name: &str, buf: &mut TypedBuffer) -> NxResult<()> {
        let attr = self
            .current_node_attrs()?
            .iter()
            .find(|a| a.name == name)
            .ok_or(NxStatus::Error)?;
        let element_type = attr.value.element_type();
        if buf.element_type() != element_type {
            return Err(NxStatus::Error);
        }
        let src = attr.value.as_bytes().to_vec();
        self.copy_payload(&src, element_type, buf.as_bytes_mut());
        Ok(())
    }

    fn flush(&mut self) -> NxResult<()> {
        if !self.mode.is_writable() {
            return Ok(());
        }
        let Some(path) = &self.path else {
            return Ok(());
        };
        debug!(path = %path.display(), "writing container");
        document::save(&self.root, path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "cannot write container");
            NxStatus::Error
        })
    }

    fn init_group_dir(&mut self) -> NxResult<()> {
        self.current_group()?;
        self.entry_cursor = Some(0);
        Ok(())
    }

    fn get_next_entry(&mut self) -> NxResult<RawEntry> {
        let pos = self.entry_cursor.ok_or(NxStatus::Error)?;
        let node = self.current_group()?.children.get(pos).ok_or(NxStatus::EndOfData)?;
        let entry = match node {
            Node::Group(g) => RawEntry { name: g.name.clone(), class: g.class.clone(), type_code: 0 },
            Node::Data(d) => RawEntry {
                name: d.name.clone(),
                class: crate::file::DATA_CLASS.to_string(),
                type_code: d.element_type().code(),
            },
        };
        self.entry_cursor = Some(pos + 1);
        Ok(entry)
    }

    fn get_attr_count(&mut self) -> NxResult<i64> {
        Ok(self.current_node_attrs()?.len() as i64)
    }

    fn init_attr_dir(&mut self) -> NxResult<()> {
        self.current_node_attrs()?;
        self.attr_cursor = Some(0);
        Ok(())
    }

    fn get_next_attr(&mut self) -> NxResult<RawAttr> {
        let pos = self.attr_cursor.ok_or(NxStatus::Error)?;
        let attr = self.current_node_attrs()?.get(pos).ok_or(NxStatus::EndOfData)?;
        let raw = RawAttr {
            name: attr.name.clone(),
            length: attr.length(),
            type_code: attr.value.element_type().code(),
        };
        self.attr_cursor = Some(pos + 1);
        Ok(raw)
    }

    fn get_group_id(&mut self) -> NxResult<NodeLink> {
        self.current_group()?;
        let path = if self.data.is_some() {
            let full = self.current_path();
            match full.rsplit_once('/') {
                Some(("", _)) | None => "/".to_string(),
                Some((parent, _)) => parent.to_string(),
            }
        } else {
            self.current_path()
        };
        Ok(NodeLink::new(LinkKind::Group, path))
    }

    fn get_data_id(&mut self) -> NxResult<NodeLink> {
        self.open_dataset()?;
        Ok(NodeLink::new(LinkKind::Data, self.current_path()))
    }
}
