//! Python handle objects.

use pyo3::prelude::*;

use crate::core::{LinkKind, NodeLink};
use crate::file::NexusFile;
use crate::util::{Error, Result};

/// An open file. Closed by `close()` or when garbage collected.
#[pyclass(name = "NXhandle", unsendable)]
pub struct PyNexusFile {
    pub(crate) inner: Option<NexusFile>,
}

impl PyNexusFile {
    pub(crate) fn new(file: NexusFile) -> Self {
        Self { inner: Some(file) }
    }

    pub(crate) fn file(&mut self) -> Result<&mut NexusFile> {
        self.inner.as_mut().ok_or(Error::ClosedHandle)
    }

    pub(crate) fn take(&mut self) -> Result<NexusFile> {
        self.inner.take().ok_or(Error::ClosedHandle)
    }
}

#[pymethods]
impl PyNexusFile {
    #[getter]
    fn closed(&self) -> bool {
        self.inner.is_none()
    }

    #[getter]
    fn filename(&self) -> Option<String> {
        self.inner.as_ref().map(|f| f.filename().display().to_string())
    }

    fn __repr__(&self) -> String {
        match &self.inner {
            Some(f) => format!("<NXhandle '{}' {}>", f.filename().display(), f.mode()),
            None => "<NXhandle closed>".to_string(),
        }
    }
}

/// Link identifier returned by `getgroupID` / `getdataID`.
#[pyclass(name = "NXlink", frozen)]
pub struct PyNodeLink {
    pub(crate) inner: NodeLink,
}

#[pymethods]
impl PyNodeLink {
    #[getter]
    fn target(&self) -> &str {
        self.inner.target()
    }

    #[getter]
    fn is_group(&self) -> bool {
        self.inner.kind() == LinkKind::Group
    }

    fn __repr__(&self) -> String {
        format!("<NXlink {}>", self.inner)
    }
}
