//! Python bindings for sns-napi.
//!
//! Exposes the classic `nxpython`-style function surface: module level
//! functions taking an `NXhandle` object, plus the `ACC_*` access mode
//! constants.

use pyo3::exceptions::{PyIOError, PyNotImplementedError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::AccessMode;
use crate::util::{Error, ErrorKind};

mod api;
mod convert;
mod handle;

pub use handle::{PyNexusFile, PyNodeLink};

impl From<Error> for PyErr {
    fn from(e: Error) -> Self {
        let msg = e.to_string();
        match e.kind() {
            ErrorKind::Io => PyIOError::new_err(msg),
            ErrorKind::NotImplemented => PyNotImplementedError::new_err(msg),
            ErrorKind::Runtime => PyRuntimeError::new_err(msg),
            ErrorKind::InvalidArgument => PyValueError::new_err(msg),
        }
    }
}

/// sns_napi Python module.
#[pymodule]
fn sns_napi(m: &Bound<'_, PyModule>) -> PyResult<()> {
    for mode in AccessMode::ALL {
        m.add(mode.constant_name(), mode.code())?;
    }
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_class::<PyNexusFile>()?;
    m.add_class::<PyNodeLink>()?;
    api::register(m)?;
    Ok(())
}
