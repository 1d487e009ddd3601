//! Module level NAPI functions.

use pyo3::prelude::*;

use super::convert::{value_from_py, value_to_py};
use super::handle::{PyNexusFile, PyNodeLink};
use crate::core::AccessMode;
use crate::file::NexusFile;
use crate::marshal::ResultKind;
use crate::util::{Dimensions, ElementType};

#[pyfunction]
#[pyo3(signature = (filename, mode = AccessMode::Read.code()))]
fn open(filename: &str, mode: i32) -> PyResult<PyNexusFile> {
    let mode = AccessMode::from_code(mode)?;
    Ok(PyNexusFile::new(NexusFile::open(filename, mode)?))
}

#[pyfunction]
fn close(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<()> {
    Ok(handle.take()?.close()?)
}

#[pyfunction]
fn flush(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<()> {
    Ok(handle.file()?.flush()?)
}

// ============================================================================
// Navigation
// ============================================================================

#[pyfunction]
fn opengroup(mut handle: PyRefMut<'_, PyNexusFile>, name: &str, nxclass: &str) -> PyResult<()> {
    Ok(handle.file()?.open_group(name, nxclass)?)
}

#[pyfunction]
fn closegroup(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<()> {
    Ok(handle.file()?.close_group()?)
}

#[pyfunction]
fn openpath(mut handle: PyRefMut<'_, PyNexusFile>, path: &str) -> PyResult<()> {
    Ok(handle.file()?.open_path(path)?)
}

#[pyfunction]
fn opengrouppath(mut handle: PyRefMut<'_, PyNexusFile>, path: &str) -> PyResult<()> {
    Ok(handle.file()?.open_group_path(path)?)
}

#[pyfunction]
fn opendata(mut handle: PyRefMut<'_, PyNexusFile>, name: &str) -> PyResult<()> {
    Ok(handle.file()?.open_data(name)?)
}

#[pyfunction]
fn closedata(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<()> {
    Ok(handle.file()?.close_data()?)
}

// ============================================================================
// Reading
// ============================================================================

/// `(shape, type)` of the open dataset. `type` is `None` for codes
/// outside the known element types.
#[pyfunction]
fn getinfo(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<(Vec<i64>, Option<&'static str>)> {
    let (dims, name) = handle.file()?.get_dims()?;
    Ok((dims.sizes().to_vec(), name))
}

/// Never implemented by the native binding; always `None`.
#[pyfunction]
fn getgroupinfo(py: Python<'_>, _handle: PyRef<'_, PyNexusFile>) -> Py<PyAny> {
    py.None()
}

#[pyfunction]
#[pyo3(signature = (handle, kind = None))]
fn getdata(py: Python<'_>, mut handle: PyRefMut<'_, PyNexusFile>, kind: Option<&str>) -> PyResult<Py<PyAny>> {
    let kind = ResultKind::from_token(kind)?;
    let value = handle.file()?.get_data(kind)?;
    value_to_py(py, &value)
}

#[pyfunction]
#[pyo3(signature = (handle, start, size, kind = None))]
fn getslab(
    py: Python<'_>,
    mut handle: PyRefMut<'_, PyNexusFile>,
    start: Vec<i64>,
    size: Vec<i64>,
    kind: Option<&str>,
) -> PyResult<Py<PyAny>> {
    let kind = ResultKind::from_token(kind)?;
    let value = handle.file()?.get_slab(&start, &size, kind)?;
    value_to_py(py, &value)
}

#[pyfunction]
fn getattr(py: Python<'_>, mut handle: PyRefMut<'_, PyNexusFile>, name: &str) -> PyResult<Py<PyAny>> {
    let value = handle.file()?.get_attr(name)?;
    value_to_py(py, &value)
}

// ============================================================================
// Directories
// ============================================================================

#[pyfunction]
fn initgroupdir(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<()> {
    Ok(handle.file()?.init_group_dir()?)
}

/// `(name, class, type)` of the next child, `(None, None, -1)` at the end.
#[pyfunction]
fn getnextentry(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<(Option<String>, Option<String>, i32)> {
    Ok(match handle.file()?.next_entry()? {
        Some(entry) => (Some(entry.name), Some(entry.class), entry.type_code),
        None => (None, None, -1),
    })
}

#[pyfunction]
fn getnumattr(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<i64> {
    Ok(handle.file()?.attr_count()?)
}

#[pyfunction]
fn initattrdir(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<()> {
    Ok(handle.file()?.init_attr_dir()?)
}

/// `(name, value)` of the next attribute, `(None, None)` at the end.
#[pyfunction]
fn getnextattr(py: Python<'_>, mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<(Option<String>, Py<PyAny>)> {
    Ok(match handle.file()?.next_attr()? {
        Some(entry) => (Some(entry.name), value_to_py(py, &entry.value)?),
        None => (None, py.None()),
    })
}

// ============================================================================
// Links
// ============================================================================

#[pyfunction]
#[pyo3(name = "getgroupID")]
fn getgroup_id(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<PyNodeLink> {
    Ok(PyNodeLink { inner: handle.file()?.get_group_id()? })
}

#[pyfunction]
#[pyo3(name = "getdataID")]
fn getdata_id(mut handle: PyRefMut<'_, PyNexusFile>) -> PyResult<PyNodeLink> {
    Ok(PyNodeLink { inner: handle.file()?.get_data_id()? })
}

// ============================================================================
// Writing (unimplemented)
// ============================================================================

#[pyfunction]
fn makegroup(mut handle: PyRefMut<'_, PyNexusFile>, name: &str, nxclass: &str) -> PyResult<()> {
    Ok(handle.file()?.make_group(name, nxclass)?)
}

#[pyfunction]
fn makedata(mut handle: PyRefMut<'_, PyNexusFile>, name: &str, type_code: i32, dims: Vec<i64>) -> PyResult<()> {
    let element_type = ElementType::try_from_code(type_code)?;
    Ok(handle.file()?.make_data(name, element_type, &Dimensions::from(dims))?)
}

#[pyfunction]
fn compmakedata(
    mut handle: PyRefMut<'_, PyNexusFile>,
    name: &str,
    type_code: i32,
    dims: Vec<i64>,
    compression: i32,
) -> PyResult<()> {
    let element_type = ElementType::try_from_code(type_code)?;
    Ok(handle.file()?.comp_make_data(name, element_type, &Dimensions::from(dims), compression)?)
}

#[pyfunction]
fn compress(mut handle: PyRefMut<'_, PyNexusFile>, compression: i32) -> PyResult<()> {
    Ok(handle.file()?.compress(compression)?)
}

#[pyfunction]
fn putdata(mut handle: PyRefMut<'_, PyNexusFile>, data: &Bound<'_, PyAny>) -> PyResult<()> {
    let value = value_from_py(data)?;
    Ok(handle.file()?.put_data(&value)?)
}

#[pyfunction]
fn putslab(
    mut handle: PyRefMut<'_, PyNexusFile>,
    data: &Bound<'_, PyAny>,
    start: Vec<i64>,
    size: Vec<i64>,
) -> PyResult<()> {
    let value = value_from_py(data)?;
    Ok(handle.file()?.put_slab(&value, &start, &size)?)
}

#[pyfunction]
fn putattr(mut handle: PyRefMut<'_, PyNexusFile>, name: &str, value: &Bound<'_, PyAny>, type_code: i32) -> PyResult<()> {
    let element_type = ElementType::try_from_code(type_code)?;
    let value = value_from_py(value)?;
    Ok(handle.file()?.put_attr(name, &value, element_type)?)
}

#[pyfunction]
fn makelink(mut handle: PyRefMut<'_, PyNexusFile>, link: PyRef<'_, PyNodeLink>) -> PyResult<()> {
    Ok(handle.file()?.make_link(&link.inner)?)
}

pub(super) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(open, m)?)?;
    m.add_function(wrap_pyfunction!(close, m)?)?;
    m.add_function(wrap_pyfunction!(flush, m)?)?;

    m.add_function(wrap_pyfunction!(opengroup, m)?)?;
    m.add_function(wrap_pyfunction!(closegroup, m)?)?;
    m.add_function(wrap_pyfunction!(openpath, m)?)?;
    m.add_function(wrap_pyfunction!(opengrouppath, m)?)?;
    m.add_function(wrap_pyfunction!(opendata, m)?)?;
    m.add_function(wrap_pyfunction!(closedata, m)?)?;

    m.add_function(wrap_pyfunction!(getinfo, m)?)?;
    m.add_function(wrap_pyfunction!(getgroupinfo, m)?)?;
    m.add_function(wrap_pyfunction!(getdata, m)?)?;
    m.add_function(wrap_pyfunction!(getslab, m)?)?;
    m.add_function(wrap_pyfunction!(getattr, m)?)?;

    m.add_function(wrap_pyfunction!(initgroupdir, m)?)?;
    m.add_function(wrap_pyfunction!(getnextentry, m)?)?;
    m.add_function(wrap_pyfunction!(getnumattr, m)?)?;
    m.add_function(wrap_pyfunction!(initattrdir, m)?)?;
    m.add_function(wrap_pyfunction!(getnextattr, m)?)?;

    m.add_function(wrap_pyfunction!(getgroup_id, m)?)?;
    m.add_function(wrap_pyfunction!(getdata_id, m)?)?;

    m.add_function(wrap_pyfunction!(makegroup, m)?)?;
    m.add_function(wrap_pyfunction!(makedata, m)?)?;
    m.add_function(wrap_pyfunction!(compmakedata, m)?)?;
    m.add_function(wrap_pyfunction!(compress, m)?)?;
    m.add_function(wrap_pyfunction!(putdata, m)?)?;
    m.add_function(wrap_pyfunction!(putslab, m)?)?;
    m.add_function(wrap_pyfunction!(putattr, m)?)?;
    m.add_function(wrap_pyfunction!(makelink, m)?)?;
    Ok(())
}
