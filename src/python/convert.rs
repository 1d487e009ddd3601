//! Conversion between decoded values and Python objects.

use pyo3::prelude::*;
use pyo3::types::{PyFloat, PyInt, PyList, PyString, PyTuple};
use pyo3::IntoPyObjectExt;

use crate::marshal::Value;
use crate::util::{Error, Result};

/// Convert a decoded value to a Python object.
///
/// Text becomes `str`, scalars become `int`/`float` and every sequence
/// kind becomes a `list`.
pub(crate) fn value_to_py(py: Python<'_>, value: &Value) -> PyResult<Py<PyAny>> {
    match value {
        Value::None => Ok(py.None()),
        Value::Text(s) => s.into_py_any(py),
        Value::Int(i) => i.into_py_any(py),
        Value::Float(f) => f.into_py_any(py),
        Value::List(items) => {
            let items = items.iter().map(|v| value_to_py(py, v)).collect::<PyResult<Vec<_>>>()?;
            items.into_py_any(py)
        }
        Value::Ints(v) => v.into_py_any(py),
        Value::Floats(v) => v.into_py_any(py),
    }
}

/// Convert a Python object to a value. Accepts `None`, `str`, `int`,
/// `float` and nested lists or tuples of those.
pub(crate) fn value_from_py(obj: &Bound<'_, PyAny>) -> Result<Value> {
    if obj.is_none() {
        return Ok(Value::None);
    }
    if let Ok(s) = obj.cast::<PyString>() {
        return Ok(Value::Text(s.to_string()));
    }
    if obj.is_instance_of::<PyInt>() {
        return obj.extract::<i64>().map(Value::Int).map_err(|e| Error::invalid(e.to_string()));
    }
    if obj.is_instance_of::<PyFloat>() {
        return obj.extract::<f64>().map(Value::Float).map_err(|e| Error::invalid(e.to_string()));
    }
    if let Ok(list) = obj.cast::<PyList>() {
        return list.iter().map(|item| value_from_py(&item)).collect::<Result<_>>().map(Value::List);
    }
    if let Ok(tuple) = obj.cast::<PyTuple>() {
        return tuple.iter().map(|item| value_from_py(&item)).collect::<Result<_>>().map(Value::List);
    }
    Err(Error::invalid(format!("unsupported value of type {}", type_name(obj))))
}

fn type_name(obj: &Bound<'_, PyAny>) -> String {
    obj.get_type().name().map(|n| n.to_string()).unwrap_or_else(|_| "?".to_string())
}
