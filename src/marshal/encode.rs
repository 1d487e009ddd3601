//! Array encoder: [`Value`]s to raw typed buffers.
//!
//! Accepts a scalar, a flat sequence or a rectangular nested sequence of
//! numbers (or text for `CHAR`), checks every element fits the target
//! element type and packs it row-major in native byte order.

use byteorder::{ByteOrder, NativeEndian};

use super::Value;
use crate::core::TypedBuffer;
use crate::util::{Dimensions, ElementType, Error, Result};

#[derive(Clone, Copy, Debug)]
enum Number {
    Int(i64),
    Float(f64),
}

/// Encode `value` as `element_type`.
///
/// The shape is inferred from the nesting of `value` (scalars become a
/// one-element array) unless `dims` is given, in which case its element
/// count must match.
pub fn encode(value: &Value, element_type: ElementType, dims: Option<&Dimensions>) -> Result<TypedBuffer> {
    if element_type == ElementType::Char {
        let text = value
            .as_text()
            .ok_or_else(|| Error::invalid(format!("CHAR data must be text, got {value}")))?;
        return Ok(TypedBuffer::from_text(text));
    }

    let mut flat = Flattener::default();
    flat.visit(value, 0)?;
    let Flattener { mut shape, items, .. } = flat;
    if shape.is_empty() {
        shape.push(1);
    }

    // An inferred shape can disagree with the item count too: `[[], []]`
    // is shaped (2, 0), which holds two elements.
    let dims = dims.cloned().unwrap_or_else(|| Dimensions::from(shape));
    if dims.checked_num_points() != Some(items.len()) {
        return Err(Error::invalid(format!(
            "shape {} holds {} elements, value has {}",
            dims,
            dims.num_points(),
            items.len()
        )));
    }

    let width = element_type.num_bytes();
    let mut data = vec![0u8; items.len() * width];
    for (slot, item) in data.chunks_exact_mut(width).zip(&items) {
        write_element(slot, element_type, *item)?;
    }
    TypedBuffer::from_bytes(element_type, dims, data)
}

/// Walks nested lists, recording the extent of each depth.
///
/// Sibling lists must agree in length and every leaf must sit at the
/// same depth, below the deepest list.
#[derive(Default)]
struct Flattener {
    shape: Vec<i64>,
    items: Vec<Number>,
    leaf_depth: Option<usize>,
}

impl Flattener {
    fn visit(&mut self, value: &Value, depth: usize) -> Result<()> {
        match value {
            Value::Int(i) => self.leaf(depth, Number::Int(*i)),
            Value::Float(f) => self.leaf(depth, Number::Float(*f)),
            Value::Ints(v) => {
                self.list(depth, v.len())?;
                v.iter().try_for_each(|&i| self.leaf(depth + 1, Number::Int(i)))
            }
            Value::Floats(v) => {
                self.list(depth, v.len())?;
                v.iter().try_for_each(|&f| self.leaf(depth + 1, Number::Float(f)))
            }
            Value::List(items) => {
                self.list(depth, items.len())?;
                items.iter().try_for_each(|item| self.visit(item, depth + 1))
            }
            Value::Text(_) => Err(Error::invalid("text in numeric data")),
            Value::None => Err(Error::invalid("absent value in numeric data")),
        }
    }

    fn leaf(&mut self, depth: usize, n: Number) -> Result<()> {
        if self.shape.len() != depth || self.leaf_depth.is_some_and(|d| d != depth) {
            return Err(ragged());
        }
        self.leaf_depth = Some(depth);
        self.items.push(n);
        Ok(())
    }

    fn list(&mut self, depth: usize, len: usize) -> Result<()> {
        if self.leaf_depth.is_some_and(|d| depth >= d) {
            return Err(ragged());
        }
        let len = len as i64;
        match self.shape.get(depth) {
            Some(&existing) if existing != len => Err(ragged()),
            Some(_) => Ok(()),
            None if depth == self.shape.len() => {
                self.shape.push(len);
                Ok(())
            }
            None => Err(ragged()),
        }
    }
}

fn ragged() -> Error {
    Error::invalid("ragged nested sequence")
}

fn write_element(slot: &mut [u8], element_type: ElementType, n: Number) -> Result<()> {
    if element_type.is_float() {
        let f = match n {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        };
        if element_type == ElementType::Float32 {
            if f.is_finite() && f.abs() > f32::MAX as f64 {
                return Err(Error::invalid(format!("{f} out of range for FLOAT32")));
            }
            NativeEndian::write_f32(slot, f as f32);
        } else {
            NativeEndian::write_f64(slot, f);
        }
        return Ok(());
    }

    let i = match n {
        Number::Int(i) => i,
        Number::Float(f) if f.fract() == 0.0 && f.is_finite() => f as i64,
        Number::Float(f) => {
            return Err(Error::invalid(format!("{f} is not an integer ({element_type})")));
        }
    };
    let (lo, hi) = element_type
        .integer_range()
        .ok_or_else(|| Error::invalid(format!("{element_type} is not numeric")))?;
    if i < lo || i > hi {
        return Err(Error::invalid(format!("{i} out of range for {element_type}")));
    }
    match element_type {
        ElementType::Int8 | ElementType::Uint8 => slot[0] = i as u8,
        ElementType::Int16 => NativeEndian::write_i16(slot, i as i16),
        ElementType::Uint16 => NativeEndian::write_u16(slot, i as u16),
        ElementType::Int32 => NativeEndian::write_i32(slot, i as i32),
        ElementType::Uint32 => NativeEndian::write_u32(slot, i as u32),
        _ => unreachable!("float and char handled above"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::{decode, ResultKind};

    fn ints(v: &[i64]) -> Value {
        Value::List(v.iter().map(|&i| Value::Int(i)).collect())
    }

    #[test]
    fn test_encode_nested_infers_shape() {
        let value = Value::List(vec![ints(&[1, 2, 3]), ints(&[4, 5, 6])]);
        let buf = encode(&value, ElementType::Int32, None).unwrap();
        assert_eq!(buf.dims().sizes(), &[2, 3]);
        assert_eq!(decode(&buf, ResultKind::Int).unwrap(), Value::Ints(vec![1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_encode_scalar_and_text() {
        let buf = encode(&Value::Float(0.25), ElementType::Float32, None).unwrap();
        assert_eq!(buf.dims().sizes(), &[1]);
        assert_eq!(decode(&buf, ResultKind::Boxed).unwrap(), Value::Float(0.25));

        let buf = encode(&Value::from("counts"), ElementType::Char, None).unwrap();
        assert_eq!(decode(&buf, ResultKind::Boxed).unwrap(), Value::Text("counts".into()));
        assert!(encode(&Value::Int(1), ElementType::Char, None).is_err());
    }

    #[test]
    fn test_encode_empty_shapes() {
        let buf = encode(&Value::List(Vec::new()), ElementType::Int8, None).unwrap();
        assert_eq!(buf.dims().sizes(), &[0]);
        assert_eq!(decode(&buf, ResultKind::Boxed).unwrap(), Value::None);

        let nested_empty = Value::List(vec![Value::List(Vec::new()), Value::List(Vec::new())]);
        assert!(matches!(
            encode(&nested_empty, ElementType::Int32, None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(encode(&ints(&[0, 256]), ElementType::Uint8, None).is_err());
        assert!(encode(&ints(&[-1]), ElementType::Uint32, None).is_err());
        assert!(encode(&ints(&[-128, 127]), ElementType::Int8, None).is_ok());
        assert!(encode(&Value::Float(1.5), ElementType::Int16, None).is_err());
        assert!(encode(&Value::Float(1e300), ElementType::Float32, None).is_err());
    }

    #[test]
    fn test_encode_rejects_mixed_and_ragged() {
        let mixed = Value::List(vec![Value::Int(1), Value::Text("x".into())]);
        assert!(encode(&mixed, ElementType::Int32, None).is_err());

        let ragged = Value::List(vec![ints(&[1, 2]), ints(&[3])]);
        assert!(encode(&ragged, ElementType::Int32, None).is_err());

        let uneven_depth = Value::List(vec![ints(&[1]), Value::Int(2)]);
        assert!(encode(&uneven_depth, ElementType::Int32, None).is_err());
    }

    #[test]
    fn test_encode_with_explicit_dims() {
        let dims = Dimensions::d2(2, 2);
        let buf = encode(&Value::Floats(vec![1.0, 2.0, 3.0, 4.0]), ElementType::Float64, Some(&dims)).unwrap();
        assert_eq!(buf.dims(), &dims);
        assert!(encode(&Value::Floats(vec![1.0]), ElementType::Float64, Some(&dims)).is_err());
    }
}
