//! Array decoder: raw typed buffers to [`Value`]s.
//!
//! Widening follows the declared signedness of the element type:
//! `INT*` tags sign-extend, `UINT*` tags zero-extend, floats widen to
//! `f64`. The same rule backs boxed scalars and packed sequences.

use super::{ResultKind, Value};
use crate::core::TypedBuffer;
use crate::util::{ElementType, Error, Result};

/// Decode `buf` into a value of the requested kind.
///
/// - `CHAR` buffers become one [`Value::Text`] (bytes up to the first NUL),
///   whatever their shape.
/// - An empty buffer becomes [`Value::None`].
/// - A single element becomes an unwrapped scalar for every kind.
/// - Otherwise `kind` selects boxed or packed output.
pub fn decode(buf: &TypedBuffer, kind: ResultKind) -> Result<Value> {
    if buf.element_type() == ElementType::Char {
        return Ok(Value::Text(String::from_utf8_lossy(buf.text_bytes()).into_owned()));
    }

    match buf.len() {
        0 => Ok(Value::None),
        1 => decode_scalar(buf, 0),
        n => match kind {
            ResultKind::Boxed => (0..n)
                .map(|i| decode_scalar(buf, i))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            ResultKind::Float => (0..n)
                .map(|i| buf.get_f64(i).ok_or_else(|| out_of_bounds(buf, i)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Floats),
            ResultKind::Int => (0..n)
                .map(|i| buf.get_i64(i).ok_or_else(|| out_of_bounds(buf, i)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Ints),
        },
    }
}

/// Decode element `index` of `buf` as a boxed scalar.
pub fn decode_scalar(buf: &TypedBuffer, index: usize) -> Result<Value> {
    let value = match buf.element_type() {
        ElementType::Float32 | ElementType::Float64 => buf.get_f64(index).map(Value::Float),
        ElementType::Int8
        | ElementType::Uint8
        | ElementType::Int16
        | ElementType::Uint16
        | ElementType::Int32
        | ElementType::Uint32 => buf.get_i64(index).map(Value::Int),
        ElementType::Char => {
            return Err(Error::invalid("character data has no scalar conversion"));
        }
    };
    value.ok_or_else(|| out_of_bounds(buf, index))
}

fn out_of_bounds(buf: &TypedBuffer, index: usize) -> Error {
    Error::runtime(format!(
        "cannot decode element {} of a {}-element {} buffer",
        index,
        buf.len(),
        buf.element_type()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Dimensions;

    #[test]
    fn test_char_ignores_shape() {
        let buf = TypedBuffer::from_bytes(
            ElementType::Char,
            Dimensions::d2(4, 4),
            b"detector1\0\0\0\0\0\0\0".to_vec(),
        )
        .unwrap();
        for kind in [ResultKind::Boxed, ResultKind::Float, ResultKind::Int] {
            assert_eq!(decode(&buf, kind).unwrap(), Value::Text("detector1".into()));
        }
    }

    #[test]
    fn test_empty_is_none() {
        let buf = TypedBuffer::alloc(ElementType::Int32, Dimensions::d1(0)).unwrap();
        assert_eq!(decode(&buf, ResultKind::Int).unwrap(), Value::None);
    }

    #[test]
    fn test_single_element_is_unwrapped() {
        let buf = TypedBuffer::from_slice(Dimensions::d1(1), &[3.5f32]);
        for kind in [ResultKind::Boxed, ResultKind::Float, ResultKind::Int] {
            assert_eq!(decode(&buf, kind).unwrap(), Value::Float(3.5));
        }
        let buf = TypedBuffer::from_slice(Dimensions::scalar(), &[-4i8]);
        assert_eq!(decode(&buf, ResultKind::Float).unwrap(), Value::Int(-4));
    }

    #[test]
    fn test_kinds_agree() {
        let raw = [i32::MIN, -1, 0, 1, i32::MAX, 42];
        let buf = TypedBuffer::from_slice(Dimensions::d2(2, 3), &raw);

        let boxed = decode(&buf, ResultKind::Boxed).unwrap();
        let ints = decode(&buf, ResultKind::Int).unwrap();
        let floats = decode(&buf, ResultKind::Float).unwrap();

        let expected: Vec<i64> = raw.iter().map(|&v| v as i64).collect();
        assert_eq!(ints, Value::Ints(expected.clone()));
        assert_eq!(boxed, Value::List(expected.iter().map(|&v| Value::Int(v)).collect()));
        assert_eq!(floats, Value::Floats(expected.iter().map(|&v| v as f64).collect()));
    }

    #[test]
    fn test_unsigned_widening() {
        let buf = TypedBuffer::from_slice(Dimensions::d1(3), &[0u32, 1, u32::MAX]);
        assert_eq!(
            decode(&buf, ResultKind::Int).unwrap(),
            Value::Ints(vec![0, 1, u32::MAX as i64])
        );
        let buf = TypedBuffer::from_slice(Dimensions::d1(2), &[200u8, 255]);
        assert_eq!(
            decode(&buf, ResultKind::Boxed).unwrap(),
            Value::List(vec![Value::Int(200), Value::Int(255)])
        );
        let buf = TypedBuffer::from_slice(Dimensions::d1(2), &[-100i8, 100]);
        assert_eq!(decode(&buf, ResultKind::Int).unwrap(), Value::Ints(vec![-100, 100]));
    }

    #[test]
    fn test_float_to_int_kind_truncates() {
        let buf = TypedBuffer::from_slice(Dimensions::d1(3), &[1.9f64, -1.9, 0.0]);
        assert_eq!(decode(&buf, ResultKind::Int).unwrap(), Value::Ints(vec![1, -1, 0]));
    }
}
