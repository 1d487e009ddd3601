//! Typed raw buffers exchanged with the native library.

use bytemuck::Pod;
use byteorder::{ByteOrder, NativeEndian};

use crate::util::{Dimensions, ElementType, Error, Result};

/// Trait for Rust primitives that map onto an [`ElementType`].
pub trait NxElement: Pod + Copy + Default {
    /// The corresponding element type tag.
    const ELEMENT_TYPE: ElementType;
}

impl NxElement for i8 {
    const ELEMENT_TYPE: ElementType = ElementType::Int8;
}

impl NxElement for u8 {
    const ELEMENT_TYPE: ElementType = ElementType::Uint8;
}

impl NxElement for i16 {
    const ELEMENT_TYPE: ElementType = ElementType::Int16;
}

impl NxElement for u16 {
    const ELEMENT_TYPE: ElementType = ElementType::Uint16;
}

impl NxElement for i32 {
    const ELEMENT_TYPE: ElementType = ElementType::Int32;
}

impl NxElement for u32 {
    const ELEMENT_TYPE: ElementType = ElementType::Uint32;
}

impl NxElement for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::Float32;
}

impl NxElement for f64 {
    const ELEMENT_TYPE: ElementType = ElementType::Float64;
}

/// Element type, shape and native-endian element storage.
///
/// Allocated by [`TypedBuffer::alloc`] before a read, filled by the
/// backend, consumed by the decoder. Dropping the buffer releases it.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedBuffer {
    element_type: ElementType,
    dims: Dimensions,
    data: Vec<u8>,
}

impl TypedBuffer {
    /// Allocate a zeroed buffer large enough for `dims`.
    ///
    /// Fails with an I/O error when the byte size does not fit in memory.
    pub fn alloc(element_type: ElementType, dims: Dimensions) -> Result<Self> {
        let len = dims
            .checked_num_points()
            .and_then(|n| n.checked_mul(element_type.num_bytes()))
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or_else(|| Error::io(format!("cannot allocate {element_type} buffer of shape {dims}")))?;
        Ok(Self { element_type, dims, data: vec![0u8; len] })
    }

    /// Wrap raw bytes. The length must be a whole number of elements.
    pub fn from_bytes(element_type: ElementType, dims: Dimensions, data: Vec<u8>) -> Result<Self> {
        if data.len() % element_type.num_bytes() != 0 {
            return Err(Error::invalid(format!(
                "{} bytes is not a whole number of {} elements",
                data.len(),
                element_type
            )));
        }
        Ok(Self { element_type, dims, data })
    }

    /// Copy a typed slice into a new buffer.
    pub fn from_slice<T: NxElement>(dims: Dimensions, values: &[T]) -> Self {
        Self {
            element_type: T::ELEMENT_TYPE,
            dims,
            data: bytemuck::cast_slice(values).to_vec(),
        }
    }

    /// Character buffer holding `text`, shaped as its byte length.
    pub fn from_text(text: &str) -> Self {
        let data = text.as_bytes().to_vec();
        Self {
            element_type: ElementType::Char,
            dims: Dimensions::d1(data.len() as i64),
            data,
        }
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    #[inline]
    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    /// Number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.element_type.num_bytes()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Element `index` widened to `f64`.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        let width = self.element_type.num_bytes();
        let raw = self.data.get(index * width..(index + 1) * width)?;
        Some(match self.element_type {
            ElementType::Float32 => NativeEndian::read_f32(raw) as f64,
            ElementType::Float64 => NativeEndian::read_f64(raw),
            _ => self.get_i64(index)? as f64,
        })
    }

    /// Element `index` widened to `i64` per the type's declared signedness.
    ///
    /// Floats truncate toward zero. Character elements read as bytes.
    pub fn get_i64(&self, index: usize) -> Option<i64> {
        let width = self.element_type.num_bytes();
        let raw = self.data.get(index * width..(index + 1) * width)?;
        Some(match self.element_type {
            ElementType::Char | ElementType::Uint8 => raw[0] as i64,
            ElementType::Int8 => raw[0] as i8 as i64,
            ElementType::Int16 => NativeEndian::read_i16(raw) as i64,
            ElementType::Uint16 => NativeEndian::read_u16(raw) as i64,
            ElementType::Int32 => NativeEndian::read_i32(raw) as i64,
            ElementType::Uint32 => NativeEndian::read_u32(raw) as i64,
            ElementType::Float32 => NativeEndian::read_f32(raw) as i64,
            ElementType::Float64 => NativeEndian::read_f64(raw) as i64,
        })
    }

    /// Bytes up to the first NUL terminator.
    pub fn text_bytes(&self) -> &[u8] {
        let end = self.data.iter().position(|&b| b == 0).unwrap_or(self.data.len());
        &self.data[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_sizes() {
        let buf = TypedBuffer::alloc(ElementType::Int32, Dimensions::d2(2, 3)).unwrap();
        assert_eq!(buf.len(), 6);
        assert_eq!(buf.as_bytes().len(), 24);

        let empty = TypedBuffer::alloc(ElementType::Float64, Dimensions::d1(0)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_alloc_overflow_fails() {
        let err = TypedBuffer::alloc(ElementType::Int32, Dimensions::d2(i64::MAX, 4)).unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        let err = TypedBuffer::alloc(ElementType::Float64, Dimensions::d1(i64::MAX / 4)).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_signedness_widening() {
        let buf = TypedBuffer::from_slice(Dimensions::d1(2), &[-1i16, 7]);
        assert_eq!(buf.get_i64(0), Some(-1));
        assert_eq!(buf.get_i64(1), Some(7));

        let buf = TypedBuffer::from_slice(Dimensions::d1(1), &[u16::MAX]);
        assert_eq!(buf.get_i64(0), Some(65535));

        let buf = TypedBuffer::from_slice(Dimensions::d1(1), &[u32::MAX]);
        assert_eq!(buf.get_i64(0), Some(u32::MAX as i64));
        assert_eq!(buf.get_f64(0), Some(u32::MAX as f64));

        let buf = TypedBuffer::from_slice(Dimensions::d1(1), &[-128i8]);
        assert_eq!(buf.get_i64(0), Some(-128));
        assert_eq!(buf.get_i64(1), None);
    }

    #[test]
    fn test_text_bytes_stop_at_terminator() {
        let buf = TypedBuffer::from_bytes(
            ElementType::Char,
            Dimensions::d1(8),
            b"abc\0junk".to_vec(),
        )
        .unwrap();
        assert_eq!(buf.text_bytes(), b"abc");
        assert_eq!(TypedBuffer::from_text("xyz").text_bytes(), b"xyz");
    }

    #[test]
    fn test_from_bytes_rejects_partial_elements() {
        assert!(TypedBuffer::from_bytes(ElementType::Int32, Dimensions::d1(1), vec![0; 3]).is_err());
    }
}
