//! Tagged payload buffers carrying one encoded syntax structure each.

use crate::bit_writer::BitWriter;
use crate::status::{HlsError, Status};

/// Identifies which codec applies to a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadType {
    SequenceParameterSet = 0,
    GeometryParameterSet = 1,
    GeometryBrick = 2,
    AttributeParameterSet = 3,
    AttributeBrick = 4,
    ConstantAttribute = 5,
    TileInventory = 6,
}

impl PayloadType {
    /// Decodes a payload tag byte.
    pub fn from_tag(tag: u8) -> Result<Self, HlsError> {
        match tag {
            0 => Ok(PayloadType::SequenceParameterSet),
            1 => Ok(PayloadType::GeometryParameterSet),
            2 => Ok(PayloadType::GeometryBrick),
            3 => Ok(PayloadType::AttributeParameterSet),
            4 => Ok(PayloadType::AttributeBrick),
            5 => Ok(PayloadType::ConstantAttribute),
            6 => Ok(PayloadType::TileInventory),
            _ => Err(HlsError::InvalidParameter(format!(
                "unknown payload type tag {}",
                tag
            ))),
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// A byte buffer tagged with the payload type it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadBuffer {
    payload_type: PayloadType,
    pub(crate) data: Vec<u8>,
}

impl PayloadBuffer {
    /// Creates an empty payload of the given type.
    pub fn new(payload_type: PayloadType) -> Self {
        Self {
            payload_type,
            data: Vec::new(),
        }
    }

    /// Wraps bytes received from a container as a payload of the given type.
    pub fn from_data(payload_type: PayloadType, data: Vec<u8>) -> Self {
        Self { payload_type, data }
    }

    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends raw bytes, used for the entropy-coded body between a slice
    /// header and its footer.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn append_bits(&mut self, bs: BitWriter) {
        self.data.extend(bs.finish());
    }

    pub(crate) fn expect(&self, expected: PayloadType) -> Status {
        if self.payload_type != expected {
            return Err(HlsError::PayloadTypeMismatch {
                expected,
                actual: self.payload_type,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for tag in 0..=6u8 {
            let payload_type = PayloadType::from_tag(tag).unwrap();
            assert_eq!(payload_type.tag(), tag);
        }
        assert!(PayloadType::from_tag(7).is_err());
    }

    #[test]
    fn test_expect_rejects_wrong_type() {
        let buf = PayloadBuffer::new(PayloadType::GeometryBrick);
        assert!(buf.expect(PayloadType::GeometryBrick).is_ok());
        assert!(matches!(
            buf.expect(PayloadType::SequenceParameterSet),
            Err(HlsError::PayloadTypeMismatch { .. })
        ));
    }
}
