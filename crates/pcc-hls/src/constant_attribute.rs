//! Constant-attribute data unit codec.
//!
//! Signals that an attribute is uniform over a slice, carrying the single
//! shared value vector in place of a compressed stream.

use crate::bit_reader::BitReader;
use crate::bit_writer::{BitWrite, BitWriter};
use crate::payload::{PayloadBuffer, PayloadType};
use crate::sequence_parameter_set::SequenceParameterSet;
use crate::status::HlsError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantAttributeDataUnit {
    pub constattr_attr_parameter_set_id: u32,
    pub constattr_sps_attr_idx: u32,
    pub constattr_geom_slice_id: u32,
    /// One value per attribute dimension.
    pub constattr_default_value: Vec<u32>,
}

impl ConstantAttributeDataUnit {
    pub fn write(&self, sps: &SequenceParameterSet) -> Result<PayloadBuffer, HlsError> {
        let mut buf = PayloadBuffer::new(PayloadType::ConstantAttribute);
        let mut bs = BitWriter::new();

        let attr = sps.attribute_set(self.constattr_sps_attr_idx)?;
        if self.constattr_default_value.len() != attr.num_dimensions() {
            return Err(HlsError::InvalidParameter(format!(
                "constant value has {} components for a {}-dimensional attribute",
                self.constattr_default_value.len(),
                attr.num_dimensions()
            )));
        }

        bs.write_ue(self.constattr_attr_parameter_set_id);
        bs.write_ue(self.constattr_sps_attr_idx);
        bs.write_ue(self.constattr_geom_slice_id);

        bs.write_un(attr.bitdepth, self.constattr_default_value[0]);
        for &value in &self.constattr_default_value[1..] {
            bs.write_un(attr.bitdepth_secondary, value);
        }
        bs.byte_align();

        buf.append_bits(bs);
        Ok(buf)
    }

    pub fn parse(buf: &PayloadBuffer, sps: &SequenceParameterSet) -> Result<Self, HlsError> {
        buf.expect(PayloadType::ConstantAttribute)?;
        let mut bs = BitReader::new(buf.data());

        let constattr_attr_parameter_set_id = bs.read_ue()?;
        let constattr_sps_attr_idx = bs.read_ue()?;
        let constattr_geom_slice_id = bs.read_ue()?;

        let attr = sps.attribute_set(constattr_sps_attr_idx)?;

        let mut constattr_default_value = vec![0u32; attr.num_dimensions()];
        constattr_default_value[0] = bs.read_un(attr.bitdepth)?;
        for value in constattr_default_value.iter_mut().skip(1) {
            *value = bs.read_un(attr.bitdepth_secondary)?;
        }
        bs.byte_align();

        Ok(Self {
            constattr_attr_parameter_set_id,
            constattr_sps_attr_idx,
            constattr_geom_slice_id,
            constattr_default_value,
        })
    }
}
