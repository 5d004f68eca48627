//! Sequence parameter set codec.

use crate::attribute::{
    parse_attribute_description, write_attribute_description, AttributeDescription,
};
use crate::axis_order::{to_external_order, to_internal_order, AxisOrder};
use crate::bit_reader::BitReader;
use crate::bit_writer::{BitWrite, BitWriter};
use crate::payload::{PayloadBuffer, PayloadType};
use crate::status::HlsError;
use crate::vec3::Vec3;

/// Sequence-level bounding box, held in internal axis order at full scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceBoundingBox {
    pub origin: Vec3<i32>,
    pub size: Vec3<u32>,
}

/// Sequence-wide configuration record.
///
/// Decoded once per sequence; geometry and attribute parameter sets and all
/// slice headers borrow it for the lifetime of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceParameterSet {
    pub profile_compatibility_flags: u32,
    pub level: u8,
    pub sps_seq_parameter_set_id: u32,
    pub bounding_box: Option<SequenceBoundingBox>,
    pub seq_geom_scale: f32,
    pub seq_geom_scale_unit_flag: bool,
    pub attribute_sets: Vec<AttributeDescription>,
    /// Width of the per-slice frame index field, at most 31 bits.
    pub log2_max_frame_idx: u8,
    pub geometry_axis_order: AxisOrder,
    pub cabac_bypass_stream_enabled_flag: bool,
}

impl Default for SequenceParameterSet {
    fn default() -> Self {
        Self {
            profile_compatibility_flags: 0,
            level: 0,
            sps_seq_parameter_set_id: 0,
            bounding_box: None,
            seq_geom_scale: 1.0,
            seq_geom_scale_unit_flag: false,
            attribute_sets: Vec::new(),
            log2_max_frame_idx: 0,
            geometry_axis_order: AxisOrder::Xyz,
            cabac_bypass_stream_enabled_flag: false,
        }
    }
}

impl SequenceParameterSet {
    /// Looks up an attribute set, surfacing a missing index as an error.
    pub(crate) fn attribute_set(&self, index: u32) -> Result<&AttributeDescription, HlsError> {
        self.attribute_sets.get(index as usize).ok_or_else(|| {
            HlsError::UnresolvedReference(format!(
                "attribute set index {} is not present in sequence parameter set {}",
                index, self.sps_seq_parameter_set_id
            ))
        })
    }

    pub fn write(&self) -> Result<PayloadBuffer, HlsError> {
        let mut buf = PayloadBuffer::new(PayloadType::SequenceParameterSet);
        let mut bs = BitWriter::new();

        bs.write_un(24, self.profile_compatibility_flags);
        bs.write_un(8, self.level.into());
        bs.write_ue(self.sps_seq_parameter_set_id);

        bs.write_flag(self.bounding_box.is_some());
        if let Some(bounding_box) = &self.bounding_box {
            let origin = to_external_order(self.geometry_axis_order, bounding_box.origin);
            bs.write_se(origin[0]);
            bs.write_se(origin[1]);
            bs.write_se(origin[2]);

            // The origin is held at full scale; no extra scaling is coded.
            let seq_bounding_box_offset_log2_scale = 0;
            bs.write_ue(seq_bounding_box_offset_log2_scale);

            let size = to_external_order(self.geometry_axis_order, bounding_box.size);
            bs.write_ue(size[0]);
            bs.write_ue(size[1]);
            bs.write_ue(size[2]);
        }

        bs.write_f(self.seq_geom_scale);
        bs.write_un(1, self.seq_geom_scale_unit_flag.into());

        bs.write_ue(self.attribute_sets.len() as u32);
        for attr in &self.attribute_sets {
            write_attribute_description(&mut bs, attr)?;
        }

        if self.log2_max_frame_idx > 31 {
            return Err(HlsError::InvalidParameter(format!(
                "log2_max_frame_idx {} exceeds the 5-bit field",
                self.log2_max_frame_idx
            )));
        }
        bs.write_un(5, self.log2_max_frame_idx.into());
        bs.write_un(3, self.geometry_axis_order.code());
        bs.write_flag(self.cabac_bypass_stream_enabled_flag);

        let sps_extension_flag = false;
        bs.write_flag(sps_extension_flag);
        bs.byte_align();

        buf.append_bits(bs);
        Ok(buf)
    }

    pub fn parse(buf: &PayloadBuffer) -> Result<Self, HlsError> {
        buf.expect(PayloadType::SequenceParameterSet)?;
        let mut bs = BitReader::new(buf.data());

        let profile_compatibility_flags = bs.read_un(24)?;
        let level = bs.read_un(8)? as u8;
        let sps_seq_parameter_set_id = bs.read_ue()?;

        let seq_bounding_box_present_flag = bs.read_flag()?;
        let mut wire_bounding_box = None;
        if seq_bounding_box_present_flag {
            let mut origin = Vec3([0i32; 3]);
            origin[0] = bs.read_se()?;
            origin[1] = bs.read_se()?;
            origin[2] = bs.read_se()?;

            let offset_log2_scale = bs.read_ue()?;
            if offset_log2_scale > 31 {
                return Err(HlsError::InvalidParameter(format!(
                    "bounding box offset scale {} exceeds 31",
                    offset_log2_scale
                )));
            }
            let origin = origin.map(|v| v << offset_log2_scale);

            let mut size = Vec3([0u32; 3]);
            size[0] = bs.read_ue()?;
            size[1] = bs.read_ue()?;
            size[2] = bs.read_ue()?;

            wire_bounding_box = Some((origin, size));
        }

        let seq_geom_scale = bs.read_f()?;
        let seq_geom_scale_unit_flag = bs.read_un(1)? != 0;

        let num_attribute_sets = bs.read_ue()?;
        let mut attribute_sets = Vec::new();
        for _ in 0..num_attribute_sets {
            attribute_sets.push(parse_attribute_description(&mut bs)?);
        }

        let log2_max_frame_idx = bs.read_un(5)? as u8;
        let geometry_axis_order = AxisOrder::from_code(bs.read_un(3)?)?;
        let cabac_bypass_stream_enabled_flag = bs.read_flag()?;

        let sps_extension_flag = bs.read_flag()?;
        if sps_extension_flag {
            return Err(HlsError::UnsupportedExtension(
                "sps_extension_flag is set but no extension data is defined".into(),
            ));
        }
        bs.byte_align();

        // The box was coded in the signalled order; the axis order field only
        // becomes known here, so the permutation is applied on the way out.
        let bounding_box = wire_bounding_box.map(|(origin, size)| SequenceBoundingBox {
            origin: to_internal_order(geometry_axis_order, origin),
            size: to_internal_order(geometry_axis_order, size),
        });

        Ok(Self {
            profile_compatibility_flags,
            level,
            sps_seq_parameter_set_id,
            bounding_box,
            seq_geom_scale,
            seq_geom_scale_unit_flag,
            attribute_sets,
            log2_max_frame_idx,
            geometry_axis_order,
            cabac_bypass_stream_enabled_flag,
        })
    }
}
