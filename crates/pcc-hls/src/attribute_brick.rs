//! Attribute slice (brick) header codec.

use crate::attribute_parameter_set::AttributeParameterSet;
use crate::axis_order::{to_external_order, to_internal_order};
use crate::bit_reader::BitReader;
use crate::bit_writer::{BitWrite, BitWriter};
use crate::payload::{PayloadBuffer, PayloadType};
use crate::sequence_parameter_set::SequenceParameterSet;
use crate::status::HlsError;
use crate::vec3::Vec3;

/// Per-slice attribute header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeBrickHeader {
    pub attr_attr_parameter_set_id: u32,
    pub attr_sps_attr_idx: u32,
    pub attr_geom_slice_id: u32,
    /// Slice QP deltas; coded only when the APS enables them.
    pub attr_qp_delta_luma: i32,
    pub attr_qp_delta_chroma: i32,
    /// Per-layer QP deltas. Presence on the wire is derived from the table
    /// being non-empty.
    pub attr_layer_qp_deltas: Vec<LayerQpDelta>,
    /// Bounding-box sub-regions with their own QP offset. The format leaves
    /// room for several; this version codes at most one.
    pub qp_regions: Vec<AttributeQpRegion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerQpDelta {
    pub luma: i32,
    pub chroma: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeQpRegion {
    /// Region origin, internal axis order.
    pub origin: Vec3<u32>,
    /// Region size, internal axis order; every component is at least 1.
    pub size: Vec3<u32>,
    /// Luma offset, and a chroma offset used when the attribute has more
    /// than one dimension.
    pub qp_offset: [i32; 2],
}

/// The identifying prefix of an attribute brick header, readable without the
/// governing parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeBrickIds {
    pub attr_attr_parameter_set_id: u32,
    pub attr_sps_attr_idx: u32,
    pub attr_geom_slice_id: u32,
}

impl AttributeBrickHeader {
    pub fn write(
        &self,
        sps: &SequenceParameterSet,
        aps: &AttributeParameterSet,
    ) -> Result<PayloadBuffer, HlsError> {
        let mut buf = PayloadBuffer::new(PayloadType::AttributeBrick);
        let mut bs = BitWriter::new();

        bs.write_ue(self.attr_attr_parameter_set_id);
        bs.write_ue(self.attr_sps_attr_idx);
        bs.write_ue(self.attr_geom_slice_id);

        if aps.aps_slice_qp_deltas_present_flag {
            bs.write_se(self.attr_qp_delta_luma);
            bs.write_se(self.attr_qp_delta_chroma);
        }

        let attr_layer_qp_present_flag = !self.attr_layer_qp_deltas.is_empty();
        bs.write_flag(attr_layer_qp_present_flag);
        if attr_layer_qp_present_flag {
            bs.write_ue((self.attr_layer_qp_deltas.len() - 1) as u32);
            for delta in &self.attr_layer_qp_deltas {
                bs.write_se(delta.luma);
                bs.write_se(delta.chroma);
            }
        }

        if self.qp_regions.len() > 1 {
            return Err(HlsError::InvalidParameter(format!(
                "{} QP regions; this version codes at most one",
                self.qp_regions.len()
            )));
        }
        bs.write_ue(self.qp_regions.len() as u32);
        for region in &self.qp_regions {
            let attr = sps.attribute_set(self.attr_sps_attr_idx)?;

            let origin = to_external_order(sps.geometry_axis_order, region.origin);
            let mut size_minus1 = Vec3([0u32; 3]);
            for k in 0..3 {
                size_minus1[k] = region.size[k].checked_sub(1).ok_or_else(|| {
                    HlsError::InvalidParameter(
                        "every QP region size component must be at least 1".into(),
                    )
                })?;
            }
            let size_minus1 = to_external_order(sps.geometry_axis_order, size_minus1);

            bs.write_ue(origin[0]);
            bs.write_ue(origin[1]);
            bs.write_ue(origin[2]);
            bs.write_ue(size_minus1[0]);
            bs.write_ue(size_minus1[1]);
            bs.write_ue(size_minus1[2]);
            bs.write_se(region.qp_offset[0]);
            if attr.num_dimensions_minus1 > 0 {
                bs.write_se(region.qp_offset[1]);
            }
        }
        bs.byte_align();

        buf.append_bits(bs);
        Ok(buf)
    }

    pub fn parse(
        buf: &PayloadBuffer,
        sps: &SequenceParameterSet,
        aps: &AttributeParameterSet,
    ) -> Result<Self, HlsError> {
        Self::parse_with_size(buf, sps, aps).map(|(abh, _)| abh)
    }

    /// Parses the header and also returns its encoded size in bytes, locating
    /// the start of the entropy-coded body.
    pub fn parse_with_size(
        buf: &PayloadBuffer,
        sps: &SequenceParameterSet,
        aps: &AttributeParameterSet,
    ) -> Result<(Self, usize), HlsError> {
        buf.expect(PayloadType::AttributeBrick)?;
        let mut bs = BitReader::new(buf.data());

        let mut abh = Self {
            attr_attr_parameter_set_id: bs.read_ue()?,
            attr_sps_attr_idx: bs.read_ue()?,
            attr_geom_slice_id: bs.read_ue()?,
            ..Self::default()
        };

        if aps.aps_slice_qp_deltas_present_flag {
            abh.attr_qp_delta_luma = bs.read_se()?;
            abh.attr_qp_delta_chroma = bs.read_se()?;
        }

        let attr_layer_qp_present_flag = bs.read_flag()?;
        if attr_layer_qp_present_flag {
            let num_layers_minus1 = bs.read_ue()? as usize;
            abh.attr_layer_qp_deltas.reserve(num_layers_minus1.min(1024) + 1);
            for _ in 0..=num_layers_minus1 {
                abh.attr_layer_qp_deltas.push(LayerQpDelta {
                    luma: bs.read_se()?,
                    chroma: bs.read_se()?,
                });
            }
        }

        let attr_num_regions = bs.read_ue()?;
        if attr_num_regions > 1 {
            return Err(HlsError::InvalidParameter(format!(
                "{} QP regions; this version codes at most one",
                attr_num_regions
            )));
        }
        for _ in 0..attr_num_regions {
            let attr = sps.attribute_set(abh.attr_sps_attr_idx)?;

            let mut origin = Vec3([0u32; 3]);
            origin[0] = bs.read_ue()?;
            origin[1] = bs.read_ue()?;
            origin[2] = bs.read_ue()?;

            let mut size_minus1 = Vec3([0u32; 3]);
            for k in 0..3 {
                size_minus1[k] = bs.read_ue()?;
                if size_minus1[k] == u32::MAX {
                    return Err(HlsError::MalformedLength(
                        "QP region size does not fit a 32-bit field".into(),
                    ));
                }
            }

            let mut qp_offset = [0i32; 2];
            qp_offset[0] = bs.read_se()?;
            if attr.num_dimensions_minus1 > 0 {
                qp_offset[1] = bs.read_se()?;
            }

            abh.qp_regions.push(AttributeQpRegion {
                origin: to_internal_order(sps.geometry_axis_order, origin),
                size: to_internal_order(sps.geometry_axis_order, size_minus1).map(|v| v + 1),
                qp_offset,
            });
        }

        bs.byte_align();
        Ok((abh, bs.byte_position()))
    }

    /// Reads only the identifying fields, for routing a payload to its slice
    /// and parameter-set context before a full parse is possible.
    pub fn parse_ids(buf: &PayloadBuffer) -> Result<AttributeBrickIds, HlsError> {
        buf.expect(PayloadType::AttributeBrick)?;
        let mut bs = BitReader::new(buf.data());

        Ok(AttributeBrickIds {
            attr_attr_parameter_set_id: bs.read_ue()?,
            attr_sps_attr_idx: bs.read_ue()?,
            attr_geom_slice_id: bs.read_ue()?,
        })
    }
}
