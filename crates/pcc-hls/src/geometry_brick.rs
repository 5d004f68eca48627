//! Geometry slice (brick) header and footer codecs.

use byteorder::{BigEndian, ByteOrder};

use crate::axis_order::{to_external_order, to_internal_order};
use crate::bit_reader::BitReader;
use crate::bit_writer::{BitWrite, BitWriter};
use crate::geometry_parameter_set::{GeometryParameterSet, GeometryTreeConfig};
use crate::payload::{PayloadBuffer, PayloadType};
use crate::sequence_parameter_set::SequenceParameterSet;
use crate::status::{HlsError, Status};
use crate::vec3::Vec3;

/// Per-slice geometry header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryBrickHeader {
    pub geom_geom_parameter_set_id: u32,
    pub geom_tile_id: u32,
    pub geom_slice_id: u32,
    pub frame_idx: u32,
    /// Per-slice box scale; meaningful when the GPS signals per-slice scales.
    pub geom_box_log2_scale: u32,
    /// Slice origin, internal axis order, at full scale.
    pub geom_box_origin: Vec3<u32>,
    /// One 3-bit coded-axis mask per octree level. With qtbt disabled every
    /// level codes all three axes and the masks are not transmitted.
    pub tree_lvl_coded_axis_list: Vec<u8>,
    /// Width of each explicitly coded substream length field.
    pub geom_stream_len_bits: u8,
    /// Lengths of every substream but the last, whose length is implied.
    pub geom_stream_len: Vec<u32>,
    pub geom_slice_qp_offset: i32,
    pub geom_octree_qp_offset_depth: u32,
    pub trisoup_sampling_value_minus1: u32,
    pub num_unique_segments_minus1: u32,
}

/// The identifying prefix of a geometry brick header, readable without the
/// governing parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryBrickIds {
    pub geom_geom_parameter_set_id: u32,
    pub geom_tile_id: u32,
    pub geom_slice_id: u32,
}

impl GeometryBrickHeader {
    /// Effective box scale for this slice.
    pub fn effective_box_log2_scale(&self, gps: &GeometryParameterSet) -> u32 {
        if gps.geom_box_log2_scale_present_flag {
            self.geom_box_log2_scale
        } else {
            gps.gps_geom_box_log2_scale
        }
    }

    /// Serializes the header into a fresh geometry-brick payload. The caller
    /// appends the entropy-coded body and finally the footer.
    pub fn write(
        &self,
        sps: &SequenceParameterSet,
        gps: &GeometryParameterSet,
    ) -> Result<PayloadBuffer, HlsError> {
        let mut buf = PayloadBuffer::new(PayloadType::GeometryBrick);
        let mut bs = BitWriter::new();

        bs.write_ue(self.geom_geom_parameter_set_id);
        bs.write_ue(self.geom_tile_id);
        bs.write_ue(self.geom_slice_id);
        bs.write_un(sps.log2_max_frame_idx.into(), self.frame_idx);

        let scale = self.effective_box_log2_scale(gps);
        if scale > 31 {
            return Err(HlsError::InvalidParameter(format!(
                "geometry box scale {} exceeds 31",
                scale
            )));
        }
        let origin =
            to_external_order(sps.geometry_axis_order, self.geom_box_origin).map(|v| v >> scale);

        if gps.geom_box_log2_scale_present_flag {
            bs.write_ue(self.geom_box_log2_scale);
        }
        bs.write_ue(origin[0]);
        bs.write_ue(origin[1]);
        bs.write_ue(origin[2]);

        if let GeometryTreeConfig::Octree(octree) = &gps.tree {
            if self.tree_lvl_coded_axis_list.is_empty() {
                return Err(HlsError::InvalidParameter(
                    "an octree slice codes at least one tree level".into(),
                ));
            }
            bs.write_ue((self.tree_lvl_coded_axis_list.len() - 1) as u32);
            if octree.qtbt_enabled_flag {
                for &axes in &self.tree_lvl_coded_axis_list {
                    bs.write_un(3, axes.into());
                }
            }

            bs.write_ue(self.geom_stream_len.len() as u32);
            if !self.geom_stream_len.is_empty() {
                bs.write_un(6, self.geom_stream_len_bits.into());
                // The last substream's length is implied by the payload size.
                for &len in &self.geom_stream_len {
                    bs.write_un(self.geom_stream_len_bits.into(), len);
                }
            }

            if octree.scaling.is_some() {
                bs.write_se(self.geom_slice_qp_offset);
                bs.write_ue(self.geom_octree_qp_offset_depth);
            }

            if octree.trisoup_node_size_log2 > 0 {
                bs.write_ue(self.trisoup_sampling_value_minus1);
                bs.write_ue(self.num_unique_segments_minus1);
            }
        }

        bs.byte_align();
        buf.append_bits(bs);
        Ok(buf)
    }

    pub fn parse(
        buf: &PayloadBuffer,
        sps: &SequenceParameterSet,
        gps: &GeometryParameterSet,
    ) -> Result<Self, HlsError> {
        Self::parse_with_size(buf, sps, gps).map(|(gbh, _)| gbh)
    }

    /// Parses the header and also returns its encoded size in bytes, locating
    /// the start of the entropy-coded body.
    pub fn parse_with_size(
        buf: &PayloadBuffer,
        sps: &SequenceParameterSet,
        gps: &GeometryParameterSet,
    ) -> Result<(Self, usize), HlsError> {
        buf.expect(PayloadType::GeometryBrick)?;
        let mut bs = BitReader::new(buf.data());

        let mut gbh = Self {
            geom_geom_parameter_set_id: bs.read_ue()?,
            geom_tile_id: bs.read_ue()?,
            geom_slice_id: bs.read_ue()?,
            frame_idx: bs.read_un(sps.log2_max_frame_idx.into())?,
            ..Self::default()
        };

        if gps.geom_box_log2_scale_present_flag {
            gbh.geom_box_log2_scale = bs.read_ue()?;
        }
        let scale = gbh.effective_box_log2_scale(gps);
        if scale > 31 {
            return Err(HlsError::InvalidParameter(format!(
                "geometry box scale {} exceeds 31",
                scale
            )));
        }

        let mut origin = Vec3([0u32; 3]);
        origin[0] = bs.read_ue()?;
        origin[1] = bs.read_ue()?;
        origin[2] = bs.read_ue()?;
        gbh.geom_box_origin =
            to_internal_order(sps.geometry_axis_order, origin).map(|v| v << scale);

        if let GeometryTreeConfig::Octree(octree) = &gps.tree {
            let tree_depth_minus1 = bs.read_ue()? as usize;
            gbh.tree_lvl_coded_axis_list.reserve(tree_depth_minus1.min(1024) + 1);
            for _ in 0..=tree_depth_minus1 {
                let axes = if octree.qtbt_enabled_flag {
                    bs.read_un(3)? as u8
                } else {
                    7
                };
                gbh.tree_lvl_coded_axis_list.push(axes);
            }

            let geom_stream_cnt_minus1 = bs.read_ue()? as usize;
            if geom_stream_cnt_minus1 > 0 {
                let stream_len_bits = bs.read_un(6)?;
                if stream_len_bits > 32 {
                    return Err(HlsError::MalformedLength(format!(
                        "substream length field width {} exceeds 32 bits",
                        stream_len_bits
                    )));
                }
                gbh.geom_stream_len_bits = stream_len_bits as u8;
                gbh.geom_stream_len.reserve(geom_stream_cnt_minus1.min(1024));
                for _ in 0..geom_stream_cnt_minus1 {
                    gbh.geom_stream_len.push(bs.read_un(stream_len_bits)?);
                }
            }

            if octree.scaling.is_some() {
                gbh.geom_slice_qp_offset = bs.read_se()?;
                gbh.geom_octree_qp_offset_depth = bs.read_ue()?;
            }

            if octree.trisoup_node_size_log2 > 0 {
                gbh.trisoup_sampling_value_minus1 = bs.read_ue()?;
                gbh.num_unique_segments_minus1 = bs.read_ue()?;
            }
        }

        bs.byte_align();
        Ok((gbh, bs.byte_position()))
    }

    /// Reads only the identifying fields, for routing a payload to its slice
    /// and parameter-set context before a full parse is possible.
    pub fn parse_ids(buf: &PayloadBuffer) -> Result<GeometryBrickIds, HlsError> {
        buf.expect(PayloadType::GeometryBrick)?;
        let mut bs = BitReader::new(buf.data());

        Ok(GeometryBrickIds {
            geom_geom_parameter_set_id: bs.read_ue()?,
            geom_tile_id: bs.read_ue()?,
            geom_slice_id: bs.read_ue()?,
        })
    }
}

/// Fixed-size trailer of a geometry brick payload.
///
/// The footer occupies the final [`GeometryBrickFooter::LEN`] bytes of the
/// payload so the point count can be recovered by a backward seek, without
/// parsing or even receiving the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryBrickFooter {
    pub geom_num_points_minus1: u32,
}

impl GeometryBrickFooter {
    pub const LEN: usize = 3;

    /// Appends the trailer to the end of the payload.
    pub fn write(&self, buf: &mut PayloadBuffer) -> Status {
        buf.expect(PayloadType::GeometryBrick)?;
        if self.geom_num_points_minus1 > 0x00ff_ffff {
            return Err(HlsError::InvalidParameter(format!(
                "point count {} exceeds the 24-bit footer field",
                self.geom_num_points_minus1
            )));
        }
        let mut tail = [0u8; Self::LEN];
        BigEndian::write_u24(&mut tail, self.geom_num_points_minus1);
        buf.extend_from_slice(&tail);
        Ok(())
    }

    /// Reads the trailer from the last bytes of the payload. Nothing before
    /// the trailer is touched.
    pub fn parse(buf: &PayloadBuffer) -> Result<Self, HlsError> {
        buf.expect(PayloadType::GeometryBrick)?;
        let data = buf.data();
        if data.len() < Self::LEN {
            return Err(HlsError::MalformedLength(format!(
                "geometry brick payload of {} bytes cannot hold the {}-byte footer",
                data.len(),
                Self::LEN
            )));
        }
        let tail = &data[data.len() - Self::LEN..];
        Ok(Self {
            geom_num_points_minus1: BigEndian::read_u24(tail),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_reads_fixed_tail_bytes() {
        let mut buf = PayloadBuffer::new(PayloadType::GeometryBrick);
        // Arbitrary header/body content the footer parser must never touch.
        buf.extend_from_slice(&[0x55, 0xaa, 0x12, 0x34, 0x56]);
        buf.extend_from_slice(&[0x00, 0x03, 0xe7]);

        let footer = GeometryBrickFooter::parse(&buf).unwrap();
        assert_eq!(footer.geom_num_points_minus1, 999);
    }

    #[test]
    fn test_footer_roundtrip() {
        let mut buf = PayloadBuffer::new(PayloadType::GeometryBrick);
        let footer = GeometryBrickFooter {
            geom_num_points_minus1: 0x123456,
        };
        footer.write(&mut buf).unwrap();
        assert_eq!(buf.len(), GeometryBrickFooter::LEN);
        assert_eq!(GeometryBrickFooter::parse(&buf).unwrap(), footer);
    }

    #[test]
    fn test_footer_needs_three_bytes() {
        let mut buf = PayloadBuffer::new(PayloadType::GeometryBrick);
        buf.extend_from_slice(&[0x00, 0x03]);
        assert!(matches!(
            GeometryBrickFooter::parse(&buf),
            Err(HlsError::MalformedLength(_))
        ));
    }

    #[test]
    fn test_footer_range_check() {
        let mut buf = PayloadBuffer::new(PayloadType::GeometryBrick);
        let footer = GeometryBrickFooter {
            geom_num_points_minus1: 0x0100_0000,
        };
        assert!(footer.write(&mut buf).is_err());
    }
}
