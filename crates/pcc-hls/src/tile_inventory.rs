//! Tile inventory codec.
//!
//! The per-tile table is coded at a single fixed field width sized to the
//! largest origin magnitude or size value present, so individual entries can
//! be skipped without variable-length decoding. The sequence-wide origin
//! trails the table for the same reason.

use crate::axis_order::{to_external_order, to_internal_order};
use crate::bit_reader::BitReader;
use crate::bit_writer::{BitWrite, BitWriter};
use crate::payload::{PayloadBuffer, PayloadType};
use crate::sequence_parameter_set::SequenceParameterSet;
use crate::status::HlsError;
use crate::vec3::Vec3;

/// Sequence-level tile partitioning table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TileInventory {
    pub ti_seq_parameter_set_id: u32,
    /// When unset, tile ids are implicit sequential indices.
    pub tile_id_present_flag: bool,
    pub tiles: Vec<TileEntry>,
    /// Sequence-wide origin offset, internal axis order.
    pub origin: Vec3<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileEntry {
    pub tile_id: u32,
    /// Tile origin, internal axis order.
    pub origin: Vec3<i32>,
    /// Tile size, internal axis order.
    pub size: Vec3<u32>,
}

impl TileInventory {
    /// Minimal field width able to represent every tile origin magnitude and
    /// size in the inventory, at least 1 bit.
    pub fn tile_bounding_box_bits(&self) -> u32 {
        let mut max_value: u32 = 1;
        for entry in &self.tiles {
            for k in 0..3 {
                max_value = max_value.max(entry.origin[k].unsigned_abs());
                max_value = max_value.max(entry.size[k]);
            }
        }
        32 - max_value.leading_zeros()
    }

    pub fn write(&self, sps: &SequenceParameterSet) -> Result<PayloadBuffer, HlsError> {
        let mut buf = PayloadBuffer::new(PayloadType::TileInventory);
        let mut bs = BitWriter::new();

        if self.ti_seq_parameter_set_id > 127 {
            return Err(HlsError::InvalidParameter(format!(
                "sequence parameter set id {} exceeds the 7-bit field",
                self.ti_seq_parameter_set_id
            )));
        }
        bs.write_un(7, self.ti_seq_parameter_set_id);
        bs.write_flag(self.tile_id_present_flag);

        let num_tiles = u16::try_from(self.tiles.len()).map_err(|_| {
            HlsError::InvalidParameter(format!(
                "{} tiles exceed the 16-bit count field",
                self.tiles.len()
            ))
        })?;
        bs.write_un(16, num_tiles.into());

        let tile_bounding_box_bits = self.tile_bounding_box_bits();
        bs.write_un(8, tile_bounding_box_bits);

        for entry in &self.tiles {
            if self.tile_id_present_flag {
                bs.write_ue(entry.tile_id);
            }

            let origin = to_external_order(sps.geometry_axis_order, entry.origin);
            bs.write_sn(tile_bounding_box_bits, origin[0]);
            bs.write_sn(tile_bounding_box_bits, origin[1]);
            bs.write_sn(tile_bounding_box_bits, origin[2]);

            let size = to_external_order(sps.geometry_axis_order, entry.size);
            bs.write_un(tile_bounding_box_bits, size[0]);
            bs.write_un(tile_bounding_box_bits, size[1]);
            bs.write_un(tile_bounding_box_bits, size[2]);
        }

        // Trailing the fixed-width table keeps the per-tile records skippable.
        let origin = to_external_order(sps.geometry_axis_order, self.origin);
        bs.write_se(origin[0]);
        bs.write_se(origin[1]);
        bs.write_se(origin[2]);

        let ti_origin_log2_scale = 0;
        bs.write_ue(ti_origin_log2_scale);

        bs.byte_align();
        buf.append_bits(bs);
        Ok(buf)
    }

    pub fn parse(buf: &PayloadBuffer, sps: &SequenceParameterSet) -> Result<Self, HlsError> {
        buf.expect(PayloadType::TileInventory)?;
        let mut bs = BitReader::new(buf.data());

        let ti_seq_parameter_set_id = bs.read_un(7)?;
        let tile_id_present_flag = bs.read_flag()?;

        let num_tiles = bs.read_un(16)? as usize;
        let tile_bounding_box_bits = bs.read_un(8)?;
        if tile_bounding_box_bits > 32 {
            return Err(HlsError::MalformedLength(format!(
                "tile field width {} exceeds 32 bits",
                tile_bounding_box_bits
            )));
        }

        let mut tiles = Vec::with_capacity(num_tiles);
        for index in 0..num_tiles {
            let tile_id = if tile_id_present_flag {
                bs.read_ue()?
            } else {
                index as u32
            };

            let mut origin = Vec3([0i32; 3]);
            origin[0] = bs.read_sn(tile_bounding_box_bits)?;
            origin[1] = bs.read_sn(tile_bounding_box_bits)?;
            origin[2] = bs.read_sn(tile_bounding_box_bits)?;

            let mut size = Vec3([0u32; 3]);
            size[0] = bs.read_un(tile_bounding_box_bits)?;
            size[1] = bs.read_un(tile_bounding_box_bits)?;
            size[2] = bs.read_un(tile_bounding_box_bits)?;

            tiles.push(TileEntry {
                tile_id,
                origin: to_internal_order(sps.geometry_axis_order, origin),
                size: to_internal_order(sps.geometry_axis_order, size),
            });
        }

        let mut origin = Vec3([0i32; 3]);
        origin[0] = bs.read_se()?;
        origin[1] = bs.read_se()?;
        origin[2] = bs.read_se()?;

        let ti_origin_log2_scale = bs.read_ue()?;
        if ti_origin_log2_scale > 31 {
            return Err(HlsError::InvalidParameter(format!(
                "origin scale {} exceeds 31",
                ti_origin_log2_scale
            )));
        }
        let origin = origin.map(|v| v << ti_origin_log2_scale);

        bs.byte_align();

        Ok(Self {
            ti_seq_parameter_set_id,
            tile_id_present_flag,
            tiles,
            origin: to_internal_order(sps.geometry_axis_order, origin),
        })
    }
}
