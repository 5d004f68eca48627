//! Geometry parameter set codec.

use crate::axis_order::{to_external_order, to_internal_order};
use crate::bit_reader::BitReader;
use crate::bit_writer::{BitWrite, BitWriter};
use crate::payload::{PayloadBuffer, PayloadType};
use crate::sequence_parameter_set::SequenceParameterSet;
use crate::status::HlsError;
use crate::vec3::Vec3;

/// Geometry coding configuration referenced by geometry slices.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryParameterSet {
    pub gps_geom_parameter_set_id: u32,
    pub gps_seq_parameter_set_id: u32,
    /// When set, each slice signals its own box scale in the brick header.
    pub geom_box_log2_scale_present_flag: bool,
    /// Sequence-wide box scale, used when per-slice scales are absent.
    pub gps_geom_box_log2_scale: u32,
    pub geom_unique_points_flag: bool,
    pub tree: GeometryTreeConfig,
}

/// Selects the geometry coding tree and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryTreeConfig {
    Octree(OctreeConfig),
    Predictive,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OctreeConfig {
    pub qtbt_enabled_flag: bool,
    pub neighbour_context_restriction_flag: bool,
    pub inferred_direct_coding_mode_enabled_flag: bool,
    pub bitwise_occupancy_coding_flag: bool,
    pub adjacent_child_contextualization_enabled_flag: bool,
    pub planar: Option<PlanarModeConfig>,
    pub angular: Option<AngularModeConfig>,
    pub neighbour_avail_boundary_log2: u32,
    pub intra_pred_max_node_size_log2: u32,
    /// A non-zero node size enables trisoup coding and gates the trisoup
    /// fields of the geometry brick header.
    pub trisoup_node_size_log2: u32,
    pub scaling: Option<GeometryScalingConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanarModeConfig {
    pub threshold0: u32,
    pub threshold1: u32,
    pub threshold2: u32,
    pub idcm_threshold: u32,
}

/// Angular (rotating LiDAR) coding mode with its per-laser calibration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AngularModeConfig {
    /// Origin of the angular coordinate system, internal axis order.
    pub origin: Vec3<u32>,
    /// Calibration entries ordered by non-decreasing elevation angle.
    pub lasers: Vec<LaserCalibration>,
    pub planar_buffer_disabled_flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaserCalibration {
    pub theta: i32,
    pub z_offset: i32,
    pub num_phi_per_turn: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryScalingConfig {
    pub geom_base_qp: u32,
    pub geom_idcm_qp_offset: i32,
}

impl GeometryParameterSet {
    pub fn write(&self, sps: &SequenceParameterSet) -> Result<PayloadBuffer, HlsError> {
        let mut buf = PayloadBuffer::new(PayloadType::GeometryParameterSet);
        let mut bs = BitWriter::new();

        bs.write_ue(self.gps_geom_parameter_set_id);
        bs.write_ue(self.gps_seq_parameter_set_id);
        bs.write_flag(self.geom_box_log2_scale_present_flag);
        if !self.geom_box_log2_scale_present_flag {
            bs.write_ue(self.gps_geom_box_log2_scale);
        }
        bs.write_flag(matches!(self.tree, GeometryTreeConfig::Predictive));
        bs.write_flag(self.geom_unique_points_flag);

        if let GeometryTreeConfig::Octree(octree) = &self.tree {
            bs.write_flag(octree.qtbt_enabled_flag);
            bs.write_flag(octree.neighbour_context_restriction_flag);
            bs.write_flag(octree.inferred_direct_coding_mode_enabled_flag);
            bs.write_flag(octree.bitwise_occupancy_coding_flag);
            bs.write_flag(octree.adjacent_child_contextualization_enabled_flag);

            bs.write_flag(octree.planar.is_some());
            if let Some(planar) = &octree.planar {
                bs.write_ue(planar.threshold0);
                bs.write_ue(planar.threshold1);
                bs.write_ue(planar.threshold2);
                bs.write_ue(planar.idcm_threshold);
            }

            bs.write_flag(octree.angular.is_some());
            if let Some(angular) = &octree.angular {
                let origin = to_external_order(sps.geometry_axis_order, angular.origin);
                bs.write_ue(origin[0]);
                bs.write_ue(origin[1]);
                bs.write_ue(origin[2]);
                bs.write_ue(angular.lasers.len() as u32);

                if let Some(first) = angular.lasers.first() {
                    bs.write_se(first.theta);
                    bs.write_se(first.z_offset);
                    bs.write_ue(first.num_phi_per_turn);
                }

                for pair in angular.lasers.windows(2) {
                    let (prev, laser) = (pair[0], pair[1]);
                    let theta_diff = i64::from(laser.theta) - i64::from(prev.theta);
                    if theta_diff < 0 {
                        return Err(HlsError::OrderingViolation(format!(
                            "laser theta {} follows {}; angles must be non-decreasing",
                            laser.theta, prev.theta
                        )));
                    }
                    bs.write_ue64(theta_diff as u64);

                    let z_diff = i64::from(laser.z_offset) - i64::from(prev.z_offset);
                    let z_diff = i32::try_from(z_diff).map_err(|_| {
                        HlsError::InvalidParameter(format!(
                            "laser z-offset delta {} does not fit a signed 32-bit field",
                            z_diff
                        ))
                    })?;
                    bs.write_se(z_diff);
                    bs.write_ue(laser.num_phi_per_turn);
                }
                bs.write_flag(angular.planar_buffer_disabled_flag);
            }

            bs.write_ue(octree.neighbour_avail_boundary_log2);
            bs.write_ue(octree.intra_pred_max_node_size_log2);
            bs.write_ue(octree.trisoup_node_size_log2);

            bs.write_flag(octree.scaling.is_some());
            if let Some(scaling) = &octree.scaling {
                bs.write_ue(scaling.geom_base_qp);
                bs.write_se(scaling.geom_idcm_qp_offset);
            }
        }

        let gps_extension_flag = false;
        bs.write_flag(gps_extension_flag);
        bs.byte_align();

        buf.append_bits(bs);
        Ok(buf)
    }

    pub fn parse(buf: &PayloadBuffer, sps: &SequenceParameterSet) -> Result<Self, HlsError> {
        buf.expect(PayloadType::GeometryParameterSet)?;
        let mut bs = BitReader::new(buf.data());

        let gps_geom_parameter_set_id = bs.read_ue()?;
        let gps_seq_parameter_set_id = bs.read_ue()?;
        let geom_box_log2_scale_present_flag = bs.read_flag()?;
        let mut gps_geom_box_log2_scale = 0;
        if !geom_box_log2_scale_present_flag {
            gps_geom_box_log2_scale = bs.read_ue()?;
        }
        let predgeom_enabled_flag = bs.read_flag()?;
        let geom_unique_points_flag = bs.read_flag()?;

        let tree = if predgeom_enabled_flag {
            GeometryTreeConfig::Predictive
        } else {
            let mut octree = OctreeConfig {
                qtbt_enabled_flag: bs.read_flag()?,
                neighbour_context_restriction_flag: bs.read_flag()?,
                inferred_direct_coding_mode_enabled_flag: bs.read_flag()?,
                bitwise_occupancy_coding_flag: bs.read_flag()?,
                adjacent_child_contextualization_enabled_flag: bs.read_flag()?,
                ..OctreeConfig::default()
            };

            if bs.read_flag()? {
                octree.planar = Some(PlanarModeConfig {
                    threshold0: bs.read_ue()?,
                    threshold1: bs.read_ue()?,
                    threshold2: bs.read_ue()?,
                    idcm_threshold: bs.read_ue()?,
                });
            }

            if bs.read_flag()? {
                let mut origin = Vec3([0u32; 3]);
                origin[0] = bs.read_ue()?;
                origin[1] = bs.read_ue()?;
                origin[2] = bs.read_ue()?;
                let origin = to_internal_order(sps.geometry_axis_order, origin);

                let num_lasers = bs.read_ue()? as usize;
                let mut lasers = Vec::with_capacity(num_lasers.min(1024));
                if num_lasers > 0 {
                    lasers.push(LaserCalibration {
                        theta: bs.read_se()?,
                        z_offset: bs.read_se()?,
                        num_phi_per_turn: bs.read_ue()?,
                    });
                }
                for _ in 1..num_lasers {
                    let prev = *lasers.last().expect("first laser present");
                    let theta_diff = bs.read_ue()?;
                    let z_diff = bs.read_se()?;
                    let num_phi_per_turn = bs.read_ue()?;

                    let theta = i64::from(prev.theta) + i64::from(theta_diff);
                    let theta = i32::try_from(theta).map_err(|_| {
                        HlsError::MalformedLength(format!(
                            "accumulated laser theta {} does not fit a signed 32-bit field",
                            theta
                        ))
                    })?;
                    let z_offset = i64::from(prev.z_offset) + i64::from(z_diff);
                    let z_offset = i32::try_from(z_offset).map_err(|_| {
                        HlsError::MalformedLength(format!(
                            "accumulated laser z-offset {} does not fit a signed 32-bit field",
                            z_offset
                        ))
                    })?;
                    lasers.push(LaserCalibration {
                        theta,
                        z_offset,
                        num_phi_per_turn,
                    });
                }

                octree.angular = Some(AngularModeConfig {
                    origin,
                    lasers,
                    planar_buffer_disabled_flag: bs.read_flag()?,
                });
            }

            octree.neighbour_avail_boundary_log2 = bs.read_ue()?;
            octree.intra_pred_max_node_size_log2 = bs.read_ue()?;
            octree.trisoup_node_size_log2 = bs.read_ue()?;

            if bs.read_flag()? {
                octree.scaling = Some(GeometryScalingConfig {
                    geom_base_qp: bs.read_ue()?,
                    geom_idcm_qp_offset: bs.read_se()?,
                });
            }

            GeometryTreeConfig::Octree(octree)
        };

        let gps_extension_flag = bs.read_flag()?;
        if gps_extension_flag {
            return Err(HlsError::UnsupportedExtension(
                "gps_extension_flag is set but no extension data is defined".into(),
            ));
        }
        bs.byte_align();

        Ok(Self {
            gps_geom_parameter_set_id,
            gps_seq_parameter_set_id,
            geom_box_log2_scale_present_flag,
            gps_geom_box_log2_scale,
            geom_unique_points_flag,
            tree,
        })
    }
}
