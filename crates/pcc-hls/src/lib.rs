//! Point-cloud compression high-level syntax (HLS) codec.
//!
//! Serializes and parses the parameter sets and per-slice headers that
//! precede and govern the geometry/attribute payloads of a point-cloud
//! bitstream: a byte-exact, self-describing format built from
//! variable-length integer codes, flag-gated optional fields, type-length-
//! value extension blocks and an axis permutation decoupling the signalled
//! coordinate order from the codec's internal canonical order.
//!
//! The compression algorithms themselves consume the parsed structures but
//! live outside this crate.

// =============================================================================
// Primitives
// =============================================================================

pub mod axis_order;
pub mod bit_reader;
pub mod bit_writer;
pub mod oid;
pub mod payload;
pub mod status;
pub mod vec3;

// =============================================================================
// Parameter sets
// =============================================================================

pub mod attribute;
pub mod attribute_parameter_set;
pub mod geometry_parameter_set;
pub mod sequence_parameter_set;

// =============================================================================
// Slice-level structures
// =============================================================================

pub mod attribute_brick;
pub mod constant_attribute;
pub mod geometry_brick;
pub mod tile_inventory;

// =============================================================================
// Re-exports
// =============================================================================

pub use attribute::{AttributeDescription, AttributeLabel, AttributeParameter};
pub use attribute_brick::{
    AttributeBrickHeader, AttributeBrickIds, AttributeQpRegion, LayerQpDelta,
};
pub use attribute_parameter_set::{
    AttributeEncoding, AttributeParameterSet, LiftingConfig, LiftingScheme, LodConfig,
    LodSampling, PredictingConfig, RahtConfig, RahtPredictionThresholds,
};
pub use axis_order::{to_external_order, to_internal_order, AxisOrder};
pub use bit_reader::BitReader;
pub use bit_writer::{BitCounter, BitWrite, BitWriter};
pub use constant_attribute::ConstantAttributeDataUnit;
pub use geometry_brick::{GeometryBrickFooter, GeometryBrickHeader, GeometryBrickIds};
pub use geometry_parameter_set::{
    AngularModeConfig, GeometryParameterSet, GeometryScalingConfig, GeometryTreeConfig,
    LaserCalibration, OctreeConfig, PlanarModeConfig,
};
pub use oid::ObjectIdentifier;
pub use payload::{PayloadBuffer, PayloadType};
pub use sequence_parameter_set::{SequenceBoundingBox, SequenceParameterSet};
pub use status::{HlsError, Status};
pub use tile_inventory::{TileEntry, TileInventory};
pub use vec3::Vec3;
