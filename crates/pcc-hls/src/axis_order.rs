//! Mapping between the signalled axis order and the internal canonical order.
//!
//! Coordinate fields are coded on the wire in an externally signalled axis
//! order, while every decoded structure holds them in the codec's fixed
//! internal order. The permutation is applied exactly once per direction, at
//! the serialization boundary of each 3D field.

use crate::status::HlsError;
use crate::vec3::Vec3;

/// Externally signalled storage order of the three coordinate axes.
///
/// The 3-bit code selects one of the six axis permutations; codes 6 and 7
/// are reserved and rejected on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisOrder {
    #[default]
    Xyz = 0,
    Xzy = 1,
    Yxz = 2,
    Yzx = 3,
    Zxy = 4,
    Zyx = 5,
}

impl AxisOrder {
    /// Decodes a 3-bit axis order code.
    pub fn from_code(code: u32) -> Result<Self, HlsError> {
        match code {
            0 => Ok(AxisOrder::Xyz),
            1 => Ok(AxisOrder::Xzy),
            2 => Ok(AxisOrder::Yxz),
            3 => Ok(AxisOrder::Yzx),
            4 => Ok(AxisOrder::Zxy),
            5 => Ok(AxisOrder::Zyx),
            _ => Err(HlsError::InvalidParameter(format!(
                "axis order code {} is reserved",
                code
            ))),
        }
    }

    /// Returns the 3-bit code for this axis order.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// For each external axis, the internal axis it is read from.
    fn permutation(self) -> [usize; 3] {
        match self {
            AxisOrder::Xyz => [0, 1, 2],
            AxisOrder::Xzy => [0, 2, 1],
            AxisOrder::Yxz => [1, 0, 2],
            AxisOrder::Yzx => [1, 2, 0],
            AxisOrder::Zxy => [2, 0, 1],
            AxisOrder::Zyx => [2, 1, 0],
        }
    }
}

/// Permutes a vector from internal order to the signalled external order.
pub fn to_external_order<T: Copy>(order: AxisOrder, v: Vec3<T>) -> Vec3<T> {
    let p = order.permutation();
    Vec3([v.0[p[0]], v.0[p[1]], v.0[p[2]]])
}

/// Permutes a vector from the signalled external order back to internal order.
pub fn to_internal_order<T: Copy>(order: AxisOrder, v: Vec3<T>) -> Vec3<T> {
    let p = order.permutation();
    let mut out = v.0;
    for (external, &internal) in p.iter().enumerate() {
        out[internal] = v.0[external];
    }
    Vec3(out)
}
