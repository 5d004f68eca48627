//! Attribute descriptions and their TLV-coded parameters.
//!
//! Each attribute parameter is serialized as a one-byte type tag, a one-byte
//! content length, the type-specific content, then byte alignment. Content
//! lengths are measured with a counting writer before the block is emitted,
//! and verified against the bytes actually consumed when parsing.

use std::fmt;

use crate::bit_reader::BitReader;
use crate::bit_writer::{BitCounter, BitWrite};
use crate::oid::ObjectIdentifier;
use crate::status::{HlsError, Status};

const ATTR_PARAM_ITU_T35: u8 = 0;
const ATTR_PARAM_OID: u8 = 1;
const ATTR_PARAM_CICP: u8 = 2;
const ATTR_PARAM_SCALING: u8 = 3;
const ATTR_PARAM_DEFAULT_VALUE: u8 = 4;

/// Semantic label of an attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeLabel {
    Colour,
    Reflectance,
    FrameIndex,
    MaterialId,
    Transparency,
    Normal,
    /// A known-label code this version does not name.
    Unknown(u32),
    /// An externally registered label.
    Oid(ObjectIdentifier),
}

impl AttributeLabel {
    pub fn is_known(&self) -> bool {
        !matches!(self, AttributeLabel::Oid(_))
    }

    pub fn from_known_code(code: u32) -> Self {
        match code {
            0 => AttributeLabel::Colour,
            1 => AttributeLabel::Reflectance,
            2 => AttributeLabel::FrameIndex,
            3 => AttributeLabel::MaterialId,
            4 => AttributeLabel::Transparency,
            5 => AttributeLabel::Normal,
            _ => AttributeLabel::Unknown(code),
        }
    }

    fn known_code(&self) -> Option<u32> {
        match self {
            AttributeLabel::Colour => Some(0),
            AttributeLabel::Reflectance => Some(1),
            AttributeLabel::FrameIndex => Some(2),
            AttributeLabel::MaterialId => Some(3),
            AttributeLabel::Transparency => Some(4),
            AttributeLabel::Normal => Some(5),
            AttributeLabel::Unknown(code) => Some(*code),
            AttributeLabel::Oid(_) => None,
        }
    }
}

impl fmt::Display for AttributeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeLabel::Colour => write!(f, "color"),
            AttributeLabel::Reflectance => write!(f, "reflectance"),
            AttributeLabel::FrameIndex => write!(f, "frame index"),
            AttributeLabel::MaterialId => write!(f, "material id"),
            AttributeLabel::Transparency => write!(f, "transparency"),
            AttributeLabel::Normal => write!(f, "normal"),
            AttributeLabel::Unknown(code) => write!(f, "{:08x}", code),
            AttributeLabel::Oid(oid) => write!(f, "{}", oid),
        }
    }
}

/// One TLV-coded attribute parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeParameter {
    /// Colour description indices from the CICP registry.
    Cicp {
        colour_primaries_idx: u32,
        transfer_characteristics_idx: u32,
        matrix_coefficients_idx: u32,
        video_full_range_flag: bool,
    },
    /// Source value scaling as log2 offset and scale.
    Scaling {
        source_attr_offset_log2: u32,
        source_attr_scale_log2: u32,
    },
    /// One default value per attribute dimension.
    DefaultValue(Vec<u32>),
    /// ITU-T T.35 registered payload.
    ItuT35 {
        country_code: u8,
        /// Present exactly when the country code is 0xff.
        country_code_extension: Option<u8>,
        payload: Vec<u8>,
    },
    /// Payload identified by an object identifier.
    Oid {
        oid: ObjectIdentifier,
        payload: Vec<u8>,
    },
    /// A parameter type this version does not recognise, kept as raw bytes so
    /// it can be carried through unmodified.
    Unknown { param_type: u8, payload: Vec<u8> },
}

impl AttributeParameter {
    fn type_code(&self) -> u8 {
        match self {
            AttributeParameter::ItuT35 { .. } => ATTR_PARAM_ITU_T35,
            AttributeParameter::Oid { .. } => ATTR_PARAM_OID,
            AttributeParameter::Cicp { .. } => ATTR_PARAM_CICP,
            AttributeParameter::Scaling { .. } => ATTR_PARAM_SCALING,
            AttributeParameter::DefaultValue(_) => ATTR_PARAM_DEFAULT_VALUE,
            AttributeParameter::Unknown { param_type, .. } => *param_type,
        }
    }

    fn write_content<W: BitWrite>(&self, bs: &mut W, attr: &AttributeDescription) -> Status {
        match self {
            AttributeParameter::Cicp {
                colour_primaries_idx,
                transfer_characteristics_idx,
                matrix_coefficients_idx,
                video_full_range_flag,
            } => {
                bs.write_ue(*colour_primaries_idx);
                bs.write_ue(*transfer_characteristics_idx);
                bs.write_ue(*matrix_coefficients_idx);
                bs.write_flag(*video_full_range_flag);
            }
            AttributeParameter::Scaling {
                source_attr_offset_log2,
                source_attr_scale_log2,
            } => {
                bs.write_ue(*source_attr_offset_log2);
                bs.write_ue(*source_attr_scale_log2);
            }
            AttributeParameter::DefaultValue(values) => {
                if values.len() != attr.num_dimensions() {
                    return Err(HlsError::InvalidParameter(format!(
                        "default value has {} components for a {}-dimensional attribute",
                        values.len(),
                        attr.num_dimensions()
                    )));
                }
                bs.write_un(attr.bitdepth, values[0]);
                for &value in &values[1..] {
                    bs.write_un(attr.bitdepth_secondary, value);
                }
            }
            AttributeParameter::ItuT35 {
                country_code,
                country_code_extension,
                payload,
            } => {
                bs.write_un(8, (*country_code).into());
                if *country_code == 0xff {
                    let extension = country_code_extension.ok_or_else(|| {
                        HlsError::InvalidParameter(
                            "country code 0xff requires an extension code".into(),
                        )
                    })?;
                    bs.write_un(8, extension.into());
                } else if country_code_extension.is_some() {
                    return Err(HlsError::InvalidParameter(
                        "an extension code is only valid with country code 0xff".into(),
                    ));
                }
                for &byte in payload {
                    bs.write_un(8, byte.into());
                }
            }
            AttributeParameter::Oid { oid, payload } => {
                oid.write_into(bs)?;
                for &byte in payload {
                    bs.write_un(8, byte.into());
                }
            }
            AttributeParameter::Unknown { payload, .. } => {
                for &byte in payload {
                    bs.write_un(8, byte.into());
                }
            }
        }
        bs.byte_align();
        Ok(())
    }
}

/// One entry of the sequence parameter set's attribute list.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescription {
    pub num_dimensions_minus1: u32,
    pub instance_id: u32,
    /// Bit depth of the first dimension.
    pub bitdepth: u32,
    /// Bit depth of the remaining dimensions; coded only when the attribute
    /// has more than one dimension.
    pub bitdepth_secondary: u32,
    pub label: AttributeLabel,
    pub params: Vec<AttributeParameter>,
}

impl AttributeDescription {
    pub fn num_dimensions(&self) -> usize {
        self.num_dimensions_minus1 as usize + 1
    }
}

pub(crate) fn write_attribute_description<W: BitWrite>(
    bs: &mut W,
    attr: &AttributeDescription,
) -> Status {
    bs.write_ue(attr.num_dimensions_minus1);
    bs.write_ue(attr.instance_id);

    if attr.bitdepth < 1 || attr.bitdepth > 32 {
        return Err(HlsError::InvalidParameter(format!(
            "attribute bitdepth {} is outside 1..=32",
            attr.bitdepth
        )));
    }
    bs.write_ue(attr.bitdepth - 1);

    if attr.num_dimensions_minus1 > 0 {
        if attr.bitdepth_secondary < 1 || attr.bitdepth_secondary > 32 {
            return Err(HlsError::InvalidParameter(format!(
                "secondary attribute bitdepth {} is outside 1..=32",
                attr.bitdepth_secondary
            )));
        }
        bs.write_ue(attr.bitdepth_secondary - 1);
    }

    match &attr.label {
        AttributeLabel::Oid(oid) => {
            bs.write_flag(false);
            oid.write_into(bs)?;
        }
        label => {
            bs.write_flag(true);
            // is_known() guarantees a code for every non-OID label
            bs.write_ue(label.known_code().expect("known label"));
        }
    }

    if attr.params.len() > 31 {
        return Err(HlsError::InvalidParameter(format!(
            "{} attribute parameters exceed the 5-bit count field",
            attr.params.len()
        )));
    }
    bs.write_un(5, attr.params.len() as u32);
    bs.byte_align();

    for param in &attr.params {
        // Dry-run the content encoder to learn the byte length prefix.
        let mut counter = BitCounter::new();
        param.write_content(&mut counter, attr)?;
        let content_len = counter.bytes_written();
        if content_len > 0xff {
            return Err(HlsError::MalformedLength(format!(
                "attribute parameter content of {} bytes exceeds the 8-bit length field",
                content_len
            )));
        }
        bs.write_un(8, param.type_code().into());
        bs.write_un(8, content_len as u32);
        param.write_content(bs, attr)?;
    }
    Ok(())
}

pub(crate) fn parse_attribute_description(
    bs: &mut BitReader<'_>,
) -> Result<AttributeDescription, HlsError> {
    let num_dimensions_minus1 = bs.read_ue()?;
    let instance_id = bs.read_ue()?;

    let bitdepth_minus1 = bs.read_ue()?;
    if bitdepth_minus1 > 31 {
        return Err(HlsError::InvalidParameter(format!(
            "attribute bitdepth {} exceeds 32",
            bitdepth_minus1 + 1
        )));
    }
    let bitdepth = bitdepth_minus1 + 1;

    let mut bitdepth_secondary = 0;
    if num_dimensions_minus1 > 0 {
        let secondary_minus1 = bs.read_ue()?;
        if secondary_minus1 > 31 {
            return Err(HlsError::InvalidParameter(format!(
                "secondary attribute bitdepth {} exceeds 32",
                secondary_minus1 + 1
            )));
        }
        bitdepth_secondary = secondary_minus1 + 1;
    }

    let label = if bs.read_flag()? {
        AttributeLabel::from_known_code(bs.read_ue()?)
    } else {
        AttributeLabel::Oid(ObjectIdentifier::read_from(bs)?)
    };

    let num_params = bs.read_un(5)?;
    bs.byte_align();

    let mut attr = AttributeDescription {
        num_dimensions_minus1,
        instance_id,
        bitdepth,
        bitdepth_secondary,
        label,
        params: Vec::new(),
    };

    for _ in 0..num_params {
        let param_type = bs.read_un(8)? as u8;
        let declared_len = bs.read_un(8)? as usize;
        if bs.remaining_bytes() < declared_len {
            return Err(HlsError::MalformedLength(format!(
                "attribute parameter declares {} content bytes; {} remain",
                declared_len,
                bs.remaining_bytes()
            )));
        }
        let start = bs.byte_position();
        let param = parse_attribute_parameter(bs, param_type, declared_len, &attr)?;
        let consumed = bs.byte_position() - start;
        if consumed != declared_len {
            return Err(HlsError::MalformedLength(format!(
                "attribute parameter of type {} declared {} content bytes but {} were consumed",
                param_type, declared_len, consumed
            )));
        }
        attr.params.push(param);
    }

    Ok(attr)
}

fn parse_attribute_parameter(
    bs: &mut BitReader<'_>,
    param_type: u8,
    declared_len: usize,
    attr: &AttributeDescription,
) -> Result<AttributeParameter, HlsError> {
    match param_type {
        ATTR_PARAM_CICP => {
            let colour_primaries_idx = bs.read_ue()?;
            let transfer_characteristics_idx = bs.read_ue()?;
            let matrix_coefficients_idx = bs.read_ue()?;
            let video_full_range_flag = bs.read_flag()?;
            bs.byte_align();
            Ok(AttributeParameter::Cicp {
                colour_primaries_idx,
                transfer_characteristics_idx,
                matrix_coefficients_idx,
                video_full_range_flag,
            })
        }
        ATTR_PARAM_SCALING => {
            let source_attr_offset_log2 = bs.read_ue()?;
            let source_attr_scale_log2 = bs.read_ue()?;
            bs.byte_align();
            Ok(AttributeParameter::Scaling {
                source_attr_offset_log2,
                source_attr_scale_log2,
            })
        }
        ATTR_PARAM_DEFAULT_VALUE => {
            let mut values = vec![0u32; attr.num_dimensions()];
            values[0] = bs.read_un(attr.bitdepth)?;
            for value in values.iter_mut().skip(1) {
                *value = bs.read_un(attr.bitdepth_secondary)?;
            }
            bs.byte_align();
            Ok(AttributeParameter::DefaultValue(values))
        }
        ATTR_PARAM_ITU_T35 => {
            let mut remaining = declared_len;
            if remaining == 0 {
                return Err(HlsError::MalformedLength(
                    "an ITU-T T.35 parameter needs at least a country code".into(),
                ));
            }
            let country_code = bs.read_un(8)? as u8;
            remaining -= 1;
            let country_code_extension = if country_code == 0xff {
                if remaining == 0 {
                    return Err(HlsError::MalformedLength(
                        "country code 0xff needs an extension code".into(),
                    ));
                }
                remaining -= 1;
                Some(bs.read_un(8)? as u8)
            } else {
                None
            };
            Ok(AttributeParameter::ItuT35 {
                country_code,
                country_code_extension,
                payload: read_bytes(bs, remaining)?,
            })
        }
        ATTR_PARAM_OID => {
            let start = bs.byte_position();
            let oid = ObjectIdentifier::read_from(bs)?;
            let consumed = bs.byte_position() - start;
            let remaining = declared_len.checked_sub(consumed).ok_or_else(|| {
                HlsError::MalformedLength(format!(
                    "object identifier of {} bytes exceeds the declared parameter length {}",
                    consumed, declared_len
                ))
            })?;
            Ok(AttributeParameter::Oid {
                oid,
                payload: read_bytes(bs, remaining)?,
            })
        }
        _ => Ok(AttributeParameter::Unknown {
            param_type,
            payload: read_bytes(bs, declared_len)?,
        }),
    }
}

fn read_bytes(bs: &mut BitReader<'_>, len: usize) -> Result<Vec<u8>, HlsError> {
    let mut bytes = Vec::with_capacity(len);
    for _ in 0..len {
        bytes.push(bs.read_un(8)? as u8);
    }
    Ok(bytes)
}
