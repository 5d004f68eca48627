//! Attribute parameter set codec.

use crate::axis_order::{to_external_order, to_internal_order};
use crate::bit_reader::BitReader;
use crate::bit_writer::{BitWrite, BitWriter};
use crate::payload::{PayloadBuffer, PayloadType};
use crate::sequence_parameter_set::SequenceParameterSet;
use crate::status::{HlsError, Status};
use crate::vec3::Vec3;

/// Attribute coding configuration referenced by attribute slices.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeParameterSet {
    pub aps_attr_parameter_set_id: u32,
    pub aps_seq_parameter_set_id: u32,
    pub init_qp_minus4: u32,
    pub aps_chroma_qp_offset: i32,
    pub aps_slice_qp_deltas_present_flag: bool,
    pub attr_encoding: AttributeEncoding,
}

/// The transform used to code attribute values, with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeEncoding {
    Predicting(PredictingConfig),
    Raht(RahtConfig),
    Lifting(LiftingConfig),
}

impl AttributeEncoding {
    fn code(&self) -> u32 {
        match self {
            AttributeEncoding::Predicting(_) => 0,
            AttributeEncoding::Raht(_) => 1,
            AttributeEncoding::Lifting(_) => 2,
        }
    }
}

/// Level-of-detail generation parameters shared by the predicting and
/// lifting transforms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LodConfig {
    pub num_pred_nearest_neighbours_minus1: u32,
    pub search_range: u32,
    /// Neighbour weighting bias, internal axis order.
    pub neigh_bias: Vec3<u32>,
}

/// How points are assigned to detail levels.
#[derive(Debug, Clone, PartialEq)]
pub enum LodSampling {
    /// No detail levels are generated.
    SingleLevel { canonical_point_order_flag: bool },
    /// One decimation period per detail level; every period is at least 2.
    Decimation(Vec<u32>),
    /// Squared-distance threshold per detail level, coded as the ratio to
    /// the previous level.
    DistanceRatio(Vec<u32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictingConfig {
    pub lod: LodConfig,
    pub sampling: LodSampling,
    pub max_num_direct_predictors: u32,
    /// Only coded when direct predictors are enabled.
    pub adaptive_prediction_threshold: u32,
    pub intra_lod_prediction_enabled_flag: bool,
    pub inter_component_prediction_enabled_flag: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RahtConfig {
    pub prediction: Option<RahtPredictionThresholds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RahtPredictionThresholds {
    pub threshold0: u32,
    pub threshold1: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiftingConfig {
    pub lod: LodConfig,
    pub scheme: LiftingScheme,
}

/// Lifting either scales across a level hierarchy or fixes the levels up
/// front like the predicting transform.
#[derive(Debug, Clone, PartialEq)]
pub enum LiftingScheme {
    Scalable { max_neigh_range: u32 },
    FixedLevels(LodSampling),
}

impl AttributeParameterSet {
    pub fn write(&self, sps: &SequenceParameterSet) -> Result<PayloadBuffer, HlsError> {
        let mut buf = PayloadBuffer::new(PayloadType::AttributeParameterSet);
        let mut bs = BitWriter::new();

        bs.write_ue(self.aps_attr_parameter_set_id);
        bs.write_ue(self.aps_seq_parameter_set_id);
        bs.write_ue(self.attr_encoding.code());

        bs.write_ue(self.init_qp_minus4);
        bs.write_se(self.aps_chroma_qp_offset);
        bs.write_flag(self.aps_slice_qp_deltas_present_flag);

        match &self.attr_encoding {
            AttributeEncoding::Predicting(cfg) => {
                write_lod_config(&mut bs, &cfg.lod, sps);
                write_lod_sampling(&mut bs, &cfg.sampling)?;

                bs.write_ue(cfg.max_num_direct_predictors);
                if cfg.max_num_direct_predictors > 0 {
                    bs.write_ue(cfg.adaptive_prediction_threshold);
                }
                bs.write_flag(cfg.intra_lod_prediction_enabled_flag);
                bs.write_flag(cfg.inter_component_prediction_enabled_flag);
            }
            AttributeEncoding::Raht(cfg) => {
                bs.write_flag(cfg.prediction.is_some());
                if let Some(thresholds) = &cfg.prediction {
                    bs.write_ue(thresholds.threshold0);
                    bs.write_ue(thresholds.threshold1);
                }
            }
            AttributeEncoding::Lifting(cfg) => {
                write_lod_config(&mut bs, &cfg.lod, sps);
                match &cfg.scheme {
                    LiftingScheme::Scalable { max_neigh_range } => {
                        bs.write_flag(true);
                        bs.write_ue(*max_neigh_range);
                    }
                    LiftingScheme::FixedLevels(sampling) => {
                        bs.write_flag(false);
                        write_lod_sampling(&mut bs, sampling)?;
                    }
                }
            }
        }

        let aps_extension_flag = false;
        bs.write_flag(aps_extension_flag);
        bs.byte_align();

        buf.append_bits(bs);
        Ok(buf)
    }

    pub fn parse(buf: &PayloadBuffer, sps: &SequenceParameterSet) -> Result<Self, HlsError> {
        buf.expect(PayloadType::AttributeParameterSet)?;
        let mut bs = BitReader::new(buf.data());

        let aps_attr_parameter_set_id = bs.read_ue()?;
        let aps_seq_parameter_set_id = bs.read_ue()?;
        let attr_encoding_code = bs.read_ue()?;

        let init_qp_minus4 = bs.read_ue()?;
        let aps_chroma_qp_offset = bs.read_se()?;
        let aps_slice_qp_deltas_present_flag = bs.read_flag()?;

        let attr_encoding = match attr_encoding_code {
            0 => {
                let lod = parse_lod_config(&mut bs, sps)?;
                let sampling = parse_lod_sampling(&mut bs)?;

                let max_num_direct_predictors = bs.read_ue()?;
                let adaptive_prediction_threshold = if max_num_direct_predictors > 0 {
                    bs.read_ue()?
                } else {
                    0
                };
                AttributeEncoding::Predicting(PredictingConfig {
                    lod,
                    sampling,
                    max_num_direct_predictors,
                    adaptive_prediction_threshold,
                    intra_lod_prediction_enabled_flag: bs.read_flag()?,
                    inter_component_prediction_enabled_flag: bs.read_flag()?,
                })
            }
            1 => {
                let prediction = if bs.read_flag()? {
                    Some(RahtPredictionThresholds {
                        threshold0: bs.read_ue()?,
                        threshold1: bs.read_ue()?,
                    })
                } else {
                    None
                };
                AttributeEncoding::Raht(RahtConfig { prediction })
            }
            2 => {
                let lod = parse_lod_config(&mut bs, sps)?;
                let scheme = if bs.read_flag()? {
                    LiftingScheme::Scalable {
                        max_neigh_range: bs.read_ue()?,
                    }
                } else {
                    LiftingScheme::FixedLevels(parse_lod_sampling(&mut bs)?)
                };
                AttributeEncoding::Lifting(LiftingConfig { lod, scheme })
            }
            code => {
                return Err(HlsError::InvalidParameter(format!(
                    "unknown attribute encoding {}",
                    code
                )))
            }
        };

        let aps_extension_flag = bs.read_flag()?;
        if aps_extension_flag {
            return Err(HlsError::UnsupportedExtension(
                "aps_extension_flag is set but no extension data is defined".into(),
            ));
        }
        bs.byte_align();

        Ok(Self {
            aps_attr_parameter_set_id,
            aps_seq_parameter_set_id,
            init_qp_minus4,
            aps_chroma_qp_offset,
            aps_slice_qp_deltas_present_flag,
            attr_encoding,
        })
    }
}

fn write_lod_config<W: BitWrite>(bs: &mut W, lod: &LodConfig, sps: &SequenceParameterSet) {
    bs.write_ue(lod.num_pred_nearest_neighbours_minus1);
    bs.write_ue(lod.search_range);

    let neigh_bias = to_external_order(sps.geometry_axis_order, lod.neigh_bias);
    bs.write_ue(neigh_bias[0]);
    bs.write_ue(neigh_bias[1]);
    bs.write_ue(neigh_bias[2]);
}

fn parse_lod_config(
    bs: &mut BitReader<'_>,
    sps: &SequenceParameterSet,
) -> Result<LodConfig, HlsError> {
    let num_pred_nearest_neighbours_minus1 = bs.read_ue()?;
    let search_range = bs.read_ue()?;

    let mut neigh_bias = Vec3([0u32; 3]);
    neigh_bias[0] = bs.read_ue()?;
    neigh_bias[1] = bs.read_ue()?;
    neigh_bias[2] = bs.read_ue()?;

    Ok(LodConfig {
        num_pred_nearest_neighbours_minus1,
        search_range,
        neigh_bias: to_internal_order(sps.geometry_axis_order, neigh_bias),
    })
}

fn write_lod_sampling<W: BitWrite>(bs: &mut W, sampling: &LodSampling) -> Status {
    match sampling {
        LodSampling::SingleLevel {
            canonical_point_order_flag,
        } => {
            bs.write_ue(0);
            bs.write_flag(*canonical_point_order_flag);
        }
        LodSampling::Decimation(periods) => {
            if periods.is_empty() {
                return Err(HlsError::InvalidParameter(
                    "a decimation table needs at least one detail level".into(),
                ));
            }
            bs.write_ue(periods.len() as u32);
            bs.write_flag(true);
            for &period in periods {
                if period < 2 {
                    return Err(HlsError::InvalidParameter(format!(
                        "decimation period {} is below the minimum of 2",
                        period
                    )));
                }
                bs.write_ue(period - 2);
            }
        }
        LodSampling::DistanceRatio(dist2) => {
            if dist2.is_empty() {
                return Err(HlsError::InvalidParameter(
                    "a distance table needs at least one detail level".into(),
                ));
            }
            bs.write_ue(dist2.len() as u32);
            bs.write_flag(false);
            for idx in 0..dist2.len() {
                let numerator = dist2[idx];
                let denominator = if idx > 0 { dist2[idx - 1] } else { 1 };
                if denominator == 0 || numerator < denominator {
                    return Err(HlsError::InvalidParameter(
                        "distance thresholds must be positive and non-decreasing".into(),
                    ));
                }
                let scale_minus1 = numerator / denominator - 1;
                bs.write_ue(scale_minus1);
                if idx > 0 {
                    bs.write_ue(numerator % denominator);
                }
            }
        }
    }
    Ok(())
}

fn parse_lod_sampling(bs: &mut BitReader<'_>) -> Result<LodSampling, HlsError> {
    let num_detail_levels = bs.read_ue()? as usize;
    if num_detail_levels == 0 {
        return Ok(LodSampling::SingleLevel {
            canonical_point_order_flag: bs.read_flag()?,
        });
    }

    if bs.read_flag()? {
        let mut periods = Vec::with_capacity(num_detail_levels.min(1024));
        for _ in 0..num_detail_levels {
            let period_minus2 = bs.read_ue()?;
            let period = period_minus2.checked_add(2).ok_or_else(|| {
                HlsError::MalformedLength(format!(
                    "decimation period {} + 2 does not fit a 32-bit field",
                    period_minus2
                ))
            })?;
            periods.push(period);
        }
        Ok(LodSampling::Decimation(periods))
    } else {
        let mut dist2: Vec<u32> = Vec::with_capacity(num_detail_levels.min(1024));
        for idx in 0..num_detail_levels {
            let scale_minus1 = bs.read_ue()?;
            let value = if idx == 0 {
                u64::from(scale_minus1) + 1
            } else {
                let offset = bs.read_ue()?;
                u64::from(dist2[idx - 1]) * (u64::from(scale_minus1) + 1) + u64::from(offset)
            };
            let value = u32::try_from(value).map_err(|_| {
                HlsError::MalformedLength(format!(
                    "distance threshold {} does not fit a 32-bit field",
                    value
                ))
            })?;
            dist2.push(value);
        }
        Ok(LodSampling::DistanceRatio(dist2))
    }
}
