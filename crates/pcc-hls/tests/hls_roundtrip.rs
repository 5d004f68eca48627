use pcc_hls::*;

fn colour_attribute() -> AttributeDescription {
    AttributeDescription {
        num_dimensions_minus1: 0,
        instance_id: 0,
        bitdepth: 8,
        bitdepth_secondary: 0,
        label: AttributeLabel::Colour,
        params: vec![],
    }
}

fn reflectance_attribute() -> AttributeDescription {
    AttributeDescription {
        num_dimensions_minus1: 2,
        instance_id: 1,
        bitdepth: 10,
        bitdepth_secondary: 8,
        label: AttributeLabel::Reflectance,
        params: vec![
            AttributeParameter::DefaultValue(vec![512, 1, 2]),
            AttributeParameter::Cicp {
                colour_primaries_idx: 9,
                transfer_characteristics_idx: 16,
                matrix_coefficients_idx: 9,
                video_full_range_flag: false,
            },
        ],
    }
}

fn base_sps() -> SequenceParameterSet {
    SequenceParameterSet {
        profile_compatibility_flags: 1,
        level: 2,
        sps_seq_parameter_set_id: 0,
        bounding_box: Some(SequenceBoundingBox {
            origin: Vec3::new(0, 0, 0),
            size: Vec3::new(1024, 1024, 1024),
        }),
        seq_geom_scale: 1.0,
        seq_geom_scale_unit_flag: false,
        attribute_sets: vec![colour_attribute()],
        log2_max_frame_idx: 0,
        geometry_axis_order: AxisOrder::Xyz,
        cabac_bypass_stream_enabled_flag: false,
    }
}

fn octree_gps() -> GeometryParameterSet {
    GeometryParameterSet {
        gps_geom_parameter_set_id: 0,
        gps_seq_parameter_set_id: 0,
        geom_box_log2_scale_present_flag: false,
        gps_geom_box_log2_scale: 0,
        geom_unique_points_flag: true,
        tree: GeometryTreeConfig::Octree(OctreeConfig {
            qtbt_enabled_flag: true,
            neighbour_context_restriction_flag: false,
            inferred_direct_coding_mode_enabled_flag: true,
            bitwise_occupancy_coding_flag: true,
            adjacent_child_contextualization_enabled_flag: true,
            planar: None,
            angular: None,
            neighbour_avail_boundary_log2: 8,
            intra_pred_max_node_size_log2: 0,
            trisoup_node_size_log2: 0,
            scaling: None,
        }),
    }
}

fn predicting_aps() -> AttributeParameterSet {
    AttributeParameterSet {
        aps_attr_parameter_set_id: 0,
        aps_seq_parameter_set_id: 0,
        init_qp_minus4: 6,
        aps_chroma_qp_offset: -1,
        aps_slice_qp_deltas_present_flag: true,
        attr_encoding: AttributeEncoding::Predicting(PredictingConfig {
            lod: LodConfig {
                num_pred_nearest_neighbours_minus1: 2,
                search_range: 128,
                neigh_bias: Vec3::new(1, 1, 1),
            },
            sampling: LodSampling::Decimation(vec![4, 4, 2]),
            max_num_direct_predictors: 3,
            adaptive_prediction_threshold: 64,
            intra_lod_prediction_enabled_flag: false,
            inter_component_prediction_enabled_flag: true,
        }),
    }
}

// ---------------------------------------------------------------------------
// Sequence parameter set
// ---------------------------------------------------------------------------

#[test]
fn sps_reference_scenario_roundtrips() {
    let sps = base_sps();
    let decoded = SequenceParameterSet::parse(&sps.write().unwrap()).unwrap();
    assert_eq!(decoded, sps);
    assert_eq!(decoded.attribute_sets.len(), 1);
    assert_eq!(
        decoded.bounding_box.unwrap().size,
        Vec3::new(1024, 1024, 1024)
    );
}

#[test]
fn sps_without_bounding_box_roundtrips() {
    let mut sps = base_sps();
    sps.bounding_box = None;
    sps.seq_geom_scale = 0.5;
    sps.seq_geom_scale_unit_flag = true;
    sps.cabac_bypass_stream_enabled_flag = true;
    sps.log2_max_frame_idx = 10;
    assert_eq!(
        SequenceParameterSet::parse(&sps.write().unwrap()).unwrap(),
        sps
    );
}

#[test]
fn sps_permutes_bounding_box_through_axis_order() {
    let mut sps = base_sps();
    sps.geometry_axis_order = AxisOrder::Zyx;
    sps.bounding_box = Some(SequenceBoundingBox {
        origin: Vec3::new(-1, 2, -3),
        size: Vec3::new(10, 20, 30),
    });
    sps.attribute_sets = vec![colour_attribute(), reflectance_attribute()];

    let decoded = SequenceParameterSet::parse(&sps.write().unwrap()).unwrap();
    assert_eq!(decoded, sps);
}

#[test]
fn sps_with_oid_label_roundtrips() {
    let mut sps = base_sps();
    sps.attribute_sets = vec![AttributeDescription {
        num_dimensions_minus1: 0,
        instance_id: 0,
        bitdepth: 16,
        bitdepth_secondary: 0,
        label: AttributeLabel::Oid("1.3.6.1.4.1".parse().unwrap()),
        params: vec![AttributeParameter::ItuT35 {
            country_code: 0xff,
            country_code_extension: Some(0x01),
            payload: vec![0x10, 0x20],
        }],
    }];
    assert_eq!(
        SequenceParameterSet::parse(&sps.write().unwrap()).unwrap(),
        sps
    );
}

#[test]
fn sps_extension_flag_is_rejected() {
    // Minimal SPS written by hand with the extension flag set.
    let mut bs = BitWriter::new();
    bs.write_un(24, 0); // profile compatibility
    bs.write_un(8, 0); // level
    bs.write_ue(0); // sps id
    bs.write_flag(false); // no bounding box
    bs.write_f(1.0);
    bs.write_un(1, 0); // scale unit
    bs.write_ue(0); // no attribute sets
    bs.write_un(5, 0); // log2 max frame idx
    bs.write_un(3, 0); // axis order
    bs.write_flag(false); // cabac bypass
    bs.write_flag(true); // extension flag
    bs.byte_align();

    let buf = PayloadBuffer::from_data(PayloadType::SequenceParameterSet, bs.finish());
    assert!(matches!(
        SequenceParameterSet::parse(&buf),
        Err(HlsError::UnsupportedExtension(_))
    ));
}

#[test]
fn sps_reserved_axis_order_is_rejected() {
    let mut bs = BitWriter::new();
    bs.write_un(24, 0);
    bs.write_un(8, 0);
    bs.write_ue(0);
    bs.write_flag(false);
    bs.write_f(1.0);
    bs.write_un(1, 0);
    bs.write_ue(0);
    bs.write_un(5, 0);
    bs.write_un(3, 7); // reserved axis order code
    bs.write_flag(false);
    bs.write_flag(false);
    bs.byte_align();

    let buf = PayloadBuffer::from_data(PayloadType::SequenceParameterSet, bs.finish());
    assert!(matches!(
        SequenceParameterSet::parse(&buf),
        Err(HlsError::InvalidParameter(_))
    ));
}

#[test]
fn parse_checks_the_payload_tag() {
    let sps = base_sps();
    let buf = sps.write().unwrap();
    let wrong = PayloadBuffer::from_data(PayloadType::GeometryParameterSet, buf.data().to_vec());
    assert!(matches!(
        SequenceParameterSet::parse(&wrong),
        Err(HlsError::PayloadTypeMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Geometry parameter set
// ---------------------------------------------------------------------------

#[test]
fn gps_minimal_octree_roundtrips() {
    let sps = base_sps();
    let gps = octree_gps();
    assert_eq!(
        GeometryParameterSet::parse(&gps.write(&sps).unwrap(), &sps).unwrap(),
        gps
    );
}

#[test]
fn gps_full_octree_roundtrips() {
    let mut sps = base_sps();
    sps.geometry_axis_order = AxisOrder::Yzx;
    let mut gps = octree_gps();
    if let GeometryTreeConfig::Octree(octree) = &mut gps.tree {
        octree.planar = Some(PlanarModeConfig {
            threshold0: 77,
            threshold1: 99,
            threshold2: 113,
            idcm_threshold: 255,
        });
        octree.angular = Some(AngularModeConfig {
            origin: Vec3::new(100, 200, 300),
            lasers: vec![
                LaserCalibration {
                    theta: -300,
                    z_offset: 10,
                    num_phi_per_turn: 1800,
                },
                LaserCalibration {
                    theta: -150,
                    z_offset: -5,
                    num_phi_per_turn: 1800,
                },
                LaserCalibration {
                    theta: -150,
                    z_offset: 0,
                    num_phi_per_turn: 900,
                },
            ],
            planar_buffer_disabled_flag: true,
        });
        octree.trisoup_node_size_log2 = 3;
        octree.scaling = Some(GeometryScalingConfig {
            geom_base_qp: 12,
            geom_idcm_qp_offset: -2,
        });
    }
    assert_eq!(
        GeometryParameterSet::parse(&gps.write(&sps).unwrap(), &sps).unwrap(),
        gps
    );
}

#[test]
fn gps_predictive_geometry_roundtrips() {
    let sps = base_sps();
    let gps = GeometryParameterSet {
        gps_geom_parameter_set_id: 1,
        gps_seq_parameter_set_id: 0,
        geom_box_log2_scale_present_flag: true,
        gps_geom_box_log2_scale: 0,
        geom_unique_points_flag: false,
        tree: GeometryTreeConfig::Predictive,
    };
    assert_eq!(
        GeometryParameterSet::parse(&gps.write(&sps).unwrap(), &sps).unwrap(),
        gps
    );
}

#[test]
fn gps_rejects_decreasing_laser_angles() {
    let sps = base_sps();
    let mut gps = octree_gps();
    if let GeometryTreeConfig::Octree(octree) = &mut gps.tree {
        octree.angular = Some(AngularModeConfig {
            origin: Vec3::new(0, 0, 0),
            lasers: vec![
                LaserCalibration {
                    theta: 10,
                    z_offset: 0,
                    num_phi_per_turn: 600,
                },
                LaserCalibration {
                    theta: 9,
                    z_offset: 0,
                    num_phi_per_turn: 600,
                },
            ],
            planar_buffer_disabled_flag: false,
        });
    }
    assert!(matches!(
        gps.write(&sps),
        Err(HlsError::OrderingViolation(_))
    ));
}

// ---------------------------------------------------------------------------
// Attribute parameter set
// ---------------------------------------------------------------------------

#[test]
fn aps_predicting_with_decimation_roundtrips() {
    let sps = base_sps();
    let aps = predicting_aps();
    assert_eq!(
        AttributeParameterSet::parse(&aps.write(&sps).unwrap(), &sps).unwrap(),
        aps
    );
}

#[test]
fn aps_predicting_with_distance_ratios_roundtrips() {
    let sps = base_sps();
    let mut aps = predicting_aps();
    if let AttributeEncoding::Predicting(cfg) = &mut aps.attr_encoding {
        cfg.sampling = LodSampling::DistanceRatio(vec![3, 12, 50, 200]);
        cfg.max_num_direct_predictors = 0;
        cfg.adaptive_prediction_threshold = 0;
    }
    assert_eq!(
        AttributeParameterSet::parse(&aps.write(&sps).unwrap(), &sps).unwrap(),
        aps
    );
}

#[test]
fn aps_predicting_single_level_roundtrips() {
    let sps = base_sps();
    let mut aps = predicting_aps();
    if let AttributeEncoding::Predicting(cfg) = &mut aps.attr_encoding {
        cfg.sampling = LodSampling::SingleLevel {
            canonical_point_order_flag: true,
        };
    }
    assert_eq!(
        AttributeParameterSet::parse(&aps.write(&sps).unwrap(), &sps).unwrap(),
        aps
    );
}

#[test]
fn aps_raht_variants_roundtrip() {
    let sps = base_sps();
    for prediction in [
        None,
        Some(RahtPredictionThresholds {
            threshold0: 2,
            threshold1: 4,
        }),
    ] {
        let aps = AttributeParameterSet {
            aps_attr_parameter_set_id: 1,
            aps_seq_parameter_set_id: 0,
            init_qp_minus4: 0,
            aps_chroma_qp_offset: 0,
            aps_slice_qp_deltas_present_flag: false,
            attr_encoding: AttributeEncoding::Raht(RahtConfig { prediction }),
        };
        assert_eq!(
            AttributeParameterSet::parse(&aps.write(&sps).unwrap(), &sps).unwrap(),
            aps
        );
    }
}

#[test]
fn aps_lifting_variants_roundtrip() {
    let mut sps = base_sps();
    sps.geometry_axis_order = AxisOrder::Zxy;
    let lod = LodConfig {
        num_pred_nearest_neighbours_minus1: 1,
        search_range: 44,
        neigh_bias: Vec3::new(1, 2, 4),
    };
    for scheme in [
        LiftingScheme::Scalable {
            max_neigh_range: 15,
        },
        LiftingScheme::FixedLevels(LodSampling::DistanceRatio(vec![1, 4, 16])),
        LiftingScheme::FixedLevels(LodSampling::SingleLevel {
            canonical_point_order_flag: false,
        }),
    ] {
        let aps = AttributeParameterSet {
            aps_attr_parameter_set_id: 2,
            aps_seq_parameter_set_id: 0,
            init_qp_minus4: 8,
            aps_chroma_qp_offset: 3,
            aps_slice_qp_deltas_present_flag: true,
            attr_encoding: AttributeEncoding::Lifting(LiftingConfig {
                lod: lod.clone(),
                scheme,
            }),
        };
        assert_eq!(
            AttributeParameterSet::parse(&aps.write(&sps).unwrap(), &sps).unwrap(),
            aps
        );
    }
}

#[test]
fn aps_rejects_undersized_decimation_period() {
    let sps = base_sps();
    let mut aps = predicting_aps();
    if let AttributeEncoding::Predicting(cfg) = &mut aps.attr_encoding {
        cfg.sampling = LodSampling::Decimation(vec![4, 1]);
    }
    assert!(matches!(
        aps.write(&sps),
        Err(HlsError::InvalidParameter(_))
    ));
}

// ---------------------------------------------------------------------------
// Geometry brick header and footer
// ---------------------------------------------------------------------------

#[test]
fn gbh_octree_roundtrips_and_locates_the_body() {
    let mut sps = base_sps();
    sps.log2_max_frame_idx = 5;
    sps.geometry_axis_order = AxisOrder::Xzy;
    let mut gps = octree_gps();
    if let GeometryTreeConfig::Octree(octree) = &mut gps.tree {
        octree.trisoup_node_size_log2 = 2;
        octree.scaling = Some(GeometryScalingConfig::default());
    }

    let gbh = GeometryBrickHeader {
        geom_geom_parameter_set_id: 0,
        geom_tile_id: 3,
        geom_slice_id: 7,
        frame_idx: 21,
        geom_box_log2_scale: 0,
        geom_box_origin: Vec3::new(64, 128, 256),
        tree_lvl_coded_axis_list: vec![7, 7, 3, 5, 6],
        geom_stream_len_bits: 16,
        geom_stream_len: vec![1000, 2000],
        geom_slice_qp_offset: -4,
        geom_octree_qp_offset_depth: 2,
        trisoup_sampling_value_minus1: 1,
        num_unique_segments_minus1: 99,
    };

    let mut buf = gbh.write(&sps, &gps).unwrap();
    let header_len = buf.len();

    // Entropy body plus the backward-seekable footer complete the payload.
    buf.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    let footer = GeometryBrickFooter {
        geom_num_points_minus1: 999,
    };
    footer.write(&mut buf).unwrap();

    let (decoded, bytes_read) = GeometryBrickHeader::parse_with_size(&buf, &sps, &gps).unwrap();
    assert_eq!(decoded, gbh);
    assert_eq!(bytes_read, header_len);
    assert_eq!(GeometryBrickFooter::parse(&buf).unwrap(), footer);
    assert_eq!(&buf.data()[buf.len() - 3..], &[0x00, 0x03, 0xe7]);
}

#[test]
fn gbh_without_qtbt_synthesizes_full_axis_masks() {
    let sps = base_sps();
    let mut gps = octree_gps();
    if let GeometryTreeConfig::Octree(octree) = &mut gps.tree {
        octree.qtbt_enabled_flag = false;
    }

    let gbh = GeometryBrickHeader {
        tree_lvl_coded_axis_list: vec![7, 7, 7],
        ..GeometryBrickHeader::default()
    };
    let decoded = GeometryBrickHeader::parse(&gbh.write(&sps, &gps).unwrap(), &sps, &gps).unwrap();
    assert_eq!(decoded, gbh);
}

#[test]
fn gbh_predictive_skips_octree_fields() {
    let sps = base_sps();
    let gps = GeometryParameterSet {
        gps_geom_parameter_set_id: 0,
        gps_seq_parameter_set_id: 0,
        geom_box_log2_scale_present_flag: true,
        gps_geom_box_log2_scale: 0,
        geom_unique_points_flag: true,
        tree: GeometryTreeConfig::Predictive,
    };
    let gbh = GeometryBrickHeader {
        geom_slice_id: 1,
        geom_box_log2_scale: 4,
        geom_box_origin: Vec3::new(16, 32, 48),
        ..GeometryBrickHeader::default()
    };
    let decoded = GeometryBrickHeader::parse(&gbh.write(&sps, &gps).unwrap(), &sps, &gps).unwrap();
    assert_eq!(decoded, gbh);
}

#[test]
fn gbh_id_parse_reads_only_the_prefix() {
    let sps = base_sps();
    let gps = octree_gps();
    let gbh = GeometryBrickHeader {
        geom_geom_parameter_set_id: 2,
        geom_tile_id: 5,
        geom_slice_id: 9,
        tree_lvl_coded_axis_list: vec![7],
        ..GeometryBrickHeader::default()
    };
    let buf = gbh.write(&sps, &gps).unwrap();

    let ids = GeometryBrickHeader::parse_ids(&buf).unwrap();
    assert_eq!(ids.geom_geom_parameter_set_id, 2);
    assert_eq!(ids.geom_tile_id, 5);
    assert_eq!(ids.geom_slice_id, 9);
}

// ---------------------------------------------------------------------------
// Attribute brick header
// ---------------------------------------------------------------------------

#[test]
fn abh_minimal_roundtrips() {
    let sps = base_sps();
    let mut aps = predicting_aps();
    aps.aps_slice_qp_deltas_present_flag = false;

    let abh = AttributeBrickHeader {
        attr_attr_parameter_set_id: 0,
        attr_sps_attr_idx: 0,
        attr_geom_slice_id: 4,
        ..AttributeBrickHeader::default()
    };
    let (decoded, bytes_read) =
        AttributeBrickHeader::parse_with_size(&abh.write(&sps, &aps).unwrap(), &sps, &aps)
            .unwrap();
    assert_eq!(decoded, abh);
    assert!(bytes_read > 0);
}

#[test]
fn abh_with_layer_and_region_deltas_roundtrips() {
    let mut sps = base_sps();
    sps.attribute_sets = vec![reflectance_attribute()];
    sps.geometry_axis_order = AxisOrder::Yxz;
    let aps = predicting_aps();

    let abh = AttributeBrickHeader {
        attr_attr_parameter_set_id: 0,
        attr_sps_attr_idx: 0,
        attr_geom_slice_id: 0,
        attr_qp_delta_luma: 5,
        attr_qp_delta_chroma: -5,
        attr_layer_qp_deltas: vec![
            LayerQpDelta { luma: 1, chroma: 0 },
            LayerQpDelta { luma: -1, chroma: 2 },
        ],
        qp_regions: vec![AttributeQpRegion {
            origin: Vec3::new(0, 16, 32),
            size: Vec3::new(64, 64, 1),
            qp_offset: [-3, 3],
        }],
    };
    assert_eq!(
        AttributeBrickHeader::parse(&abh.write(&sps, &aps).unwrap(), &sps, &aps).unwrap(),
        abh
    );
}

#[test]
fn abh_single_dimension_attribute_codes_one_region_offset() {
    let sps = base_sps(); // colour attribute with a single dimension
    let aps = predicting_aps();

    let mut abh = AttributeBrickHeader {
        qp_regions: vec![AttributeQpRegion {
            origin: Vec3::new(1, 2, 3),
            size: Vec3::new(4, 5, 6),
            qp_offset: [7, 0],
        }],
        ..AttributeBrickHeader::default()
    };
    let decoded = AttributeBrickHeader::parse(&abh.write(&sps, &aps).unwrap(), &sps, &aps).unwrap();
    assert_eq!(decoded, abh);

    // The second offset is not coded for single-dimension attributes.
    abh.qp_regions[0].qp_offset[1] = 11;
    let decoded = AttributeBrickHeader::parse(&abh.write(&sps, &aps).unwrap(), &sps, &aps).unwrap();
    assert_eq!(decoded.qp_regions[0].qp_offset[1], 0);
}

#[test]
fn abh_rejects_multiple_regions() {
    let sps = base_sps();
    let aps = predicting_aps();
    let abh = AttributeBrickHeader {
        qp_regions: vec![AttributeQpRegion::default(), AttributeQpRegion::default()],
        ..AttributeBrickHeader::default()
    };
    assert!(matches!(
        abh.write(&sps, &aps),
        Err(HlsError::InvalidParameter(_))
    ));
}

#[test]
fn abh_region_with_unknown_attribute_index_is_rejected() {
    let sps = base_sps();
    let aps = predicting_aps();
    let abh = AttributeBrickHeader {
        attr_sps_attr_idx: 4,
        qp_regions: vec![AttributeQpRegion {
            size: Vec3::new(1, 1, 1),
            ..AttributeQpRegion::default()
        }],
        ..AttributeBrickHeader::default()
    };
    assert!(matches!(
        abh.write(&sps, &aps),
        Err(HlsError::UnresolvedReference(_))
    ));
}

#[test]
fn abh_id_parse_reads_only_the_prefix() {
    let sps = base_sps();
    let aps = predicting_aps();
    let abh = AttributeBrickHeader {
        attr_attr_parameter_set_id: 1,
        attr_sps_attr_idx: 0,
        attr_geom_slice_id: 12,
        ..AttributeBrickHeader::default()
    };
    let buf = abh.write(&sps, &aps).unwrap();

    let ids = AttributeBrickHeader::parse_ids(&buf).unwrap();
    assert_eq!(ids.attr_attr_parameter_set_id, 1);
    assert_eq!(ids.attr_sps_attr_idx, 0);
    assert_eq!(ids.attr_geom_slice_id, 12);
}

// ---------------------------------------------------------------------------
// Constant attribute data unit
// ---------------------------------------------------------------------------

#[test]
fn constant_attribute_roundtrips() {
    let mut sps = base_sps();
    sps.attribute_sets.push(reflectance_attribute());

    let cadu = ConstantAttributeDataUnit {
        constattr_attr_parameter_set_id: 0,
        constattr_sps_attr_idx: 1,
        constattr_geom_slice_id: 2,
        constattr_default_value: vec![1023, 255, 0],
    };
    assert_eq!(
        ConstantAttributeDataUnit::parse(&cadu.write(&sps).unwrap(), &sps).unwrap(),
        cadu
    );
}

#[test]
fn constant_attribute_with_unknown_index_is_rejected() {
    let sps = base_sps();
    let cadu = ConstantAttributeDataUnit {
        constattr_sps_attr_idx: 9,
        constattr_default_value: vec![0],
        ..ConstantAttributeDataUnit::default()
    };
    assert!(matches!(
        cadu.write(&sps),
        Err(HlsError::UnresolvedReference(_))
    ));
}

// ---------------------------------------------------------------------------
// Tile inventory
// ---------------------------------------------------------------------------

#[test]
fn tile_inventory_sizes_fields_to_the_largest_value() {
    let sps = base_sps();
    let inventory = TileInventory {
        ti_seq_parameter_set_id: 0,
        tile_id_present_flag: false,
        tiles: vec![
            TileEntry {
                tile_id: 0,
                origin: Vec3::new(0, 0, 0),
                size: Vec3::new(1000, 500, 500),
            },
            TileEntry {
                tile_id: 1,
                origin: Vec3::new(-1000, 0, 0),
                size: Vec3::new(1000, 500, 500),
            },
        ],
        origin: Vec3::new(-7, 8, -9),
    };
    assert_eq!(inventory.tile_bounding_box_bits(), 10);

    let buf = inventory.write(&sps).unwrap();
    // The width byte follows the 7-bit id, the present flag and the 16-bit count.
    assert_eq!(buf.data()[3], 10);
    assert_eq!(TileInventory::parse(&buf, &sps).unwrap(), inventory);
}

#[test]
fn tile_inventory_with_explicit_ids_roundtrips() {
    let mut sps = base_sps();
    sps.geometry_axis_order = AxisOrder::Zyx;
    let inventory = TileInventory {
        ti_seq_parameter_set_id: 3,
        tile_id_present_flag: true,
        tiles: vec![TileEntry {
            tile_id: 77,
            origin: Vec3::new(5, -6, 7),
            size: Vec3::new(8, 9, 10),
        }],
        origin: Vec3::new(0, 0, 0),
    };
    assert_eq!(
        TileInventory::parse(&inventory.write(&sps).unwrap(), &sps).unwrap(),
        inventory
    );
}

#[test]
fn empty_tile_inventory_roundtrips() {
    let sps = base_sps();
    let inventory = TileInventory::default();
    assert_eq!(
        TileInventory::parse(&inventory.write(&sps).unwrap(), &sps).unwrap(),
        inventory
    );
}
