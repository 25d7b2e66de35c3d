#[cfg(test)]
mod tests {
    use std::path::Path;

    use beatmap_core::compaction::{Category, CompactDocument, ExpandedDocument};
    use beatmap_core::container::decode_container;
    use beatmap_core::headers::{HeaderError, MetadataPolicy};
    use beatmap_core::pipeline::{
        container_name_from_path, convert_document, convert_json, package_compact, package_json,
        recompress_json, unpack_container, ApiConfig, PackParams,
    };
    use beatmap_core::telemetry::Stage;
    use beatmap_core::types::ConvertError;
    use beatmap_core::version::VersionPolicy;
    use serde_json::{json, Value};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn expanded_text(version: &str) -> Vec<u8> {
        serde_json::to_vec_pretty(&json!({
            "version": version,
            "colorNotes": [
                {"b": 1.0, "x": 0, "y": 0, "c": 0, "d": 1, "a": 0},
                {"b": 2.0, "x": 0, "y": 0, "c": 0, "d": 1, "a": 1},
                {"b": 2.5, "x": 1, "y": 0, "c": 1, "d": 1, "a": 0},
            ],
            "bombNotes": [{"b": 3.0, "x": 2, "y": 2}],
            "waypoints": [{"b": 4.0, "x": 1, "y": 1, "d": 0}],
        }))
        .unwrap()
    }

    #[test]
    fn convert_json_produces_canonical_text() {
        init_tracing();
        let out = convert_json(&expanded_text("3.3.0"), &ApiConfig::default()).unwrap();
        let value: Value = serde_json::from_slice(&out.output).unwrap();

        assert_eq!(value["version"], json!("4.0.0"));
        assert_eq!(value["colorNotes"], json!([{"b": 1.0}, {"b": 2.0, "i": 0}, {"b": 2.5, "i": 1}]));
        assert_eq!(value["spawnRotations"], json!([{"b": 4.0}]));
        assert!(!out.output.contains(&b'\n'));

        let notes = out.snapshot.category(Category::ColorNotes);
        assert_eq!(notes.events, 3);
        assert_eq!(notes.unique_data, 2);
        assert_eq!(notes.reused(), 1);
        assert!(out.snapshot.size_reduction_percent > 0.0);
        assert_eq!(out.snapshot.metadata, None);
        assert!(out.snapshot.sanity_check());
    }

    #[test]
    fn source_version_mismatch_aborts_by_default() {
        let err = convert_json(&expanded_text("2.6.0"), &ApiConfig::default()).unwrap_err();
        match err {
            ConvertError::Version(m) => {
                assert_eq!(m.expected, "3.");
                assert_eq!(m.found, "2.6.0");
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn source_version_mismatch_can_proceed() {
        init_tracing();
        let out = convert_json(&expanded_text("2.6.0"), &ApiConfig::proceed_on_mismatch()).unwrap();
        let value: Value = serde_json::from_slice(&out.output).unwrap();
        assert_eq!(value["version"], json!("4.0.0"));
    }

    #[test]
    fn missing_version_is_unknown() {
        let input = ExpandedDocument::from_value(json!({"colorNotes": []})).unwrap();
        assert!(matches!(
            convert_document(&input, &ApiConfig::default()).unwrap_err(),
            ConvertError::Version(m) if m.found == "unknown"
        ));
        assert!(convert_document(&input, &ApiConfig::proceed_on_mismatch()).is_ok());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = convert_json(b"{\"version\": ", &ApiConfig::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Json(_)));
    }

    #[test]
    fn package_then_unpack() {
        init_tracing();
        let params = PackParams::new("Expert.beatmap.gz");
        let packed = package_json(&expanded_text("3.3.0"), &params, &ApiConfig::default()).unwrap();

        let snapshot = &packed.snapshot;
        assert_eq!(snapshot.bytes_header, 28);
        assert_eq!(snapshot.output_bytes(), packed.output.len() as u64);
        assert_eq!(snapshot.metadata, Some((snapshot.bytes_compressed - 1) as u16));
        assert!(snapshot.compression_ratio > 0.0);
        assert!(snapshot.stage_times.has_all(&[Stage::Parse, Stage::Compact, Stage::Serialize, Stage::Compress]));

        let unpacked = unpack_container(&packed.output).unwrap();
        let (header, doc) = unpacked.output;
        assert_eq!(header.name, "Expert.beatmap.gz");
        assert_eq!(Some(header.metadata), snapshot.metadata);
        assert_eq!(doc.version, "4.0.0");
        assert_eq!(doc.table(Category::BombNotes).events.len(), 1);
        assert_eq!(unpacked.snapshot.category(Category::ColorNotes).unique_data, 2);
        assert_eq!(unpacked.snapshot.bytes_serialized, snapshot.bytes_serialized);
    }

    #[test]
    fn package_compact_matches_package_json() {
        let config = ApiConfig::default();
        let params = PackParams::new("Hard.beatmap.gz").with_explicit_metadata(42);

        let input = ExpandedDocument::from_value(serde_json::from_slice(&expanded_text("3.3.0")).unwrap()).unwrap();
        let doc = convert_document(&input, &config).unwrap().output;

        let a = package_compact(&doc, &params, &config).unwrap();
        let b = package_json(&expanded_text("3.3.0"), &params, &config).unwrap();
        assert_eq!(a.output, b.output);
        assert_eq!(a.snapshot.metadata, Some(42));
    }

    #[test]
    fn package_compact_checks_target_version() {
        let doc = CompactDocument::new("3.0.0");
        let params = PackParams::new("Easy.beatmap.gz");
        assert!(matches!(
            package_compact(&doc, &params, &ApiConfig::default()).unwrap_err(),
            ConvertError::Version(_)
        ));
        assert!(package_compact(&doc, &params, &ApiConfig::proceed_on_mismatch()).is_ok());
    }

    #[test]
    fn recompress_keeps_unknown_keys() {
        let input = br#"{
            "version": "4.0.0",
            "colorNotes": [ {"b": 1} ],
            "customData": { "bookmarks": [ {"b": 8, "n": "drop"} ] },
            "lightshow": "ExpertLightshow.dat"
        }"#;
        let params = PackParams::new("ExpertPlus.beatmap.gz");
        let out = recompress_json(input, &params, &ApiConfig::default()).unwrap();

        let view = decode_container(&out.output).unwrap();
        let text = String::from_utf8(view.decompress().unwrap()).unwrap();
        assert_eq!(
            text,
            r#"{"version":"4.0.0","colorNotes":[{"b":1}],"customData":{"bookmarks":[{"b":8,"n":"drop"}]},"lightshow":"ExpertLightshow.dat"}"#
        );
        assert!(out.snapshot.bytes_serialized < out.snapshot.bytes_input);
    }

    #[test]
    fn recompress_rejects_source_generation() {
        let params = PackParams::new("Expert.beatmap.gz");
        let err = recompress_json(&expanded_text("3.3.0"), &params, &ApiConfig::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Version(_)));
    }

    #[test]
    fn params_are_validated_up_front() {
        let config = ApiConfig::default();
        let input = expanded_text("3.3.0");

        let bad_level = PackParams { level: 10, ..PackParams::new("a") };
        assert!(matches!(package_json(&input, &bad_level, &config).unwrap_err(), ConvertError::Compression(_)));

        let bad_meta = PackParams::new("a").with_explicit_metadata(65_536);
        assert!(matches!(
            package_json(&input, &bad_meta, &config).unwrap_err(),
            ConvertError::Header(HeaderError::MetadataOutOfRange { value: 65_536 })
        ));

        let bad_name = PackParams::new("Ëxpert.beatmap.gz");
        assert!(matches!(
            package_json(&input, &bad_name, &config).unwrap_err(),
            ConvertError::Header(HeaderError::NonAsciiName { .. })
        ));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: PackParams = serde_json::from_value(json!({"container_name": "Normal.beatmap.gz"})).unwrap();
        assert_eq!(params, PackParams::new("Normal.beatmap.gz"));
        assert_eq!(params.metadata, MetadataPolicy::Derived { offset: 1 });
        assert_eq!(params.level, 9);

        let params: PackParams = serde_json::from_value(json!({
            "container_name": "Normal.beatmap.gz",
            "metadata": {"Explicit": 512},
        }))
        .unwrap();
        assert_eq!(params.metadata, MetadataPolicy::Explicit(512));

        let config: ApiConfig = serde_json::from_value(json!({"version_policy": "Proceed"})).unwrap();
        assert_eq!(config.version_policy, VersionPolicy::Proceed);
        let config: ApiConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.version_policy, VersionPolicy::Abort);
    }

    #[test]
    fn container_name_comes_from_file_name() {
        assert_eq!(container_name_from_path(Path::new("out/Expert.beatmap.gz")).unwrap(), "Expert.beatmap.gz");
        assert!(container_name_from_path(Path::new("/")).is_err());

        let params = PackParams::for_output_path(Path::new("maps/song/Hard.beatmap.gz")).unwrap();
        assert_eq!(params.container_name, "Hard.beatmap.gz");
    }

    #[test]
    fn unpack_rejects_non_container() {
        assert!(matches!(unpack_container(b"\x01\x00").unwrap_err(), ConvertError::Container(_)));
    }

    #[test]
    fn snapshot_serializes() {
        let out = convert_json(&expanded_text("3.3.0"), &ApiConfig::default()).unwrap();
        let value = serde_json::to_value(&out.snapshot).unwrap();
        assert_eq!(value["categories"]["colorNotes"]["events"], json!(3));
        assert_eq!(value["categories"]["spawnRotations"]["unique_data"], json!(1));
    }
}
