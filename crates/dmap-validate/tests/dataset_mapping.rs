//! Integration test: dataset mapping documents against the built-in schema.
//!
//! Starts from a document holding only the mandatory fields and applies one
//! change at a time, checking that each change is accepted or rejected with
//! the expected violation.

use dmap_model::dataset_mapping_schema;
use dmap_validate::{
    validate, validate_file, validate_mapping, validate_value, ValidationError, ValidationResult,
    ViolationKind,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::path::PathBuf;

const CRS_WKT: &str = "GEOGCS[\"WGS 84\",\n    DATUM[\"WGS_1984\",\n        SPHEROID[\"WGS 84\",6378137,298.257223563,\n            AUTHORITY[\"EPSG\",\"7030\"]],\n        AUTHORITY[\"EPSG\",\"6326\"]],\n    PRIMEM[\"Greenwich\",0,\n        AUTHORITY[\"EPSG\",\"8901\"]],\n    UNIT[\"degree\",0.0174532925199433,\n        AUTHORITY[\"EPSG\",\"9122\"]],\n    AUTHORITY[\"EPSG\",\"4326\"]]\n";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn band(id: &str) -> Value {
    json!({
        "dtype": "int16",
        "nodata": -999,
        "resampling_method": "cubic",
        "varname": format!("band_{id}")
    })
}

/// A mapping with only the mandatory fields (plus `location_name`).
fn mandatory_mapping() -> Value {
    json!({
        "name": "ls7_nbar",
        "file_path_template": "{platform[code]}_{instrument[name]}_{tile_index[0]}_{tile_index[1]}_{start_time:%Y-%m-%dT%H-%M-%S.%f}.nc",
        "location_name": "eotiles",
        "match": {
            "metadata": {}
        },
        "measurements": {
            "10": band("10"),
            "20": band("20"),
            "30": band("30"),
            "40": band("40"),
            "50": band("50"),
            "70": band("70")
        },
        "storage": {
            "chunking": {"latitude": 500, "longitude": 500, "time": 1},
            "crs": CRS_WKT,
            "dimension_order": ["time", "latitude", "longitude"],
            "driver": "NetCDF CF",
            "resolution": {"latitude": -0.00025, "longitude": 0.00025},
            "tile_size": {"latitude": 1.0, "longitude": 1.0}
        }
    })
}

/// Apply a top-level update, like `dict.update`.
fn with_update(update: Value) -> Value {
    let mut mapping = mandatory_mapping();
    let target = mapping.as_object_mut().unwrap();
    for (key, value) in update.as_object().unwrap() {
        target.insert(key.clone(), value.clone());
    }
    mapping
}

/// Replace measurement `10` with `entry`.
fn with_measurement(entry: Value) -> Value {
    let mut mapping = mandatory_mapping();
    mapping["measurements"]["10"] = entry;
    mapping
}

fn check(document: &Value) -> ValidationResult {
    validate_value(dataset_mapping_schema(), document).unwrap()
}

/// `(path, kind)` of every violation.
fn violations(document: &Value) -> Vec<(String, ViolationKind)> {
    check(document)
        .violations()
        .iter()
        .map(|v| (v.path.to_string(), v.kind))
        .collect()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_mandatory_fields_only_is_valid() {
    init_tracing();
    assert_eq!(check(&mandatory_mapping()), ValidationResult::Valid);
    validate_mapping(&mandatory_mapping()).unwrap();
}

#[test]
fn test_accepts_valid_updates() {
    let updates = [
        json!({}),
        json!({"match": {"metadata": {"anything": "anything"}}}),
        json!({"global_attributes": {"anything": "anything"}}),
        json!({"description": "Some string"}),
    ];
    for update in updates {
        let mapping = with_update(update.clone());
        let result = check(&mapping);
        assert!(result.is_valid(), "update {update} was rejected: {result:?}");
    }
}

#[test]
fn test_empty_document_is_invalid() {
    let result = check(&json!({}));
    let missing: Vec<String> = result
        .violations()
        .iter()
        .filter(|v| v.kind == ViolationKind::MissingRequiredField)
        .map(|v| v.path.to_string())
        .collect();
    assert_eq!(
        missing,
        ["name", "file_path_template", "match", "measurements", "storage"]
    );
    assert_eq!(result.violations().len(), missing.len());
}

#[test]
fn test_rejects_invalid_updates() {
    let cases = [
        (json!({"name": null}), "name", ViolationKind::MissingRequiredField),
        (
            json!({"file_path_template": null}),
            "file_path_template",
            ViolationKind::MissingRequiredField,
        ),
        (json!({"storage": "s"}), "storage", ViolationKind::NotAMapping),
        (
            json!({"file_path_template": {}}),
            "file_path_template",
            ViolationKind::NotAString,
        ),
        (json!({"description": 123}), "description", ViolationKind::NotAString),
        (json!({"asdf": "asdf"}), "asdf", ViolationKind::UnknownField),
        (json!({"name": " whitespace "}), "name", ViolationKind::PatternMismatch),
        (json!({"name": "with-dashes"}), "name", ViolationKind::PatternMismatch),
        (json!({"mappings": {}}), "mappings", ViolationKind::UnknownField),
        (json!({"mappings": ""}), "mappings", ViolationKind::UnknownField),
        (
            json!({"file_path_template": ""}),
            "file_path_template",
            ViolationKind::EmptyValue,
        ),
        (json!({"location_name": 5}), "location_name", ViolationKind::NotAString),
        (
            json!({"global_attributes": "x"}),
            "global_attributes",
            ViolationKind::NotAMapping,
        ),
        (json!({"match": {}}), "match.metadata", ViolationKind::MissingRequiredField),
        (
            json!({"match": {"metadata": {}, "extra": 1}}),
            "match.extra",
            ViolationKind::UnknownField,
        ),
    ];
    for (update, path, kind) in cases {
        let mapping = with_update(update.clone());
        assert_eq!(
            violations(&mapping),
            [(path.to_string(), kind)],
            "unexpected result for update {update}"
        );
        assert!(matches!(
            validate_mapping(&mapping),
            Err(ValidationError::InvalidDocument(_))
        ));
    }
}

#[test]
fn test_accepts_valid_measurements() {
    for entry in [json!({}), json!({"fill_value": -999})] {
        let result = check(&with_measurement(entry.clone()));
        assert!(result.is_valid(), "measurement {entry} was rejected: {result:?}");
    }
}

#[test]
fn test_rejects_invalid_measurements() {
    let cases = [
        (json!({"nodata": "-999"}), "nodata", ViolationKind::TypeMismatch),
        (json!({"fill_value": "x"}), "fill_value", ViolationKind::TypeMismatch),
        (json!({"dtype": "asdf"}), "dtype", ViolationKind::EnumMismatch),
        (json!({"dtype": "intt13"}), "dtype", ViolationKind::EnumMismatch),
        (json!({"dtype": 13}), "dtype", ViolationKind::NotAString),
        (json!({"asdf": "asdf"}), "asdf", ViolationKind::UnknownField),
        (
            json!({"resampling_method": "dartboard"}),
            "resampling_method",
            ViolationKind::EnumMismatch,
        ),
        (json!({"varname": "white space"}), "varname", ViolationKind::PatternMismatch),
        (json!({"varname": "%chars%"}), "varname", ViolationKind::PatternMismatch),
    ];
    for (entry, field, kind) in cases {
        let mapping = with_measurement(entry.clone());
        assert_eq!(
            violations(&mapping),
            [(format!("measurements.10.{field}"), kind)],
            "unexpected result for measurement {entry}"
        );
    }
}

#[test]
fn test_measurement_must_be_a_mapping() {
    let mapping = with_measurement(json!("int16"));
    assert_eq!(
        violations(&mapping),
        [("measurements.10".to_string(), ViolationKind::NotAMapping)]
    );
}

#[test]
fn test_storage_sub_fields() {
    let mut mapping = mandatory_mapping();
    mapping["storage"]["chunking"]["time"] = json!(0);
    mapping["storage"]["dimension_order"][1] = json!(7);
    mapping["storage"]["resolution"]["latitude"] = json!("fine");
    mapping["storage"].as_object_mut().unwrap().remove("driver");
    assert_eq!(
        violations(&mapping),
        [
            ("storage.chunking.time".to_string(), ViolationKind::OutOfRange),
            ("storage.dimension_order[1]".to_string(), ViolationKind::NotAString),
            ("storage.driver".to_string(), ViolationKind::MissingRequiredField),
            ("storage.resolution.latitude".to_string(), ViolationKind::TypeMismatch),
        ]
    );
}

#[test]
fn test_unknown_storage_key_rejected() {
    let mut mapping = mandatory_mapping();
    mapping["storage"]["compression"] = json!("zlib");
    assert_eq!(
        violations(&mapping),
        [("storage.compression".to_string(), ViolationKind::UnknownField)]
    );
}

#[test]
fn test_all_violations_reported_together() {
    let mut mapping = with_update(json!({"name": "bad name", "asdf": 1, "description": 5}));
    mapping["measurements"]["20"]["dtype"] = json!("int13");
    mapping["measurements"]["30"]["varname"] = json!("%x%");

    let err = validate_mapping(&mapping).unwrap_err();
    let rendered = err.to_string();
    assert_eq!(err.violations().unwrap().len(), 5);
    for expected in [
        "asdf: unknown field",
        "name: pattern mismatch",
        "description: not a string",
        "measurements.20.dtype: value not allowed",
        "measurements.30.varname: pattern mismatch",
    ] {
        assert!(rendered.contains(expected), "missing '{expected}' in:\n{rendered}");
    }
}

#[test]
fn test_validation_is_idempotent() {
    let schema = dataset_mapping_schema();
    let document = with_update(json!({"name": "with-dashes", "asdf": "asdf"}));
    let map = document.as_object().unwrap();
    assert_eq!(validate(schema, map), validate(schema, map));
    assert_eq!(document, with_update(json!({"name": "with-dashes", "asdf": "asdf"})));
}

#[test]
fn test_top_level_must_be_a_mapping() {
    let err = validate_mapping(&json!("ls7_nbar")).unwrap_err();
    assert!(matches!(err, ValidationError::NotADocument { found: "string" }));
}

#[test]
fn test_yaml_fixture_validates() {
    init_tracing();
    let results =
        validate_file(dataset_mapping_schema(), &fixture("ls7_nbar_albers.yaml")).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_valid(), "fixture rejected: {:?}", results[0]);
}

#[test]
fn test_yaml_fixture_with_defects() {
    let results =
        validate_file(dataset_mapping_schema(), &fixture("invalid_mappings.yaml")).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].violations().iter().map(|v| v.kind).collect::<Vec<_>>(),
        [ViolationKind::UnknownField]
    );
    assert_eq!(
        results[1]
            .violations()
            .iter()
            .map(|v| v.path.to_string())
            .collect::<Vec<_>>(),
        ["measurements.blue.resampling_method"]
    );
}

#[test]
fn test_schema_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let mapping = if i % 2 == 0 {
                    mandatory_mapping()
                } else {
                    with_update(json!({"asdf": "asdf"}))
                };
                check(&mapping).is_valid()
            })
        })
        .collect();
    let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outcomes, [true, false, true, false]);
}

proptest! {
    #[test]
    fn prop_identifier_names_accepted(name in "[A-Za-z0-9_]{1,40}") {
        let mapping = with_update(json!({"name": name}));
        prop_assert!(check(&mapping).is_valid());
    }

    #[test]
    fn prop_dashed_names_rejected(head in "[a-z]{1,10}", tail in "[a-z0-9]{1,10}") {
        let mapping = with_update(json!({"name": format!("{head}-{tail}")}));
        prop_assert_eq!(
            violations(&mapping),
            vec![("name".to_string(), ViolationKind::PatternMismatch)]
        );
    }

    #[test]
    fn prop_unknown_measurement_key_is_isolated(key in "[a-z]{3,12}") {
        prop_assume!(
            !["dtype", "nodata", "fill_value", "resampling_method", "varname"]
                .contains(&key.as_str())
        );
        let mut mapping = mandatory_mapping();
        mapping["measurements"]["40"][key.as_str()] = json!(1);
        let found = violations(&mapping);
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(&found[0].0, &format!("measurements.40.{key}"));
        prop_assert_eq!(found[0].1, ViolationKind::UnknownField);
    }

    #[test]
    fn prop_validation_is_deterministic(nodata in prop::num::i32::ANY, dtype in "[a-z0-9]{1,8}") {
        let mapping = with_measurement(json!({"nodata": nodata, "dtype": dtype}));
        prop_assert_eq!(check(&mapping), check(&mapping));
    }
}
