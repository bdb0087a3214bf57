//! Inference and schema loading tests

use data_quality_sdk::inference::{
    DataTypeCategory, DataTypeClassifier, InferenceConfig, PatternSource,
};
use data_quality_sdk::schema::{NodeKind, PrimitiveKind, Schema, SchemaError, SchemaTree};
use data_quality_sdk::value::Value;

mod classifier_tests {
    use super::*;

    #[test]
    fn test_leaf_values() {
        let classifier = DataTypeClassifier::new();
        assert_eq!(classifier.classify(&Value::Null), DataTypeCategory::Empty);
        assert_eq!(classifier.classify(&Value::from("  ")), DataTypeCategory::Empty);
        assert_eq!(classifier.classify(&Value::Boolean(false)), DataTypeCategory::Boolean);
        assert_eq!(classifier.classify(&Value::Int(7)), DataTypeCategory::Integer);
        assert_eq!(classifier.classify(&Value::Double(3.0)), DataTypeCategory::Double);
        assert_eq!(classifier.classify(&Value::from("12/31/1999")), DataTypeCategory::Date);
        assert_eq!(classifier.classify(&Value::from("Oxford")), DataTypeCategory::String);
        assert_eq!(
            classifier.classify(&Value::Bytes(vec![0xff, 0xfe])),
            DataTypeCategory::Unknown
        );
        assert_eq!(
            classifier.classify(&Value::Array(vec![Value::from("a")])),
            DataTypeCategory::Unknown
        );
    }

    #[test]
    fn test_numbers_are_never_dates() {
        let config = InferenceConfig::builder().date_pattern("%Y%m%d").build();
        let classifier = DataTypeClassifier::with_config(config);
        assert_eq!(classifier.classify_text("20240115"), DataTypeCategory::Integer);
    }

    #[test]
    fn test_guessing_disabled() {
        let classifier = DataTypeClassifier::with_config(
            InferenceConfig::builder().guess_date_patterns(false).build(),
        );
        assert_eq!(classifier.classify_text("2024-01-15"), DataTypeCategory::String);

        let classifier = DataTypeClassifier::with_config(
            InferenceConfig::builder()
                .guess_date_patterns(false)
                .date_pattern("%Y-%m-%d")
                .build(),
        );
        assert_eq!(classifier.classify_text("2024-01-15"), DataTypeCategory::Date);
        let found = classifier.detect_date_pattern("2024-01-15").unwrap();
        assert_eq!(found.source, PatternSource::Declared);
    }

    #[test]
    fn test_trimming_disabled() {
        let trimmed = DataTypeClassifier::new();
        assert_eq!(trimmed.classify_text(" 42 "), DataTypeCategory::Integer);

        let untrimmed =
            DataTypeClassifier::with_config(InferenceConfig::builder().trim_values(false).build());
        assert_eq!(untrimmed.classify_text(" 42 "), DataTypeCategory::String);
    }

    #[test]
    fn test_config_from_json() {
        let config: InferenceConfig =
            serde_json::from_str(r#"{"datePatterns": ["%d.%m.%Y"], "trimValues": false}"#).unwrap();
        assert_eq!(config.date_patterns, vec!["%d.%m.%Y".to_string()]);
        assert!(config.guess_date_patterns);
        assert!(!config.trim_values);
    }
}

mod schema_tests {
    use super::*;

    #[test]
    fn test_person_schema_tree() {
        let text = std::fs::read_to_string(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/resources/person.avsc"
        ))
        .unwrap();
        let schema = Schema::parse_avro(&text).unwrap();
        let tree = SchemaTree::build(&schema).unwrap();

        let root = tree.root();
        let zipcode = root.field("location").unwrap().field("zipcode").unwrap();
        let NodeKind::Union(members) = &zipcode.kind else {
            panic!("Expected union for zipcode");
        };
        assert_eq!(members.len(), 3);
        assert_eq!(members[1].kind, NodeKind::Primitive(PrimitiveKind::Null));
        assert!(members[2].field("code").is_some());

        let NodeKind::Record { fields, .. } = &root.kind else {
            panic!("Expected record root");
        };
        assert_eq!(fields[1].doc.as_deref(), Some("Given name"));
    }

    #[test]
    fn test_schema_errors() {
        assert!(matches!(
            Schema::parse_avro(r#"{"type": "record", "name": "A", "fields": [{"name": "x", "type": "B"}]}"#),
            Err(SchemaError::UnknownType(_))
        ));
        assert!(matches!(
            Schema::parse_avro("not json"),
            Err(SchemaError::Json(_))
        ));
    }
}
