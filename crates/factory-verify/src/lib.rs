//! # factory-verify
//!
//! Schema validation for Agent Factory specs.
//!
//! This crate provides [`engine::SchemaSpecValidator`], which implements the
//! [`factory_core::traits::SpecValidator`] trait using the `jsonschema`
//! crate. Validation runs on the raw document, before it is deserialized into
//! an `AgentSpec`, so structural problems are reported with JSON pointers
//! instead of surfacing as a single serde error.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use factory_core::traits::SpecValidator;
//! use factory_verify::SchemaSpecValidator;
//!
//! let report = SchemaSpecValidator::new()?.validate(&raw_spec)?;
//! for error in &report.errors {
//!     eprintln!("{error}");
//! }
//! ```

pub mod engine;
pub mod schema;

pub use engine::SchemaSpecValidator;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use factory_contracts::error::ForgeError;
    use factory_core::{scaffold::starter_spec, traits::SpecValidator};

    use crate::SchemaSpecValidator;

    fn validator() -> SchemaSpecValidator {
        SchemaSpecValidator::new().unwrap()
    }

    // ── 1. valid documents ────────────────────────────────────────────────────

    #[test]
    fn minimal_spec_is_valid() {
        let report = validator().validate(&json!({ "name": "Help Desk" })).unwrap();
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn starter_spec_is_valid() {
        let spec = serde_json::to_value(starter_spec(None, "commercial")).unwrap();
        let report = validator().validate(&spec).unwrap();
        assert!(report.valid, "{:?}", report.errors);
    }

    /// Unknown action types are the compiler's concern, not the schema's.
    #[test]
    fn unknown_action_type_passes_validation() {
        let spec = json!({
            "name": "Bot",
            "topics": [{ "name": "Odd", "actions": [{ "type": "bogus" }] }]
        });
        assert!(validator().validate(&spec).unwrap().valid);
    }

    // ── 2. violations ─────────────────────────────────────────────────────────

    #[test]
    fn missing_name_is_reported_at_root() {
        let report = validator().validate(&json!({ "topics": [] })).unwrap();

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "/");
        assert!(report.errors[0].message.contains("name"), "{}", report.errors[0]);
    }

    #[test]
    fn every_violation_is_collected() {
        let spec = json!({
            "name": 42,
            "topics": [
                { "description": "no name" },
                { "name": "Ok", "actions": [{ "text": "no type" }] }
            ]
        });

        let report = validator().validate(&spec).unwrap();
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();

        assert_eq!(report.errors.len(), 3, "{:?}", report.errors);
        assert!(paths.contains(&"/name"));
        assert!(paths.contains(&"/topics/0"));
        assert!(paths.contains(&"/topics/1/actions/0"));
    }

    #[test]
    fn nested_condition_branches_are_checked() {
        let spec = json!({
            "name": "Bot",
            "topics": [{
                "name": "Triage",
                "actions": [{
                    "type": "condition",
                    "conditions": [{ "if": "=Topic.A", "then": [{ "text": "untyped" }] }]
                }]
            }]
        });

        let report = validator().validate(&spec).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "/topics/0/actions/0/conditions/0/then/0");
    }

    #[test]
    fn ensure_valid_joins_violations_into_one_error() {
        let spec = json!({ "topics": [{ "actions": [] }] });

        match validator().ensure_valid(&spec) {
            Err(ForgeError::SchemaValidation { reason }) => {
                assert!(reason.contains("/: "), "root violation missing: {reason}");
                assert!(reason.contains("/topics/0: "), "topic violation missing: {reason}");
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
        assert!(validator().ensure_valid(&json!({ "name": "Bot" })).is_ok());
    }

    // ── 3. custom schemas ─────────────────────────────────────────────────────

    #[test]
    fn custom_schema_is_honoured() {
        let schema = json!({
            "type": "object",
            "required": ["name", "instructions"]
        });
        let validator = SchemaSpecValidator::with_schema(&schema).unwrap();

        let report = validator.validate(&json!({ "name": "Bot" })).unwrap();
        assert!(!report.valid);
        assert!(report.errors[0].message.contains("instructions"));
    }

    #[test]
    fn malformed_schema_is_a_config_error() {
        let result = SchemaSpecValidator::with_schema(&json!({ "type": 12 }));

        match result {
            Err(ForgeError::ConfigError { reason }) => {
                assert!(reason.contains("invalid JSON Schema document"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 4. schema files ───────────────────────────────────────────────────────

    #[test]
    fn yaml_schema_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strict.yaml");
        std::fs::write(&path, "type: object\nrequired:\n  - name\n  - instructions\n").unwrap();

        let validator = SchemaSpecValidator::from_file(&path).unwrap();

        let report = validator.validate(&json!({ "name": "Bot" })).unwrap();
        assert!(!report.valid);
        assert!(report.errors[0].message.contains("instructions"), "{}", report.errors[0]);

        let spec = json!({ "name": "Bot", "instructions": "Be brief." });
        assert!(validator.validate(&spec).unwrap().valid);
    }

    #[test]
    fn json_schema_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strict.json");
        std::fs::write(&path, r#"{ "type": "object", "required": ["greeting"] }"#).unwrap();

        let report = SchemaSpecValidator::from_file(&path)
            .unwrap()
            .validate(&json!({ "name": "Bot" }))
            .unwrap();
        assert!(report.errors[0].message.contains("greeting"));
    }

    #[test]
    fn missing_schema_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();

        match SchemaSpecValidator::from_file(&dir.path().join("absent.yaml")) {
            Err(ForgeError::ConfigError { reason }) => {
                assert!(reason.contains("failed to read schema file"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn unparsable_schema_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "type: [object\n").unwrap();

        match SchemaSpecValidator::from_file(&path) {
            Err(ForgeError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse schema file"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
