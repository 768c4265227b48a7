//! Normalization of JSON-Schema validation failures into field errors.

use jsonschema::paths::PathChunk;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{JSONSchema, ValidationError};
use serde_json::Value;
use thiserror::Error;

use apikit_errors::ErrorMap;

/// One schema violation: where it happened and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Instance path segments joined with `.`, e.g. `"posts.tagUsers.2"`.
    pub path: String,
    pub message: String,
}

impl SchemaIssue {
    fn from_validation(error: &ValidationError<'_>) -> Self {
        let mut segments: Vec<String> = error
            .instance_path
            .iter()
            .map(|chunk| match chunk {
                PathChunk::Property(name) => name.to_string(),
                PathChunk::Index(index) => index.to_string(),
                PathChunk::Keyword(keyword) => keyword.to_string(),
            })
            .collect();

        // Missing-property issues are reported at the enclosing object;
        // address the property itself, where field validators report them.
        if let ValidationErrorKind::Required { property } = &error.kind {
            if let Some(name) = property.as_str() {
                segments.push(name.to_string());
            }
        }

        Self {
            path: segments.join("."),
            message: error.to_string(),
        }
    }
}

/// Owned, ordered list of schema violations.
///
/// `jsonschema` errors borrow the validated instance, so they are captured
/// into this owned form at the validation site and travel through `anyhow`
/// to the dispatcher, which flattens them into the same field → messages
/// shape validation errors use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema validation failed")]
pub struct SchemaErrors {
    issues: Vec<SchemaIssue>,
}

impl SchemaErrors {
    /// Validate `instance`, capturing every violation in schema order.
    pub fn check(schema: &JSONSchema, instance: &Value) -> Result<(), Self> {
        match schema.validate(instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(Self::collect(errors)),
        }
    }

    pub fn collect<'a, I>(errors: I) -> Self
    where
        I: IntoIterator<Item = ValidationError<'a>>,
    {
        let issues = errors
            .into_iter()
            .map(|error| SchemaIssue::from_validation(&error))
            .collect();
        Self { issues }
    }

    pub fn issues(&self) -> &[SchemaIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Flatten into `{field: [messages]}`, preserving issue order and
    /// accumulating multiple messages at one path.
    pub fn into_error_map(self) -> ErrorMap {
        let mut map = ErrorMap::new();
        for issue in self.issues {
            map.entry(issue.path).or_default().push(issue.message);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> JSONSchema {
        JSONSchema::compile(&json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "addresses": {"type": "array", "items": {"type": "string"}},
                "posts": {
                    "type": "object",
                    "properties": {
                        "tagUsers": {"type": "array", "items": {"type": "string"}}
                    }
                }
            }
        }))
        .expect("schema is valid")
    }

    #[test]
    fn array_issue_paths_normalize_to_dotted_keys() {
        let schema = user_schema();
        let instance = json!({
            "name": "Foo",
            "addresses": ["ok", 42],
            "posts": {"tagUsers": ["a", "b", 3]}
        });

        let errors = SchemaErrors::check(&schema, &instance).unwrap_err();
        let map = errors.into_error_map();

        let keys: Vec<_> = map.keys().cloned().collect();
        assert!(keys.contains(&"addresses.1".to_string()), "keys: {keys:?}");
        assert!(
            keys.contains(&"posts.tagUsers.2".to_string()),
            "keys: {keys:?}"
        );
        assert_eq!(map["addresses.1"].len(), 1);
    }

    #[test]
    fn missing_required_property_is_addressed_at_the_field() {
        let schema = user_schema();
        let errors = SchemaErrors::check(&schema, &json!({})).unwrap_err();
        let map = errors.into_error_map();

        assert!(map.contains_key("name"), "keys: {:?}", map.keys());
    }

    #[test]
    fn valid_instance_passes() {
        let schema = user_schema();
        let instance = json!({"name": "Foo", "addresses": ["one"], "posts": {"tagUsers": []}});
        assert!(SchemaErrors::check(&schema, &instance).is_ok());
    }

    #[test]
    fn multiple_messages_accumulate_per_path() {
        let issues = vec![
            SchemaIssue {
                path: "foo".into(),
                message: "first".into(),
            },
            SchemaIssue {
                path: "foo".into(),
                message: "second".into(),
            },
        ];
        let map = SchemaErrors { issues }.into_error_map();
        assert_eq!(map["foo"], vec!["first".to_string(), "second".to_string()]);
    }
}
