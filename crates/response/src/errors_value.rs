//! Insertion-ordered collector for field validation errors.

use apikit_errors::{ApiError, ErrorMap};

/// Collects field errors for an API response.
///
/// ```
/// use apikit_response::ErrorsValue;
///
/// let errors = ErrorsValue::new()
///     .add("foo", "Foo is required.")
///     .add("bar", "Bar is required.")
///     .into_errors();
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ErrorsValue {
    errors: ErrorMap,
}

impl ErrorsValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collected map with this single entry.
    pub fn error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors = ErrorMap::new();
        self.errors.insert(field.into(), vec![message.into()]);
        self
    }

    /// Set one field's error. A re-added field is overwritten in place and
    /// keeps its original position.
    pub fn add(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.insert(field.into(), vec![message.into()]);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> ErrorMap {
        self.errors
    }

    /// Finish as a throwable validation error.
    pub fn into_error(self) -> ApiError {
        ApiError::validation(self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_insertion_order() {
        let errors = ErrorsValue::new()
            .add("foo", "Foo is required.")
            .add("bar", "Bar is required.")
            .into_errors();

        let keys: Vec<_> = errors.keys().cloned().collect();
        assert_eq!(keys, vec!["foo".to_string(), "bar".to_string()]);
    }

    #[test]
    fn add_overwrites_a_field_in_place() {
        let errors = ErrorsValue::new()
            .add("foo", "first")
            .add("bar", "Bar is required.")
            .add("foo", "second")
            .into_errors();

        let keys: Vec<_> = errors.keys().cloned().collect();
        assert_eq!(keys, vec!["foo".to_string(), "bar".to_string()]);
        assert_eq!(errors["foo"], vec!["second".to_string()]);
    }

    #[test]
    fn error_replaces_everything_collected_so_far() {
        let errors = ErrorsValue::new()
            .add("foo", "Foo is required.")
            .add("bar", "Bar is required.")
            .error("baz", "Baz is required.")
            .into_errors();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["baz"], vec!["Baz is required.".to_string()]);
    }

    #[test]
    fn into_error_builds_a_validation_variant() {
        let error = ErrorsValue::new().add("foo", "Foo is required.").into_error();
        assert_eq!(
            error.error_detail().unwrap()["foo"],
            vec!["Foo is required.".to_string()]
        );
    }
}
