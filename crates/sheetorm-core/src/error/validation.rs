use super::Error;

use indexmap::IndexMap;

/// Per-field validation messages, in schema column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FieldErrors {
    fields: IndexMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Records every message for `field`; an empty list records nothing.
    pub fn extend(&mut self, field: &str, messages: Vec<String>) {
        if !messages.is_empty() {
            self.fields
                .entry(field.to_string())
                .or_default()
                .extend(messages);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

/// Error when a record fails schema validation.
#[derive(Debug)]
pub(super) struct ValidationError {
    pub(super) errors: FieldErrors,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("validation failed")?;

        let mut sep = ": ";
        for (field, messages) in self.errors.iter() {
            write!(f, "{sep}{field}: {}", messages.join(", "))?;
            sep = "; ";
        }

        Ok(())
    }
}

impl Error {
    /// Creates a validation error carrying every failing field.
    pub fn validation(errors: FieldErrors) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError { errors }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        self.validation_errors().is_some()
    }

    /// Returns the per-field messages if this is a validation error.
    pub fn validation_errors(&self) -> Option<&FieldErrors> {
        self.find_kind(|kind| match kind {
            super::ErrorKind::Validation(err) => Some(&err.errors),
            _ => None,
        })
    }
}
