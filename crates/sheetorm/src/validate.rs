use crate::{Error, FieldErrors, Result};

use regex::Regex;
use sheetorm_core::{
    schema::{Column, ColumnType, RuleKind},
    stmt::{record, Record, Value},
    Schema,
};
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Checks records against a table schema.
///
/// Every column is checked independently and all failures are reported
/// together, keyed by column.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    schema: &'a Schema,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates `record`. Uniqueness is only checked when `existing` rows
    /// are supplied.
    pub fn validate(&self, record: &Record, existing: Option<&[Record]>) -> Result<()> {
        let mut errors = FieldErrors::new();

        for (name, column) in self.schema.columns() {
            let messages = self.validate_column(name, column, record, existing);
            errors.extend(name, messages);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(errors))
        }
    }

    fn validate_column(
        &self,
        name: &str,
        column: &Column,
        record: &Record,
        existing: Option<&[Record]>,
    ) -> Vec<String> {
        if column.primary && column.auto_increment {
            return vec![];
        }

        let value = record::get(record, name);

        if value.is_empty() {
            if column.required {
                return vec![format!("{name} is required")];
            }

            if column.nullable {
                return vec![];
            }
        }

        if let Some(message) = type_error(value, &column.ty) {
            return vec![message];
        }

        column
            .rules
            .iter()
            .filter(|rule| !rule_passes(&rule.kind, name, column, value, existing))
            .map(|rule| rule.message_for(name))
            .collect()
    }
}

fn type_error(value: &Value, ty: &ColumnType) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let ok = match ty {
        ColumnType::Number => value.as_f64().is_some_and(|n| !n.is_nan()),
        ColumnType::Boolean => matches!(value, Value::Bool(_)),
        ColumnType::DateTime | ColumnType::Date => match value {
            Value::DateTime(_) | Value::Date(_) | Value::String(_) => value.to_date_time().is_some(),
            _ => false,
        },
        ColumnType::List(_) => value.is_list(),
        ColumnType::Json => true,
        ColumnType::Enum(values) => {
            if values.contains(value) {
                true
            } else {
                let values: Vec<_> = values.iter().map(Value::to_key).collect();
                return Some(format!("Must be one of: {}", values.join(", ")));
            }
        }
        ColumnType::String | ColumnType::Text | ColumnType::Time => {
            matches!(value, Value::String(_))
        }
    };

    if ok {
        return None;
    }

    let message = match ty {
        ColumnType::Number => "Must be a number",
        ColumnType::Boolean => "Must be a boolean",
        ColumnType::DateTime | ColumnType::Date => "Must be a valid date",
        ColumnType::List(_) => "Must be an array",
        _ => "Must be a string",
    };

    Some(message.to_string())
}

fn rule_passes(
    rule: &RuleKind,
    name: &str,
    column: &Column,
    value: &Value,
    existing: Option<&[Record]>,
) -> bool {
    match (rule, value) {
        (RuleKind::MinLength(n), Value::String(s)) => s.chars().count() >= *n,
        (RuleKind::MaxLength(n), Value::String(s)) => s.chars().count() <= *n,
        (RuleKind::Min(n), Value::Number(v)) => v >= n,
        (RuleKind::Max(n), Value::Number(v)) => v <= n,
        (RuleKind::Integer, Value::Number(v)) => v.fract() == 0.0,
        (RuleKind::Pattern(regex), Value::String(s)) => regex.is_match(s),
        (RuleKind::Email, Value::String(s)) => email_regex().is_some_and(|regex| regex.is_match(s)),
        (RuleKind::MinItems(n), Value::List(items)) => items.len() >= *n,
        (RuleKind::MaxItems(n), Value::List(items)) => items.len() <= *n,
        (RuleKind::Unique, value) if !value.is_empty() => {
            let Some(existing) = existing else {
                return true;
            };

            // A primary column never collides with the row holding its own value.
            column.primary || !existing.iter().any(|row| record::get(row, name) == value)
        }
        _ => true,
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}
