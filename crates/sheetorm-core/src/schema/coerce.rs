//! Conversion between raw store cells and typed values.
//!
//! Reads never fail: a cell that does not parse as its column type is kept
//! as a string so validation can report it.

use super::{Column, ColumnType};
use crate::stmt::{self, Value};

use chrono::{NaiveDate, SecondsFormat};

/// Converts a raw cell into a value of the column's type.
pub fn from_cell(cell: &str, column: &Column) -> Value {
    if cell.is_empty() {
        return if column.nullable {
            Value::Null
        } else {
            column.default.clone().unwrap_or_default()
        };
    }

    from_text(cell, &column.ty)
}

fn from_text(cell: &str, ty: &ColumnType) -> Value {
    let raw = || Value::String(cell.to_string());

    match ty {
        ColumnType::Number => cell.trim().parse::<f64>().map(Value::Number).unwrap_or_else(|_| raw()),
        ColumnType::Boolean => {
            let lower = cell.trim().to_ascii_lowercase();
            Value::Bool(matches!(lower.as_str(), "true" | "1" | "yes"))
        }
        ColumnType::DateTime => stmt::parse_instant(cell).map(Value::DateTime).unwrap_or_else(raw),
        ColumnType::Date => NaiveDate::parse_from_str(cell.trim(), "%Y-%m-%d")
            .ok()
            .or_else(|| stmt::parse_instant(cell).map(|instant| instant.date_naive()))
            .map(Value::Date)
            .unwrap_or_else(raw),
        ColumnType::Json => serde_json::from_str(cell).map(Value::Json).unwrap_or_else(|_| raw()),
        ColumnType::List(element) => match serde_json::from_str::<serde_json::Value>(cell) {
            Ok(serde_json::Value::Array(items)) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            Ok(_) => Value::List(vec![raw()]),
            Err(_) => Value::List(
                cell.split(',')
                    .map(|item| from_text(item.trim(), element))
                    .collect(),
            ),
        },
        ColumnType::Enum(values) => {
            let cell = raw();
            values
                .iter()
                .find(|value| value.loose_eq(&cell))
                .cloned()
                .unwrap_or(cell)
        }
        ColumnType::String | ColumnType::Text | ColumnType::Time => raw(),
    }
}

/// Converts a value into the raw cell written to the store.
pub fn to_cell(value: &Value, column: &Column) -> String {
    match (value, &column.ty) {
        (Value::Null, _) => String::new(),
        (Value::Bool(v), _) => bool_cell(*v),
        (value, ColumnType::Boolean) if !matches!(value, Value::String(_)) => {
            bool_cell(value.is_truthy())
        }
        (Value::DateTime(v), ColumnType::Date) => v.date_naive().format("%Y-%m-%d").to_string(),
        (Value::DateTime(v), _) => v.to_rfc3339_opts(SecondsFormat::Millis, true),
        (Value::List(_) | Value::Json(_), _) => value.to_json().to_string(),
        (value, _) => value.to_key(),
    }
}

fn bool_cell(v: bool) -> String {
    if v { "TRUE" } else { "FALSE" }.to_string()
}
