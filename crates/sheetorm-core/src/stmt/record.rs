use super::Value;

use indexmap::IndexMap;

/// A row keyed by column name, in column order.
pub type Record = IndexMap<String, Value>;

static NULL: Value = Value::Null;

/// Reads a column from a record; a missing column reads as `Null`.
pub fn get<'a>(record: &'a Record, column: &str) -> &'a Value {
    record.get(column).unwrap_or(&NULL)
}

/// Builds a record from `(column, value)` pairs.
///
/// ```
/// # use sheetorm_core::stmt::record;
/// let rec = record::from_pairs([("name", "Ann".into()), ("age", 30.into())]);
/// assert_eq!(rec.len(), 2);
/// ```
pub fn from_pairs<K, I>(pairs: I) -> Record
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Keeps only the named columns, in the order given. Missing columns read
/// as `Null`.
pub fn project(record: &Record, columns: &[String]) -> Record {
    columns
        .iter()
        .map(|column| (column.clone(), get(record, column).clone()))
        .collect()
}

/// Builds a [`Record`](crate::stmt::Record) from `column => value` pairs.
#[macro_export]
macro_rules! record {
    () => {
        $crate::stmt::Record::new()
    };
    ( $( $column:expr => $value:expr ),+ $(,)? ) => {{
        let mut record = $crate::stmt::Record::new();
        $(
            record.insert(
                ::std::string::String::from($column),
                $crate::stmt::Value::from($value),
            );
        )+
        record
    }};
}
