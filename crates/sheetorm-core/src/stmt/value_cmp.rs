//! Comparison rules for [`Value`].
//!
//! Three families exist and they are intentionally different:
//!
//! * [`Value::loose_eq`] is *coercing equality*, used by `=` and `!=`. Cells
//!   come back from the store typed by the schema while filter literals are
//!   written by hand, so `1` and `"1"` must compare equal.
//! * [`Value::compare`] is the native comparison used by ordering operators.
//!   It returns `None` when two values have no meaningful order.
//! * [`Value::sort_cmp`] is a total order for `ORDER BY`.

use super::Value;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Ordering;

impl Value {
    /// Coercing equality.
    ///
    /// * numbers compare with numbers, numeric strings and booleans (as `0`/`1`);
    ///   a blank string coerces to `0`
    /// * date-times and dates compare by instant, also against strings that
    ///   parse as one
    /// * lists compare against strings through their comma-joined text
    /// * `Null` only equals `Null`
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;

        match (self, other) {
            (Null, Null) => true,
            (Null, _) | (_, Null) => false,
            (Bool(a), Bool(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (DateTime(a), Date(b)) | (Date(b), DateTime(a)) => *a == midnight(*b),
            (DateTime(_) | Date(_), String(s)) | (String(s), DateTime(_) | Date(_)) => {
                let instant = self.instant().or_else(|| other.instant());
                match (instant, parse_instant(s)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (List(_), String(s)) | (String(s), List(_)) => {
                let list = if self.is_list() { self } else { other };
                list.to_key() == *s
            }
            (List(a), List(b)) => a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.loose_eq(b)),
            (Json(a), Json(b)) => a == b,
            (Json(_), _) | (_, Json(_)) => self.to_json() == other.to_json(),
            _ => match (self.coerce_number(), other.coerce_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Native comparison for `>`, `<`, `>=`, `<=` and `BETWEEN`.
    ///
    /// Same-kind values use their natural order, strings and numbers compare
    /// numerically, date-times compare by instant. `Null` never compares.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value::*;

        match (self, other) {
            (Null, _) | (_, Null) => None,
            (String(a), String(b)) => Some(a.cmp(b)),
            (Number(a), Number(b)) => a.partial_cmp(b),
            (DateTime(_) | Date(_), _) | (_, DateTime(_) | Date(_)) => {
                match (self.instant_loose(), other.instant_loose()) {
                    (Some(a), Some(b)) => Some(a.cmp(&b)),
                    _ => None,
                }
            }
            (List(_) | Json(_), _) | (_, List(_) | Json(_)) => None,
            _ => match (self.coerce_number(), other.coerce_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Total order used for sorting.
    ///
    /// Kinds are ranked `Null < Bool < Number < Date/DateTime < String < List
    /// < Json`; values of the same rank compare natively. `NaN` sorts after
    /// every other number.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        use Value::*;

        let rank = self.sort_rank().cmp(&other.sort_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (DateTime(_) | Date(_), DateTime(_) | Date(_)) => self.instant().cmp(&other.instant()),
            (List(a), List(b)) => {
                for (a, b) in a.iter().zip(b) {
                    let ord = a.sort_cmp(b);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Json(a), Json(b)) => a.to_string().cmp(&b.to_string()),
            _ => Ordering::Equal,
        }
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::DateTime(_) | Value::Date(_) => 3,
            Value::String(_) => 4,
            Value::List(_) => 5,
            Value::Json(_) => 6,
        }
    }

    /// Numeric view of scalar values: numbers, booleans and numeric strings.
    fn coerce_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    Some(0.0)
                } else {
                    s.parse::<f64>().ok()
                }
            }
            _ => None,
        }
    }

    /// The value as a point in time: date-times as-is, dates at midnight UTC
    /// and strings that parse as either.
    pub fn to_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::String(s) => parse_instant(s),
            _ => self.instant(),
        }
    }

    fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(v) => Some(*v),
            Value::Date(v) => Some(midnight(*v)),
            _ => None,
        }
    }

    fn instant_loose(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Number(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
            _ => self.to_date_time(),
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Parses RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD` text.
pub(crate) fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(v) = DateTime::parse_from_rfc3339(s) {
        return Some(v.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(v) = NaiveDateTime::parse_from_str(s, format) {
            return Some(v.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(midnight)
}
