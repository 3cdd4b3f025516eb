use crate::{stmt::Record, Error, Result};

#[derive(Debug, Clone)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Data rows, in store order
    Records(Vec<Record>),

    /// A single numeric answer
    Number(f64),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn records(records: Vec<Record>) -> Self {
        Self {
            rows: Rows::Records(records),
        }
    }

    pub fn number(number: f64) -> Self {
        Self {
            rows: Rows::Number(number),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_records(&self) -> bool {
        matches!(self, Self::Records(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            rows => Err(rows.unexpected("count")),
        }
    }

    pub fn into_records(self) -> Result<Vec<Record>> {
        match self {
            Rows::Records(records) => Ok(records),
            rows => Err(rows.unexpected("records")),
        }
    }

    pub fn into_number(self) -> Result<f64> {
        match self {
            Rows::Number(number) => Ok(number),
            rows => Err(rows.unexpected("number")),
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        let actual = match self {
            Rows::Count(_) => "count",
            Rows::Records(_) => "records",
            Rows::Number(_) => "number",
        };
        crate::err!("driver returned {actual}, expected {expected}")
    }
}
