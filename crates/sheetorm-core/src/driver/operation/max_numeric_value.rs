use super::*;

/// Returns `Rows::Number` holding the largest numeric cell of `column`, or
/// `0` when the column holds no numbers.
#[derive(Debug, Clone)]
pub struct MaxNumericValue {
    pub table: String,
    pub column: String,
}

impl From<MaxNumericValue> for Operation {
    fn from(value: MaxNumericValue) -> Self {
        Self::MaxNumericValue(value)
    }
}
