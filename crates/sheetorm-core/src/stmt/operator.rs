use serde::{Serialize, Serializer};
use std::fmt;

/// Comparison operator of a filter clause.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,

    /// An operator literal that is not recognized. Clauses using it never
    /// match.
    Other(String),
}

impl Operator {
    /// Parses an operator literal. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(literal: &str) -> Operator {
        let normalized = literal.trim().to_ascii_uppercase();

        match normalized.as_str() {
            "=" => Self::Eq,
            "!=" => Self::Ne,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            "IN" => Self::In,
            "NOT IN" => Self::NotIn,
            "BETWEEN" => Self::Between,
            "NOT BETWEEN" => Self::NotBetween,
            "NULL" => Self::IsNull,
            "NOT NULL" => Self::IsNotNull,
            _ => Self::Other(literal.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        use Operator::*;

        match self {
            Eq => "=",
            Ne => "!=",
            Gt => ">",
            Lt => "<",
            Ge => ">=",
            Le => "<=",
            In => "IN",
            NotIn => "NOT IN",
            Between => "BETWEEN",
            NotBetween => "NOT BETWEEN",
            IsNull => "NULL",
            IsNotNull => "NOT NULL",
            Other(literal) => literal,
        }
    }

    /// Returns `true` for the null tests, which ignore the clause value.
    pub fn is_null_test(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl From<&str> for Operator {
    fn from(src: &str) -> Self {
        Self::parse(src)
    }
}

impl From<String> for Operator {
    fn from(src: String) -> Self {
        Self::parse(&src)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
