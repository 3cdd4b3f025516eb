use super::{record, Operator, Record, Value};

use serde::Serialize;
use std::cmp::Ordering;

/// How a clause combines with the clauses before it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

/// A single `column operator value` test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clause {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
    pub conjunction: Conjunction,
}

/// An ordered list of clauses.
///
/// Clauses fold strictly left to right: the first clause seeds the result and
/// each following clause is combined with AND, or with OR when it was added
/// through [`Filter::or_filter`]. There is no grouping, so
/// `a OR b AND c` evaluates as `(a OR b) AND c`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a filter from a clause list.
    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn push(&mut self, clause: Clause) -> &mut Self {
        self.clauses.push(clause);
        self
    }

    /// Appends an AND clause.
    pub fn filter(
        &mut self,
        column: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push_clause(column.into(), operator.into(), value.into(), Conjunction::And)
    }

    /// Appends an OR clause.
    pub fn or_filter(
        &mut self,
        column: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push_clause(column.into(), operator.into(), value.into(), Conjunction::Or)
    }

    /// Equality shorthand. The literals `"NULL"` and `"NOT NULL"` turn into
    /// the matching null test instead.
    pub fn filter_by(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        let operator = match value.as_str() {
            Some("NULL") => Operator::IsNull,
            Some("NOT NULL") => Operator::IsNotNull,
            _ => Operator::Eq,
        };

        if operator.is_null_test() {
            self.filter(column, operator, Value::Null)
        } else {
            self.filter(column, operator, value)
        }
    }

    pub fn filter_eq(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.filter(column, Operator::Eq, value)
    }

    pub fn filter_in<T: Into<Value>>(
        &mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.filter(column, Operator::In, list(values))
    }

    pub fn filter_not_in<T: Into<Value>>(
        &mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.filter(column, Operator::NotIn, list(values))
    }

    pub fn filter_null(&mut self, column: impl Into<String>) -> &mut Self {
        self.filter(column, Operator::IsNull, Value::Null)
    }

    pub fn filter_not_null(&mut self, column: impl Into<String>) -> &mut Self {
        self.filter(column, Operator::IsNotNull, Value::Null)
    }

    pub fn filter_between(
        &mut self,
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.filter(column, Operator::Between, Value::List(vec![low.into(), high.into()]))
    }

    pub fn filter_not_between(
        &mut self,
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.filter(
            column,
            Operator::NotBetween,
            Value::List(vec![low.into(), high.into()]),
        )
    }

    /// Evaluates the filter against a record. An empty filter matches
    /// everything.
    pub fn matches(&self, record: &Record) -> bool {
        let mut clauses = self.clauses.iter();

        let Some(first) = clauses.next() else {
            return true;
        };

        clauses.fold(first.matches(record), |acc, clause| match clause.conjunction {
            Conjunction::And => acc && clause.matches(record),
            Conjunction::Or => acc || clause.matches(record),
        })
    }

    fn push_clause(
        &mut self,
        column: String,
        operator: Operator,
        value: Value,
        conjunction: Conjunction,
    ) -> &mut Self {
        self.push(Clause {
            column,
            operator,
            value,
            conjunction,
        })
    }
}

impl Clause {
    /// Evaluates this clause alone against a record.
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record::get(record, &self.column);
        let expected = &self.value;

        match &self.operator {
            Operator::Eq => actual.loose_eq(expected),
            Operator::Ne => !actual.loose_eq(expected),
            Operator::Gt => actual.compare(expected) == Some(Ordering::Greater),
            Operator::Lt => actual.compare(expected) == Some(Ordering::Less),
            Operator::Ge => matches!(
                actual.compare(expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Le => matches!(
                actual.compare(expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::In => expected
                .as_list()
                .is_some_and(|items| items.contains(actual)),
            Operator::NotIn => expected
                .as_list()
                .is_some_and(|items| !items.contains(actual)),
            Operator::IsNull => actual.is_empty(),
            Operator::IsNotNull => !actual.is_empty(),
            Operator::Between => match expected.as_list() {
                Some([low, high]) => {
                    matches!(
                        actual.compare(low),
                        Some(Ordering::Greater | Ordering::Equal)
                    ) && matches!(
                        actual.compare(high),
                        Some(Ordering::Less | Ordering::Equal)
                    )
                }
                _ => false,
            },
            Operator::NotBetween => match expected.as_list() {
                Some([low, high]) => {
                    actual.compare(low) == Some(Ordering::Less)
                        || actual.compare(high) == Some(Ordering::Greater)
                }
                _ => true,
            },
            Operator::Other(_) => false,
        }
    }
}

fn list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Value {
    Value::List(values.into_iter().map(Into::into).collect())
}
