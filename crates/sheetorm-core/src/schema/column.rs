use super::{Rule, RuleKind};
use crate::stmt::Value;

use regex::Regex;
use std::fmt;

/// Semantic type of a column. The store itself only holds strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    String,

    /// Long-form string
    Text,

    Number,
    Boolean,
    DateTime,
    Date,

    /// Time of day, kept as text
    Time,

    Json,

    /// A list of values of the given element type
    List(Box<ColumnType>),

    /// One of a fixed set of values
    Enum(Vec<Value>),
}

/// Declarative description of one column.
#[derive(Debug, Clone)]
pub struct Column {
    pub ty: ColumnType,

    /// True if this column identifies the row
    pub primary: bool,

    /// True if new rows get `max + 1` assigned for this column
    pub auto_increment: bool,

    pub required: bool,
    pub nullable: bool,
    pub unique: bool,

    /// Value used when a cell is empty and the column is not nullable
    pub default: Option<Value>,

    /// Validation rules, checked in order
    pub rules: Vec<Rule>,

    /// Stamp the current time when the row is created
    pub auto_create: bool,

    /// Stamp the current time whenever the row is written
    pub auto_update: bool,
}

impl Column {
    pub fn new(ty: ColumnType) -> Self {
        Self {
            ty,
            primary: false,
            auto_increment: false,
            required: false,
            nullable: false,
            unique: false,
            default: None,
            rules: vec![],
            auto_create: false,
            auto_update: false,
        }
    }

    /// Auto-incrementing numeric primary key.
    pub fn id() -> Self {
        Self::number().primary().auto_increment()
    }

    pub fn string() -> Self {
        Self::new(ColumnType::String)
    }

    pub fn text() -> Self {
        Self::new(ColumnType::Text)
    }

    pub fn number() -> Self {
        Self::new(ColumnType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(ColumnType::Boolean)
    }

    pub fn date_time() -> Self {
        Self::new(ColumnType::DateTime)
    }

    pub fn date() -> Self {
        Self::new(ColumnType::Date)
    }

    pub fn time() -> Self {
        Self::new(ColumnType::Time)
    }

    pub fn json() -> Self {
        Self::new(ColumnType::Json)
    }

    pub fn list(element: ColumnType) -> Self {
        Self::new(ColumnType::List(Box::new(element)))
    }

    pub fn enumeration<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::new(ColumnType::Enum(values.into_iter().map(Into::into).collect()))
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self.rule(RuleKind::Unique)
    }

    pub fn min_length(self, n: usize) -> Self {
        self.rule(RuleKind::MinLength(n))
    }

    pub fn max_length(self, n: usize) -> Self {
        self.rule(RuleKind::MaxLength(n))
    }

    pub fn min(self, n: impl Into<f64>) -> Self {
        self.rule(RuleKind::Min(n.into()))
    }

    pub fn max(self, n: impl Into<f64>) -> Self {
        self.rule(RuleKind::Max(n.into()))
    }

    pub fn integer(self) -> Self {
        self.rule(RuleKind::Integer)
    }

    pub fn pattern(self, regex: Regex) -> Self {
        self.rule(RuleKind::Pattern(regex))
    }

    pub fn email(self) -> Self {
        self.rule(RuleKind::Email)
    }

    pub fn min_items(self, n: usize) -> Self {
        self.rule(RuleKind::MinItems(n))
    }

    pub fn max_items(self, n: usize) -> Self {
        self.rule(RuleKind::MaxItems(n))
    }

    pub fn auto_create(mut self) -> Self {
        self.auto_create = true;
        self
    }

    pub fn auto_update(mut self) -> Self {
        self.auto_update = true;
        self
    }

    pub fn rule(mut self, kind: RuleKind) -> Self {
        self.rules.push(Rule::new(kind));
        self
    }

    /// Overrides the message of the most recently added rule.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.message = Some(message.into());
        }
        self
    }

    pub fn has_unique_rule(&self) -> bool {
        self.rules.iter().any(Rule::is_unique)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Text => f.write_str("text"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::DateTime => f.write_str("date_time"),
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
            Self::Json => f.write_str("json"),
            Self::List(element) => write!(f, "list({element})"),
            Self::Enum(values) => {
                let values: Vec<_> = values.iter().map(Value::to_key).collect();
                write!(f, "enumeration({})", values.join(", "))
            }
        }
    }
}
