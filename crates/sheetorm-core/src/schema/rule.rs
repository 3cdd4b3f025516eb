use regex::Regex;

/// A validation rule attached to a column.
#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: RuleKind,

    /// Replaces the default message when set.
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Minimum length of a string, in characters
    MinLength(usize),

    /// Maximum length of a string, in characters
    MaxLength(usize),

    Min(f64),
    Max(f64),
    Integer,
    Pattern(Regex),
    Email,
    MinItems(usize),
    MaxItems(usize),

    /// No other row may hold the same value
    Unique,
}

impl Rule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self.kind, RuleKind::Unique)
    }

    /// Message reported when the rule fails for `column`.
    pub fn message_for(&self, column: &str) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }

        match &self.kind {
            RuleKind::MinLength(n) => format!("Must be at least {n} characters"),
            RuleKind::MaxLength(n) => format!("Must be at most {n} characters"),
            RuleKind::Min(n) => format!("Must be at least {n}"),
            RuleKind::Max(n) => format!("Must be at most {n}"),
            RuleKind::Integer => "Must be an integer".to_string(),
            RuleKind::Pattern(_) | RuleKind::Email => "Invalid format".to_string(),
            RuleKind::MinItems(n) => format!("Must have at least {n} items"),
            RuleKind::MaxItems(n) => format!("Must have at most {n} items"),
            RuleKind::Unique => format!("{column} must be unique"),
        }
    }
}
