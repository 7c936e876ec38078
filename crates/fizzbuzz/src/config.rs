//! Options for sequence generation.

/// A substitution rule: every number divisible by `multiple` is replaced by `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub multiple: i64,
    pub token: String,
}

impl Rule {
    pub fn new(multiple: i64, token: impl Into<String>) -> Self {
        Self {
            multiple,
            token: token.into(),
        }
    }
}

/// Range, rules and separator used by [`crate::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub from: i64,
    pub to: i64,
    pub fizz: Rule,
    pub buzz: Rule,
    pub separator: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            from: 1,
            to: 100,
            fizz: Rule::new(3, "fizz"),
            buzz: Rule::new(5, "buzz"),
            separator: ",".to_string(),
        }
    }
}

impl Options {
    /// Set the first number of the range.
    pub fn from(mut self, from: i64) -> Self {
        self.from = from;
        self
    }

    /// Set the last number of the range (inclusive).
    pub fn to(mut self, to: i64) -> Self {
        self.to = to;
        self
    }

    pub fn fizz(mut self, multiple: i64, token: impl Into<String>) -> Self {
        self.fizz = Rule::new(multiple, token);
        self
    }

    pub fn buzz(mut self, multiple: i64, token: impl Into<String>) -> Self {
        self.buzz = Rule::new(multiple, token);
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}
