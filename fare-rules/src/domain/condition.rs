//! Condition clauses of the fare-rule language.
//!
//! A condition is a single `key op value` comparison such as `zone<=3` or
//! `duration>90`. Lists of conditions are joined with `&`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::FareError;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Equal (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
    /// Less than (<)
    Less,
    /// Less than or equal (<=)
    LessEqual,
    /// Greater than (>)
    Greater,
    /// Greater than or equal (>=)
    GreaterEqual,
}

/// Operator tokens in matching order: two-character tokens come before
/// their one-character prefixes.
const OPERATORS: [(&str, Comparator); 6] = [
    ("<=", Comparator::LessEqual),
    (">=", Comparator::GreaterEqual),
    ("!=", Comparator::NotEqual),
    ("<", Comparator::Less),
    (">", Comparator::Greater),
    ("=", Comparator::Equal),
];

impl Comparator {
    /// Returns the operator as written in rule files.
    pub fn token(&self) -> &'static str {
        match self {
            Comparator::Equal => "=",
            Comparator::NotEqual => "!=",
            Comparator::Less => "<",
            Comparator::LessEqual => "<=",
            Comparator::Greater => ">",
            Comparator::GreaterEqual => ">=",
        }
    }

    /// Match the longest operator token at the start of `s`.
    fn split_prefix(s: &str) -> Option<(Self, &str)> {
        OPERATORS
            .iter()
            .find_map(|(token, cmp)| s.strip_prefix(token).map(|rest| (*cmp, rest)))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A single `key op value` clause.
///
/// Key and value are lower-cased with spaces removed. The default value,
/// with empty key and value, stands for "no condition".
///
/// # Examples
///
/// ```
/// use fare_rules::domain::{Comparator, parse_condition};
///
/// let cond = parse_condition("Duration <= 90").unwrap();
/// assert_eq!(cond.key, "duration");
/// assert_eq!(cond.comparator, Comparator::LessEqual);
/// assert_eq!(cond.value, "90");
///
/// assert!(parse_condition("").unwrap().is_empty());
/// assert!(parse_condition("foo<>bar").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub comparator: Comparator,
    pub value: String,
}

impl Condition {
    /// Create a condition from already-normalized parts.
    pub fn new(key: impl Into<String>, comparator: Comparator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            comparator,
            value: value.into(),
        }
    }

    /// True for the "no condition" sentinel produced by an empty clause.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self {
            key: String::new(),
            comparator: Comparator::Equal,
            value: String::new(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "{}{}{}", self.key, self.comparator, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Op(Comparator),
}

fn is_text_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-')
}

/// Split a normalized clause into text runs and operator tokens.
///
/// Returns `None` on any character that belongs to neither.
fn tokenize(clause: &str) -> Option<Vec<Token<'_>>> {
    let mut tokens = Vec::with_capacity(3);
    let mut rest = clause;

    while !rest.is_empty() {
        let text_len = rest.find(|c: char| !is_text_char(c)).unwrap_or(rest.len());
        if text_len > 0 {
            tokens.push(Token::Text(&rest[..text_len]));
            rest = &rest[text_len..];
        } else {
            let (cmp, tail) = Comparator::split_prefix(rest)?;
            tokens.push(Token::Op(cmp));
            rest = tail;
        }
    }

    Some(tokens)
}

/// Parse one `key op value` clause.
///
/// The input is lower-cased and stripped of spaces first. An empty input
/// gives the sentinel condition; anything that is not exactly
/// `text operator text` is rejected.
pub fn parse_condition(raw: &str) -> Result<Condition, FareError> {
    let normalized = raw.to_lowercase().replace(' ', "");
    let clause = normalized.trim();
    if clause.is_empty() {
        return Ok(Condition::default());
    }

    match tokenize(clause).as_deref() {
        Some([Token::Text(key), Token::Op(cmp), Token::Text(value)]) => {
            Ok(Condition::new(*key, *cmp, *value))
        }
        _ => Err(FareError::InvalidCondition(raw.to_string())),
    }
}

/// Parse an `&`-separated list of clauses, keeping their order.
///
/// A single bad clause fails the whole list.
pub fn parse_conditions(raw: &str) -> Result<Vec<Condition>, FareError> {
    raw.split('&').map(parse_condition).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn text() -> impl Strategy<Value = String> {
        "[a-z0-9_:-]{1,12}"
    }

    fn operator() -> impl Strategy<Value = (&'static str, Comparator)> {
        proptest::sample::select(OPERATORS.to_vec())
    }

    proptest! {
        /// Any text, operator, text triple parses back into its parts
        #[test]
        fn well_formed_clause_parses(key in text(), (token, cmp) in operator(), value in text()) {
            let cond = parse_condition(&format!("{key}{token}{value}")).unwrap();
            prop_assert_eq!(cond, Condition::new(key, cmp, value));
        }

        /// Case and surrounding spaces do not change the result
        #[test]
        fn case_and_spaces_are_ignored(key in text(), (token, cmp) in operator(), value in text()) {
            let raw = format!("  {} {} {} ", key.to_uppercase(), token, value.to_uppercase());
            let cond = parse_condition(&raw).unwrap();
            prop_assert_eq!(cond, Condition::new(key, cmp, value));
        }

        /// Display output parses back to the same condition
        #[test]
        fn display_reparses(key in text(), (_, cmp) in operator(), value in text()) {
            let cond = Condition::new(key, cmp, value);
            prop_assert_eq!(parse_condition(&cond.to_string()).unwrap(), cond);
        }

        /// Arbitrary input never panics
        #[test]
        fn never_panics(raw in "\\PC{0,24}") {
            let _ = parse_condition(&raw);
        }
    }
}
