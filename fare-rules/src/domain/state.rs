//! Travel states: the nodes of the fare-rule graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::{Comparator, parse_conditions};
use super::error::FareError;

/// A travel context filter.
///
/// Each field is an optional equality constraint; an empty field means the
/// state does not care about it. A state is built by folding equality
/// conditions, each field being set by at most one of them.
///
/// # Examples
///
/// ```
/// use fare_rules::domain::{State, parse_state};
///
/// let state = parse_state("line=A&zone=1").unwrap();
/// assert_eq!(state.line, "a");
/// assert_eq!(state.zone, "1");
/// assert!(state.mode.is_empty());
///
/// assert_eq!(parse_state("*").unwrap(), State::default());
/// assert!(parse_state("line=A&line=B").is_err());
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct State {
    pub line: String,
    pub zone: String,
    pub mode: String,
    pub stop_area: String,
    pub network: String,
    pub ticket: String,
}

impl State {
    /// True when no field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_empty())
    }

    /// Field names as written in rule files, paired with their values.
    fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("line", self.line.as_str()),
            ("zone", self.zone.as_str()),
            ("mode", self.mode.as_str()),
            ("stoparea", self.stop_area.as_str()),
            ("network", self.network.as_str()),
            ("ticket", self.ticket.as_str()),
        ]
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "line" => Some(&mut self.line),
            "zone" => Some(&mut self.zone),
            "mode" => Some(&mut self.mode),
            "stoparea" => Some(&mut self.stop_area),
            "network" => Some(&mut self.network),
            "ticket" => Some(&mut self.ticket),
            _ => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconstrained() {
            return f.write_str("*");
        }
        let mut first = true;
        for (key, value) in self.fields() {
            if value.is_empty() {
                continue;
            }
            if !first {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Parse a state description such as `line=a&zone=1`.
///
/// An empty string or `*` is the unconstrained state. Every condition must
/// be an equality on one of `line`, `zone`, `mode`, `stoparea`, `network`
/// or `ticket`, and no key may appear twice.
pub fn parse_state(raw: &str) -> Result<State, FareError> {
    let mut state = State::default();
    if raw.is_empty() || raw == "*" {
        return Ok(state);
    }

    for cond in parse_conditions(raw)? {
        if cond.comparator != Comparator::Equal {
            return Err(FareError::InvalidKey(format!(
                "state condition {cond} must use '='"
            )));
        }
        let field = state
            .field_mut(&cond.key)
            .ok_or_else(|| FareError::InvalidKey(format!("unknown state key {:?}", cond.key)))?;
        if !field.is_empty() {
            return Err(FareError::InvalidKey(format!(
                "state key {} set twice",
                cond.key
            )));
        }
        *field = cond.value;
    }

    Ok(state)
}
