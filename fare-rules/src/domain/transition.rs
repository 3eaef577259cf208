//! Transitions: the edges of the fare-rule graph.

use serde::{Deserialize, Serialize};

use super::condition::{Condition, parse_conditions};
use super::error::FareError;
use super::state::{State, parse_state};

/// Number of columns in a transition row.
pub const TRANSITION_COLUMNS: usize = 6;

/// Global condition token that asks for the reverse edge as well.
const SYMMETRIC: &str = "symetric";

/// A fare rule between two states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Conditions checked when entering the edge.
    pub start_conditions: Vec<Condition>,
    /// Conditions checked when leaving the edge.
    pub end_conditions: Vec<Condition>,
    /// Free-form condition on the whole journey, empty if none.
    pub global_condition: String,
    /// Key into the price table.
    pub ticket_key: String,
}

impl Transition {
    /// The same rule with start and end conditions swapped.
    pub fn mirrored(&self) -> Self {
        Self {
            start_conditions: self.end_conditions.clone(),
            end_conditions: self.start_conditions.clone(),
            global_condition: self.global_condition.clone(),
            ticket_key: self.ticket_key.clone(),
        }
    }
}

/// A transition with the states it connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub start: State,
    pub end: State,
    pub transition: Transition,
}

impl TransitionRecord {
    /// Build the records described by one transition row.
    ///
    /// Layout: `start_state, end_state, start_conditions, end_conditions,
    /// global_conditions, ticket_key`. When the global conditions contain
    /// `symetric`, a second record with swapped conditions follows the
    /// first.
    ///
    /// # Examples
    ///
    /// ```
    /// use fare_rules::domain::TransitionRecord;
    ///
    /// let row = ["line=A", "line=B", "duration<90", "", "symetric", "T1"].map(String::from);
    /// let records = TransitionRecord::from_row(&row).unwrap();
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(
    ///     records[0].transition.start_conditions,
    ///     records[1].transition.end_conditions
    /// );
    /// ```
    pub fn from_row(fields: &[String; TRANSITION_COLUMNS]) -> Result<Vec<Self>, FareError> {
        let [start_state, end_state, start_conditions, end_conditions, global, ticket_key] = fields;

        let start = parse_state(start_state)?;
        let end = parse_state(end_state)?;

        let (global_condition, symmetric) = split_global_conditions(global);
        let transition = Transition {
            start_conditions: parse_conditions(start_conditions)?,
            end_conditions: parse_conditions(end_conditions)?,
            global_condition,
            ticket_key: ticket_key.trim().to_string(),
        };

        let mirrored = symmetric.then(|| transition.mirrored());
        let mut records = vec![TransitionRecord {
            start: start.clone(),
            end: end.clone(),
            transition,
        }];
        if let Some(transition) = mirrored {
            records.push(TransitionRecord {
                start,
                end,
                transition,
            });
        }
        Ok(records)
    }
}

/// Separate the `symetric` flag from the global condition.
///
/// When several other tokens are present the last one is kept.
fn split_global_conditions(raw: &str) -> (String, bool) {
    let mut global_condition = String::new();
    let mut symmetric = false;

    for token in raw.trim().split('&') {
        if token == SYMMETRIC {
            symmetric = true;
        } else {
            global_condition = token.to_string();
        }
    }

    (global_condition, symmetric)
}
