//! Domain types for the fare-rule model.
//!
//! This module holds the rule language (conditions and states), the graph
//! edges built from it (transitions), priced tickets and origin-destination
//! keys. Everything here works on already-split rows and does no I/O; types
//! enforce their invariants at construction time.

mod condition;
mod error;
mod od;
mod state;
mod ticket;
mod transition;

pub use condition::{Comparator, Condition, parse_condition, parse_conditions};
pub use error::FareError;
pub use od::{OD_MIN_COLUMNS, OdFare, OdKey, OdKind};
pub use state::{State, parse_state};
pub use ticket::{DateInterval, PRICE_COLUMNS, PriceRowError, Ticket};
pub use transition::{TRANSITION_COLUMNS, Transition, TransitionRecord};
