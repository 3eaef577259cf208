//! Tickets and their validity periods.

use std::fmt;
use std::num::ParseIntError;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of columns in a price row: key, start, end, price, label.
pub const PRICE_COLUMNS: usize = 5;

/// Date format of the price file (`20120101`).
const DATE_FORMAT: &str = "%Y%m%d";

/// Error returned when a price row cannot be turned into a ticket.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceRowError {
    /// Price rows have a fixed layout
    #[error("expected 5 columns, found {0}")]
    ColumnCount(usize),

    /// Validity dates must be `YYYYMMDD`
    #[error("invalid date {value:?}: {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },

    /// Prices are integers in minor currency units
    #[error("invalid price {value:?}: {source}")]
    Price {
        value: String,
        source: ParseIntError,
    },
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True if `date` falls within the interval, both ends included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A priced ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub fare_key: String,
    pub label: String,
    /// Price in minor currency units (cents).
    pub price: i32,
    pub extra_label: String,
}

impl Ticket {
    /// Build a ticket and its validity period from a price row.
    ///
    /// The row layout is `fare_key;start;end;price;label`. The label is
    /// also used as the extra label.
    ///
    /// # Examples
    ///
    /// ```
    /// use fare_rules::domain::Ticket;
    ///
    /// let row = ["T1", "20120101", "20121231", "150", "Ticket One"].map(String::from);
    /// let (interval, ticket) = Ticket::from_price_row(&row).unwrap();
    /// assert_eq!(ticket.price, 150);
    /// assert_eq!(ticket.extra_label, "Ticket One");
    /// assert_eq!(interval.start.to_string(), "2012-01-01");
    /// ```
    pub fn from_price_row(fields: &[String]) -> Result<(DateInterval, Ticket), PriceRowError> {
        let [fare_key, start, end, price, label] = fields else {
            return Err(PriceRowError::ColumnCount(fields.len()));
        };

        let interval = DateInterval::new(parse_date(start)?, parse_date(end)?);
        let price = price.trim();
        let price = price.parse::<i32>().map_err(|source| PriceRowError::Price {
            value: price.to_string(),
            source,
        })?;

        let ticket = Ticket {
            fare_key: fare_key.trim().to_string(),
            label: label.clone(),
            price,
            extra_label: label.clone(),
        };
        Ok((interval, ticket))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, PriceRowError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|source| PriceRowError::Date {
        value: raw.to_string(),
        source,
    })
}
