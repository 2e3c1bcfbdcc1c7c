//! Time-to-live clauses (`10 day`, `500 millisecond`).

use std::time::Duration;

use crate::{ast::TtlClause, error::QueryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlUnit {
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Nanosecond,
}

impl TtlUnit {
    /// Case-insensitive unit lookup. Only the singular keywords are accepted.
    pub fn from_keyword(word: &str) -> Option<Self> {
        let unit = match word.to_ascii_lowercase().as_str() {
            "day" => Self::Day,
            "hour" => Self::Hour,
            "minute" => Self::Minute,
            "second" => Self::Second,
            "millisecond" => Self::Millisecond,
            "nanosecond" => Self::Nanosecond,
            _ => return None,
        };
        Some(unit)
    }

    /// Duration of `amount` units, or `None` on overflow.
    pub fn duration(&self, amount: u64) -> Option<Duration> {
        let secs = |per: u64| amount.checked_mul(per).map(Duration::from_secs);
        match self {
            Self::Day => secs(86_400),
            Self::Hour => secs(3_600),
            Self::Minute => secs(60),
            Self::Second => Some(Duration::from_secs(amount)),
            Self::Millisecond => Some(Duration::from_millis(amount)),
            Self::Nanosecond => Some(Duration::from_nanos(amount)),
        }
    }
}

/// Turns a parsed TTL clause into a duration.
///
/// Unknown units fail with [`QueryError::UnrecognizedTtlUnit`]; negative
/// amounts and overflow with [`QueryError::InvalidValue`].
pub fn resolve(clause: &TtlClause) -> Result<Duration, QueryError> {
    let unit = TtlUnit::from_keyword(&clause.unit)
        .ok_or_else(|| QueryError::UnrecognizedTtlUnit(clause.unit.clone()))?;
    let amount = u64::try_from(clause.amount).map_err(|_| {
        QueryError::InvalidValue(format!(
            "TTL amount must not be negative, got {} at {}",
            clause.amount, clause.position
        ))
    })?;
    unit.duration(amount).ok_or_else(|| {
        QueryError::InvalidValue(format!(
            "TTL of {} {} overflows a duration",
            clause.amount, clause.unit
        ))
    })
}
