//! Row and marker types for the SQLite implementation.

use apr_core::models::AggregateRow;
use std::{fmt::Display, str::FromStr};

#[derive(sqlx::FromRow)]
pub(crate) struct AggregateRecord {
    pub date: i64,
    pub account: String,
    pub data: sqlx::types::Json<AggregateRow>,
}

/// Position of the last row of a page, rendered as `<unix day>|<account>`.
///
/// The next page resumes strictly after this position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Unix timestamp of the start of the row's day
    pub date: i64,
    /// The row's account
    pub account: String,
}

impl Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.date, self.account)
    }
}

impl FromStr for Marker {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, account) = s.split_once('|').ok_or(())?;
        if account.is_empty() {
            return Err(());
        }
        Ok(Self {
            date: date.parse().map_err(|_| ())?,
            account: account.to_string(),
        })
    }
}

impl From<&AggregateRecord> for Marker {
    fn from(record: &AggregateRecord) -> Self {
        Self {
            date: record.date,
            account: record.account.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Marker;

    #[test]
    fn marker_text() {
        let marker = Marker {
            date: 1609804800,
            account: "rAccount|1".to_string(),
        };
        assert_eq!(marker.to_string(), "1609804800|rAccount|1");
        assert_eq!("1609804800|rAccount|1".parse::<Marker>(), Ok(marker));
    }

    #[test]
    fn malformed_markers() {
        assert!("".parse::<Marker>().is_err());
        assert!("1609804800".parse::<Marker>().is_err());
        assert!("1609804800|".parse::<Marker>().is_err());
        assert!("yesterday|rAccount".parse::<Marker>().is_err());
    }
}
