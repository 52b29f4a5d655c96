use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Scheduled, Shift};

/// One cell of a rendered grid. Identity is the date; cells are created
/// fresh on every grid build and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for spillover days absorbed from the adjacent months.
    pub in_current_period: bool,
}

/// A shift template paired with its concrete assignment on one date, if any.
/// Derived on every merge, never persisted; this is the unit exchanged
/// between the grid and the detail surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    pub shift: Shift,
    pub scheduled: Option<Scheduled>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Granularity {
    Month,
    Week,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Month => write!(f, "month"),
            Granularity::Week => write!(f, "week"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(Granularity::Month),
            "week" => Ok(Granularity::Week),
            _ => Err(format!("Invalid granularity: {}", s)),
        }
    }
}
