use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Granularity;

/// Addressable view state: granularity plus an ISO-8601 calendar date,
/// encoded as `month/2021-09-06` so any month or week view is bookmarkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub granularity: Granularity,
    pub date: NaiveDate,
}

impl Route {
    pub fn encode(&self) -> String {
        format!("{}/{}", self.granularity, self.date.format("%Y-%m-%d"))
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let (granularity, date) = raw
            .trim_matches('/')
            .split_once('/')
            .ok_or_else(|| AppError::validation(format!("malformed route: {}", raw)))?;

        Ok(Route {
            granularity: Granularity::from_str(granularity).map_err(AppError::validation)?,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|err| AppError::validation(format!("bad route date {}: {}", date, err)))?,
        })
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}
