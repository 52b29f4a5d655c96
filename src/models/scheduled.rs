use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One concrete assignment of an employee to a shift template on a specific
/// date. Never updated in place; re-creating an assignment for the same
/// (shift, date) replaces the old record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheduled {
    pub id: Uuid,
    pub shift: Uuid,
    pub employee: Uuid,
    pub scheduler: Uuid,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// The scheduler reference is supplied by the service from the caller's
/// identity, not by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInput {
    pub shift: Uuid,
    pub employee: Uuid,
    pub date: NaiveDate,
}
