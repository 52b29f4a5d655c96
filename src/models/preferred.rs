use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = 3;

/// An employee's ranked interest in a shift template. At most one record
/// exists per (employee, shift) pair; a second submission updates the
/// existing record instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferred {
    pub id: Uuid,
    pub shift: Uuid,
    pub employee: Uuid,
    pub rank: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredInput {
    pub shift: Uuid,
    pub rank: u8,
}
