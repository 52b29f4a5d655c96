use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring template slot: position, weekday and time range that can be
/// offered week after week. Not a single day's occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,
    pub position: String,
    pub slot: Slot,
    pub location: String,
    pub day: Weekday,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftInput {
    pub position: String,
    pub slot: Slot,
    pub location: String,
    pub day: Weekday,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Morning => write!(f, "morning"),
            Slot::Afternoon => write!(f, "afternoon"),
            Slot::Evening => write!(f, "evening"),
            Slot::Night => write!(f, "night"),
        }
    }
}

impl std::str::FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(Slot::Morning),
            "afternoon" => Ok(Slot::Afternoon),
            "evening" => Ok(Slot::Evening),
            "night" => Ok(Slot::Night),
            _ => Err(format!("Invalid slot: {}", s)),
        }
    }
}

impl Shift {
    pub fn from_input(id: Uuid, input: ShiftInput) -> Self {
        Shift {
            id,
            position: input.position,
            slot: input.slot,
            location: input.location,
            day: input.day,
            shift_start: input.shift_start,
            shift_end: input.shift_end,
        }
    }
}
