#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime, Weekday};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::job::en::Position;

use shiftcal::Config;
use shiftcal::models::{Granularity, ShiftInput, Slot};
use shiftcal::services::InMemoryBackend;

pub fn test_config() -> Config {
    Config {
        week_start: Weekday::Sun,
        default_view: Granularity::Month,
        environment: "test".to_string(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

pub fn shift_input(day: Weekday, start_hour: u32, slot: Slot) -> ShiftInput {
    ShiftInput {
        position: Position().fake(),
        slot,
        location: CityName().fake(),
        day,
        shift_start: time(start_hour),
        shift_end: time((start_hour + 8) % 24),
    }
}

/// Backend with one Monday-morning template and a two-person roster.
pub fn seeded_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend.seed_employee("Dana");
    backend.seed_employee("Riley");
    backend.seed_shift(shift_input(Weekday::Mon, 6, Slot::Morning));
    backend
}
