use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::models::CalendarCell;

/// Offset of `day` from the configured first weekday of the week, 0..=6.
pub fn days_from_week_start(day: Weekday, week_start: Weekday) -> u32 {
    (7 + day.num_days_from_monday() - week_start.num_days_from_monday()) % 7
}

/// First calendar day of `reference`'s month.
fn first_of_month(reference: NaiveDate) -> NaiveDate {
    reference - Days::new(u64::from(reference.day0()))
}

/// Build the month grid around `reference`.
///
/// The in-month days are preceded by enough of the previous month's last
/// days for the first cell to land on `week_start`, then padded with the
/// next month's first days up to 35 cells, or 42 when the lead-in plus the
/// month already exceed 35. Every row is therefore a complete 7-day week.
/// Total over any valid date, including month and year rollovers, and
/// deterministic: the same reference always yields the identical sequence.
pub fn build_month_grid(reference: NaiveDate, week_start: Weekday) -> Vec<CalendarCell> {
    let first_day = first_of_month(reference);
    let last_day = first_day + Months::new(1) - Days::new(1);

    let lead = days_from_week_start(first_day.weekday(), week_start);
    let shown: u32 = if lead + last_day.day() <= 35 { 35 } else { 42 };
    let grid_start = first_day - Days::new(u64::from(lead));

    (0..shown)
        .map(|offset| {
            let date = grid_start + Days::new(u64::from(offset));
            CalendarCell {
                date,
                in_current_period: date >= first_day && date <= last_day,
            }
        })
        .collect()
}

/// Build the 7-day week grid containing `reference`, starting on
/// `week_start`. Every cell is in-period: a week view has no spillover.
pub fn build_week_grid(reference: NaiveDate, week_start: Weekday) -> Vec<CalendarCell> {
    let lead = days_from_week_start(reference.weekday(), week_start);
    let grid_start = reference - Days::new(u64::from(lead));

    (0..7)
        .map(|offset| CalendarCell {
            date: grid_start + Days::new(offset),
            in_current_period: true,
        })
        .collect()
}
