use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{CalendarCell, CalendarItem, Scheduled, Shift};

/// Attach every applicable shift template, and its concrete assignment if
/// one exists, to each cell of a grid.
///
/// A shift applies to a cell when its weekday matches the cell's date; a
/// Scheduled pairs with the shift when it references it and falls on the
/// cell's exact date. A cell can carry zero, one or several items, since
/// multiple templates may recur on the same weekday.
///
/// The index is recomputed wholesale whenever the backing collections
/// change; nothing here is patched incrementally, so a published index can
/// never mix records from two different snapshots.
pub fn merge_index(
    cells: &[CalendarCell],
    shifts: &[Shift],
    scheduled: &[Scheduled],
) -> BTreeMap<NaiveDate, Vec<CalendarItem>> {
    let mut index = BTreeMap::new();

    for cell in cells {
        let mut items: Vec<CalendarItem> = shifts
            .iter()
            .filter(|shift| shift.day == cell.date.weekday())
            .map(|shift| CalendarItem {
                shift: shift.clone(),
                scheduled: scheduled
                    .iter()
                    .find(|entry| entry.shift == shift.id && entry.date == cell.date)
                    .cloned(),
            })
            .collect();

        // Deterministic cell ordering: by start time, id as tie-breaker.
        items.sort_by(|a, b| {
            (a.shift.shift_start, a.shift.id).cmp(&(b.shift.shift_start, b.shift.id))
        });

        index.insert(cell.date, items);
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use crate::models::{ScheduledInput, Slot};

    fn shift_on(day: Weekday, start_hour: u32) -> Shift {
        Shift {
            id: Uuid::new_v4(),
            position: "server".to_string(),
            slot: Slot::Morning,
            location: "front".to_string(),
            day,
            shift_start: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
            shift_end: NaiveTime::from_hms_opt(start_hour + 8, 0, 0).unwrap(),
        }
    }

    fn scheduled_for(shift: &Shift, date: NaiveDate) -> Scheduled {
        Scheduled {
            id: Uuid::new_v4(),
            shift: shift.id,
            employee: Uuid::new_v4(),
            scheduler: Uuid::new_v4(),
            date,
            created_at: date.and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn two_templates_one_assignment_yields_one_paired_item() {
        // 2021-09-06 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2021, 9, 6).unwrap();
        let cells = [CalendarCell {
            date: monday,
            in_current_period: true,
        }];

        let early = shift_on(Weekday::Mon, 6);
        let late = shift_on(Weekday::Mon, 14);
        let assignment = scheduled_for(&late, monday);

        let index = merge_index(&cells, &[late.clone(), early.clone()], &[assignment.clone()]);

        let items = &index[&monday];
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].shift, early);
        assert_eq!(items[0].scheduled, None);
        assert_eq!(items[1].shift, late);
        assert_eq!(items[1].scheduled, Some(assignment));
    }

    #[test]
    fn assignment_on_another_date_does_not_attach() {
        let monday = NaiveDate::from_ymd_opt(2021, 9, 6).unwrap();
        let next_monday = NaiveDate::from_ymd_opt(2021, 9, 13).unwrap();
        let cells = [CalendarCell {
            date: monday,
            in_current_period: true,
        }];

        let shift = shift_on(Weekday::Mon, 9);
        let other_week = scheduled_for(&shift, next_monday);

        let index = merge_index(&cells, &[shift], &[other_week]);
        assert_eq!(index[&monday][0].scheduled, None);
    }

    #[test]
    fn weekday_mismatch_leaves_cell_empty() {
        let monday = NaiveDate::from_ymd_opt(2021, 9, 6).unwrap();
        let cells = [CalendarCell {
            date: monday,
            in_current_period: true,
        }];

        let index = merge_index(&cells, &[shift_on(Weekday::Tue, 9)], &[]);
        assert!(index[&monday].is_empty());
    }

    #[test]
    fn every_cell_gets_an_entry() {
        let cells = crate::grid::build_week_grid(
            NaiveDate::from_ymd_opt(2021, 9, 6).unwrap(),
            Weekday::Sun,
        );
        let index = merge_index(&cells, &[], &[]);
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn scheduled_input_shape_is_stable() {
        let input = ScheduledInput {
            shift: Uuid::nil(),
            employee: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2021, 9, 6).unwrap(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["date"], "2021-09-06");
    }
}
