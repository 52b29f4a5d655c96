use chrono::{NaiveDate, NaiveTime, Weekday};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::preferred::{MAX_RANK, MIN_RANK};
use crate::models::{CalendarItem, Preferred, PreferredInput, ScheduledInput, ShiftInput, Slot};
use crate::services::{PreferredService, ScheduledService, ShiftService};

/// Employee form: rank an interest in the selected item's shift template.
/// Prefilled from the caller's existing record so a resubmission updates it
/// instead of duplicating; validation runs locally before any service call.
#[derive(Debug, Clone)]
pub struct AddPreferredForm {
    shift: Uuid,
    existing: Option<Uuid>,
    pub rank: Option<u8>,
}

impl AddPreferredForm {
    pub fn prefill(item: &CalendarItem, my_preferred: Option<&Preferred>) -> Self {
        let existing = my_preferred.filter(|preferred| preferred.shift == item.shift.id);

        AddPreferredForm {
            shift: item.shift.id,
            existing: existing.map(|preferred| preferred.id),
            rank: existing.map(|preferred| preferred.rank),
        }
    }

    pub fn validate(&self) -> Result<PreferredInput, AppError> {
        let rank = self
            .rank
            .ok_or_else(|| AppError::validation("rank is required"))?;

        if !(MIN_RANK..=MAX_RANK).contains(&rank) {
            return Err(AppError::validation(format!(
                "rank must be between {} and {}",
                MIN_RANK, MAX_RANK
            )));
        }

        Ok(PreferredInput {
            shift: self.shift,
            rank,
        })
    }

    /// On failure the form keeps its entered values; the caller may retry
    /// or cancel. Success means the navigator must reload.
    pub async fn submit(&self, service: &dyn PreferredService) -> Result<(), AppError> {
        let input = self.validate()?;

        service
            .create_or_update_preferred(self.existing, input)
            .await
            .map_err(AppError::MutationFailure)?;

        log::info!("Preferred saved for shift {}", self.shift);
        Ok(())
    }
}

/// Scheduler form: edit the selected shift template, every field prefilled
/// from its current values.
#[derive(Debug, Clone)]
pub struct UpdateShiftForm {
    shift: Uuid,
    pub position: String,
    pub slot: Option<Slot>,
    pub location: String,
    pub day: Option<Weekday>,
    pub shift_start: Option<NaiveTime>,
    pub shift_end: Option<NaiveTime>,
}

impl UpdateShiftForm {
    pub fn prefill(item: &CalendarItem) -> Self {
        UpdateShiftForm {
            shift: item.shift.id,
            position: item.shift.position.clone(),
            slot: Some(item.shift.slot),
            location: item.shift.location.clone(),
            day: Some(item.shift.day),
            shift_start: Some(item.shift.shift_start),
            shift_end: Some(item.shift.shift_end),
        }
    }

    pub fn validate(&self) -> Result<ShiftInput, AppError> {
        if self.position.trim().is_empty() {
            return Err(AppError::validation("position is required"));
        }
        if self.location.trim().is_empty() {
            return Err(AppError::validation("location is required"));
        }

        Ok(ShiftInput {
            position: self.position.trim().to_string(),
            slot: self.slot.ok_or_else(|| AppError::validation("slot is required"))?,
            location: self.location.trim().to_string(),
            day: self.day.ok_or_else(|| AppError::validation("day is required"))?,
            shift_start: self
                .shift_start
                .ok_or_else(|| AppError::validation("shift start is required"))?,
            shift_end: self
                .shift_end
                .ok_or_else(|| AppError::validation("shift end is required"))?,
        })
    }

    pub async fn submit(&self, service: &dyn ShiftService) -> Result<(), AppError> {
        let input = self.validate()?;

        service
            .create_or_update_shift(Some(self.shift), input)
            .await
            .map_err(AppError::MutationFailure)?;

        log::info!("Shift {} updated", self.shift);
        Ok(())
    }
}

/// Scheduler form: assign an employee to the selected item's shift on the
/// selected date. Prefilled with the currently assigned employee, if any;
/// submitting over an existing assignment replaces it.
#[derive(Debug, Clone)]
pub struct CreateScheduledForm {
    shift: Uuid,
    date: NaiveDate,
    pub employee: Option<Uuid>,
}

impl CreateScheduledForm {
    pub fn prefill(item: &CalendarItem, date: NaiveDate) -> Self {
        CreateScheduledForm {
            shift: item.shift.id,
            date,
            employee: item.scheduled.as_ref().map(|scheduled| scheduled.employee),
        }
    }

    pub fn validate(&self) -> Result<ScheduledInput, AppError> {
        Ok(ScheduledInput {
            shift: self.shift,
            employee: self
                .employee
                .ok_or_else(|| AppError::validation("employee is required"))?,
            date: self.date,
        })
    }

    pub async fn submit(&self, service: &dyn ScheduledService) -> Result<(), AppError> {
        let input = self.validate()?;

        service
            .create_scheduled(input)
            .await
            .map_err(AppError::MutationFailure)?;

        log::info!("Scheduled created for shift {} on {}", self.shift, self.date);
        Ok(())
    }
}
