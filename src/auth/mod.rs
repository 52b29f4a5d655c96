use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CalendarItem, Preferred};

/// The caller's role flags. Two independent booleans, not an enum: the host
/// system issues them separately and the gate never assumes exclusivity, so
/// a dual-role caller simply gets the union of affordances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleClaims {
    pub employee_authorized: bool,
    pub scheduler_authorized: bool,
}

impl RoleClaims {
    pub fn employee() -> Self {
        RoleClaims {
            employee_authorized: true,
            scheduler_authorized: false,
        }
    }

    pub fn scheduler() -> Self {
        RoleClaims {
            employee_authorized: false,
            scheduler_authorized: true,
        }
    }

    pub fn is_read_only(&self) -> bool {
        !self.employee_authorized && !self.scheduler_authorized
    }
}

/// Every mutation surface the calendar can offer for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Affordance {
    ViewDetail,
    RequestVacation,
    DeletePreferred,
    AddPreferred,
    DeleteShift,
    UpdateShift,
    DeleteScheduled,
    CreateScheduled,
}

/// Decide which affordances the caller may see for one calendar item.
///
/// Purely additive per role flag. `my_preferred` is the caller's preference
/// record, if any; `employee` is the caller's employee id, used to check
/// whether the item's assignment belongs to them. Kept independent of any
/// view plumbing so dispatch and tests can call it directly.
pub fn gate(
    claims: &RoleClaims,
    item: &CalendarItem,
    my_preferred: Option<&Preferred>,
    employee: Option<Uuid>,
) -> BTreeSet<Affordance> {
    let mut permitted = BTreeSet::from([Affordance::ViewDetail]);

    if claims.employee_authorized {
        permitted.insert(Affordance::AddPreferred);

        if my_preferred.is_some_and(|preferred| preferred.shift == item.shift.id) {
            permitted.insert(Affordance::DeletePreferred);
        }

        let mine = match (&item.scheduled, employee) {
            (Some(scheduled), Some(me)) => scheduled.employee == me,
            _ => false,
        };
        if mine {
            permitted.insert(Affordance::RequestVacation);
        }
    }

    if claims.scheduler_authorized {
        permitted.insert(Affordance::UpdateShift);
        permitted.insert(Affordance::DeleteShift);
        // Re-creation semantics: always offered, an existing assignment is
        // replaced rather than blocking the form.
        permitted.insert(Affordance::CreateScheduled);

        if item.scheduled.is_some() {
            permitted.insert(Affordance::DeleteScheduled);
        }
    }

    permitted
}
