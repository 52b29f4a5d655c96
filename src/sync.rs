use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::{Affordance, RoleClaims, gate};
use crate::error::AppError;
use crate::forms::{AddPreferredForm, CreateScheduledForm, UpdateShiftForm};
use crate::models::{CalendarItem, Employee, Preferred};
use crate::navigator::CalendarNavigator;
use crate::services::{EmployeeService, PreferredService, ScheduleServices, ShiftService};

/// Downward message: a grid cell was activated and the detail surface
/// should adopt its item.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSelection {
    pub item: CalendarItem,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeMutationKind {
    RequestVacation,
    DeletePreferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMutationKind {
    DeleteShift,
    DeleteScheduled,
}

/// Upward message from the detail surface. A tagged union rather than an
/// ambient event bus, so every handler stays exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum UpwardMessage {
    Employee {
        kind: EmployeeMutationKind,
        item: CalendarItem,
        preferred: Option<Preferred>,
    },
    Scheduler {
        kind: SchedulerMutationKind,
        item: CalendarItem,
    },
}

/// Grid half of the cell/detail channel.
pub struct GridEndpoint {
    selection_tx: mpsc::UnboundedSender<CellSelection>,
    upward_rx: mpsc::UnboundedReceiver<UpwardMessage>,
}

impl GridEndpoint {
    pub fn select_cell(&self, item: CalendarItem, date: NaiveDate) {
        let _ = self.selection_tx.send(CellSelection { item, date });
    }

    pub async fn next_upward(&mut self) -> Option<UpwardMessage> {
        self.upward_rx.recv().await
    }
}

/// Detail half of the cell/detail channel.
pub struct DetailEndpoint {
    selection_rx: mpsc::UnboundedReceiver<CellSelection>,
    upward_tx: mpsc::UnboundedSender<UpwardMessage>,
}

impl DetailEndpoint {
    pub async fn next_selection(&mut self) -> Option<CellSelection> {
        self.selection_rx.recv().await
    }

    pub fn upward_sender(&self) -> mpsc::UnboundedSender<UpwardMessage> {
        self.upward_tx.clone()
    }
}

/// Message-passing link between a calendar grid and its detail/editor
/// surface. No shared mutable state crosses it in either direction.
pub fn detail_channel() -> (GridEndpoint, DetailEndpoint) {
    let (selection_tx, selection_rx) = mpsc::unbounded_channel();
    let (upward_tx, upward_rx) = mpsc::unbounded_channel();

    (
        GridEndpoint {
            selection_tx,
            upward_rx,
        },
        DetailEndpoint {
            selection_rx,
            upward_tx,
        },
    )
}

/// State of the detail/editor surface: the adopted selection, per-role
/// options menus and the three mutation forms. Forms are populated from the
/// item's values once, when opened, never re-synced while the user types.
pub struct DetailSurface {
    claims: RoleClaims,
    caller_employee: Option<Uuid>,
    my_preferred: Option<Preferred>,
    selection: Option<CellSelection>,
    employees: Vec<Employee>,
    pub employee_menu_open: bool,
    pub scheduler_menu_open: bool,
    pub add_preferred_form: Option<AddPreferredForm>,
    pub update_shift_form: Option<UpdateShiftForm>,
    pub create_scheduled_form: Option<CreateScheduledForm>,
    upward_tx: mpsc::UnboundedSender<UpwardMessage>,
}

impl DetailSurface {
    pub fn new(
        claims: RoleClaims,
        caller_employee: Option<Uuid>,
        upward_tx: mpsc::UnboundedSender<UpwardMessage>,
    ) -> Self {
        DetailSurface {
            claims,
            caller_employee,
            my_preferred: None,
            selection: None,
            employees: Vec::new(),
            employee_menu_open: false,
            scheduler_menu_open: false,
            add_preferred_form: None,
            update_shift_form: None,
            create_scheduled_form: None,
            upward_tx,
        }
    }

    /// Role change (login/logout) while the surface is open.
    pub fn set_claims(&mut self, claims: RoleClaims) {
        self.claims = claims;
        if !claims.employee_authorized {
            self.employee_menu_open = false;
            self.add_preferred_form = None;
        }
        if !claims.scheduler_authorized {
            self.scheduler_menu_open = false;
            self.update_shift_form = None;
            self.create_scheduled_form = None;
        }
    }

    pub fn set_my_preferred(&mut self, preferred: Option<Preferred>) {
        self.my_preferred = preferred;
    }

    pub fn selection(&self) -> Option<&CellSelection> {
        self.selection.as_ref()
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Which affordances the current caller gets for the selected item.
    pub fn permitted(&self) -> std::collections::BTreeSet<Affordance> {
        match &self.selection {
            Some(selection) => gate(
                &self.claims,
                &selection.item,
                self.my_preferred.as_ref(),
                self.caller_employee,
            ),
            None => std::collections::BTreeSet::new(),
        }
    }

    /// Adopt a selection: drop any stale forms and open the options menu
    /// for each authorized role, as the grid cell hand-off demands.
    pub fn on_cell_selected(&mut self, selection: CellSelection) {
        self.selection = Some(selection);
        self.add_preferred_form = None;
        self.update_shift_form = None;
        self.create_scheduled_form = None;
        self.employee_menu_open = self.claims.employee_authorized;
        self.scheduler_menu_open = self.claims.scheduler_authorized;
    }

    pub fn open_add_preferred_form(&mut self) -> Result<(), AppError> {
        let form = {
            let selection = self.require_affordance(Affordance::AddPreferred)?;
            AddPreferredForm::prefill(&selection.item, self.my_preferred.as_ref())
        };
        self.add_preferred_form = Some(form);
        Ok(())
    }

    pub fn open_update_shift_form(&mut self) -> Result<(), AppError> {
        let form = {
            let selection = self.require_affordance(Affordance::UpdateShift)?;
            UpdateShiftForm::prefill(&selection.item)
        };
        self.update_shift_form = Some(form);
        Ok(())
    }

    /// Also pulls the employee roster, which only this form needs.
    pub async fn open_create_scheduled_form(
        &mut self,
        roster: &dyn EmployeeService,
    ) -> Result<(), AppError> {
        let selection = self.require_affordance(Affordance::CreateScheduled)?;
        let form = CreateScheduledForm::prefill(&selection.item, selection.date);

        self.employees = roster
            .fetch_all_employees()
            .await
            .map_err(AppError::FetchFailure)?;
        self.create_scheduled_form = Some(form);
        Ok(())
    }

    /// Emit an employee mutation upward. Closes the employee options menu
    /// as an explicit side effect of any upward message.
    pub fn emit_employee(&mut self, kind: EmployeeMutationKind) -> Result<(), AppError> {
        let affordance = match kind {
            EmployeeMutationKind::RequestVacation => Affordance::RequestVacation,
            EmployeeMutationKind::DeletePreferred => Affordance::DeletePreferred,
        };
        let selection = self.require_affordance(affordance)?;

        let _ = self.upward_tx.send(UpwardMessage::Employee {
            kind,
            item: selection.item.clone(),
            preferred: self.my_preferred.clone(),
        });
        self.employee_menu_open = false;
        Ok(())
    }

    /// Emit a scheduler mutation upward; closes the scheduler options menu.
    pub fn emit_scheduler(&mut self, kind: SchedulerMutationKind) -> Result<(), AppError> {
        let affordance = match kind {
            SchedulerMutationKind::DeleteShift => Affordance::DeleteShift,
            SchedulerMutationKind::DeleteScheduled => Affordance::DeleteScheduled,
        };
        let selection = self.require_affordance(affordance)?;

        let _ = self.upward_tx.send(UpwardMessage::Scheduler {
            kind,
            item: selection.item.clone(),
        });
        self.scheduler_menu_open = false;
        Ok(())
    }

    /// Submit the open add-preferred form. On success the form closes and
    /// the caller must reload the navigator; on failure the form stays open
    /// with its entered values intact.
    pub async fn submit_add_preferred(
        &mut self,
        service: &dyn PreferredService,
    ) -> Result<(), AppError> {
        let form = self
            .add_preferred_form
            .as_ref()
            .ok_or_else(|| AppError::denied("add-preferred form is not open"))?;
        form.submit(service).await?;
        self.add_preferred_form = None;
        Ok(())
    }

    pub async fn submit_update_shift(&mut self, service: &dyn ShiftService) -> Result<(), AppError> {
        let form = self
            .update_shift_form
            .as_ref()
            .ok_or_else(|| AppError::denied("update-shift form is not open"))?;
        form.submit(service).await?;
        self.update_shift_form = None;
        Ok(())
    }

    pub async fn submit_create_scheduled(
        &mut self,
        service: &dyn crate::services::ScheduledService,
    ) -> Result<(), AppError> {
        let form = self
            .create_scheduled_form
            .as_ref()
            .ok_or_else(|| AppError::denied("create-scheduled form is not open"))?;
        form.submit(service).await?;
        self.create_scheduled_form = None;
        Ok(())
    }

    fn require_affordance(&self, affordance: Affordance) -> Result<&CellSelection, AppError> {
        let selection = self
            .selection
            .as_ref()
            .ok_or_else(|| AppError::denied("no cell is selected"))?;

        let permitted = gate(
            &self.claims,
            &selection.item,
            self.my_preferred.as_ref(),
            self.caller_employee,
        );
        if !permitted.contains(&affordance) {
            return Err(AppError::denied(format!(
                "affordance {:?} is not permitted",
                affordance
            )));
        }

        Ok(selection)
    }
}

/// Maps upward messages onto service calls and triggers the full
/// reload-and-rebuild cycle on success. Re-checks the gate before every
/// call: a disallowed kind arriving here is a contract violation, not a
/// user error.
pub struct MutationDispatcher {
    services: ScheduleServices,
    navigator: Arc<CalendarNavigator>,
    caller_employee: Option<Uuid>,
}

impl MutationDispatcher {
    pub fn new(
        services: ScheduleServices,
        navigator: Arc<CalendarNavigator>,
        caller_employee: Option<Uuid>,
    ) -> Self {
        MutationDispatcher {
            services,
            navigator,
            caller_employee,
        }
    }

    pub async fn dispatch(&self, message: UpwardMessage) -> Result<(), AppError> {
        let claims = self.services.roles.current_role();

        match message {
            UpwardMessage::Employee {
                kind,
                item,
                preferred,
            } => {
                let affordance = match kind {
                    EmployeeMutationKind::RequestVacation => Affordance::RequestVacation,
                    EmployeeMutationKind::DeletePreferred => Affordance::DeletePreferred,
                };
                let permitted = gate(&claims, &item, preferred.as_ref(), self.caller_employee);
                if !permitted.contains(&affordance) {
                    return Err(AppError::denied(format!(
                        "employee mutation {:?} is not permitted",
                        kind
                    )));
                }

                match kind {
                    // A vacation request releases the caller's assignment;
                    // the gate has already proven the assignment is theirs.
                    EmployeeMutationKind::RequestVacation => {
                        let scheduled = item
                            .scheduled
                            .as_ref()
                            .ok_or_else(|| AppError::denied("no assignment to release"))?;
                        self.services
                            .scheduled
                            .delete_scheduled(scheduled.id)
                            .await
                            .map_err(AppError::MutationFailure)?;
                    }
                    EmployeeMutationKind::DeletePreferred => {
                        let preferred = preferred
                            .as_ref()
                            .ok_or_else(|| AppError::denied("no preference to delete"))?;
                        self.services
                            .preferred
                            .delete_preferred(preferred.id)
                            .await
                            .map_err(AppError::MutationFailure)?;
                    }
                }
            }
            UpwardMessage::Scheduler { kind, item } => {
                let affordance = match kind {
                    SchedulerMutationKind::DeleteShift => Affordance::DeleteShift,
                    SchedulerMutationKind::DeleteScheduled => Affordance::DeleteScheduled,
                };
                let permitted = gate(&claims, &item, None, self.caller_employee);
                if !permitted.contains(&affordance) {
                    return Err(AppError::denied(format!(
                        "scheduler mutation {:?} is not permitted",
                        kind
                    )));
                }

                match kind {
                    SchedulerMutationKind::DeleteShift => {
                        self.services
                            .shifts
                            .delete_shift(item.shift.id)
                            .await
                            .map_err(AppError::MutationFailure)?;
                    }
                    SchedulerMutationKind::DeleteScheduled => {
                        let scheduled = item
                            .scheduled
                            .as_ref()
                            .ok_or_else(|| AppError::denied("no assignment to delete"))?;
                        self.services
                            .scheduled
                            .delete_scheduled(scheduled.id)
                            .await
                            .map_err(AppError::MutationFailure)?;
                    }
                }
            }
        }

        // Never patch locally: the reload is what keeps the published index
        // consistent with the backing store after a write.
        self.navigator.reload().await
    }
}
