use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::auth::RoleClaims;
use crate::error::ServiceError;
use crate::models::{
    Employee, Preferred, PreferredInput, Scheduled, ScheduledInput, Shift, ShiftInput,
};
use crate::services::{
    EmployeeService, PreferredService, RoleService, ScheduleServices, ScheduledService,
    ShiftService,
};

#[derive(Default)]
struct Store {
    shifts: HashMap<Uuid, Shift>,
    scheduled: HashMap<Uuid, Scheduled>,
    preferred: HashMap<Uuid, Preferred>,
    employees: Vec<Employee>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Reference implementation of the collaborator contracts over a shared
/// in-process store. Backs the demo binary and the test suite; enforces the
/// same invariants a real backend would (weekday/date agreement, one
/// preference per shift, replace-on-recreate) and can be switched into
/// failing modes to drive the error paths.
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<RwLock<Store>>,
    caller_employee: Uuid,
    caller_scheduler: Uuid,
    role_tx: Arc<watch::Sender<RoleClaims>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let (role_tx, _) = watch::channel(RoleClaims::default());

        InMemoryBackend {
            store: Arc::new(RwLock::new(Store::default())),
            caller_employee: Uuid::new_v4(),
            caller_scheduler: Uuid::new_v4(),
            role_tx: Arc::new(role_tx),
        }
    }

    /// The employee identity attached to preference and vacation calls.
    pub fn caller_employee(&self) -> Uuid {
        self.caller_employee
    }

    pub fn caller_scheduler(&self) -> Uuid {
        self.caller_scheduler
    }

    pub fn services(&self) -> ScheduleServices {
        ScheduleServices {
            shifts: Arc::new(self.clone()),
            scheduled: Arc::new(self.clone()),
            preferred: Arc::new(self.clone()),
            employees: Arc::new(self.clone()),
            roles: Arc::new(self.clone()),
        }
    }

    pub fn set_role(&self, claims: RoleClaims) {
        self.role_tx.send_replace(claims);
    }

    /// Make every read call fail until cleared.
    pub fn set_fail_reads(&self, fail: bool) {
        self.write_store().fail_reads = fail;
    }

    /// Make every mutation call fail until cleared.
    pub fn set_fail_writes(&self, fail: bool) {
        self.write_store().fail_writes = fail;
    }

    pub fn seed_employee(&self, name: &str) -> Employee {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.write_store().employees.push(employee.clone());
        employee
    }

    pub fn seed_shift(&self, input: ShiftInput) -> Shift {
        let shift = Shift::from_input(Uuid::new_v4(), input);
        self.write_store().shifts.insert(shift.id, shift.clone());
        shift
    }

    fn read_store(&self) -> std::sync::RwLockReadGuard<'_, Store> {
        self.store.read().expect("store lock poisoned")
    }

    fn write_store(&self) -> std::sync::RwLockWriteGuard<'_, Store> {
        self.store.write().expect("store lock poisoned")
    }

    fn check_reads(store: &Store) -> Result<(), ServiceError> {
        if store.fail_reads {
            Err(ServiceError::Network("read endpoint unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_writes(store: &Store) -> Result<(), ServiceError> {
        if store.fail_writes {
            Err(ServiceError::Network("write endpoint unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShiftService for InMemoryBackend {
    async fn fetch_all_shifts(&self) -> Result<Vec<Shift>, ServiceError> {
        let store = self.read_store();
        Self::check_reads(&store)?;
        Ok(store.shifts.values().cloned().collect())
    }

    async fn create_or_update_shift(
        &self,
        id: Option<Uuid>,
        input: ShiftInput,
    ) -> Result<Shift, ServiceError> {
        let mut store = self.write_store();
        Self::check_writes(&store)?;

        let id = match id {
            Some(id) if !store.shifts.contains_key(&id) => {
                return Err(ServiceError::NotFound(format!("shift {}", id)));
            }
            Some(id) => id,
            None => Uuid::new_v4(),
        };

        let shift = Shift::from_input(id, input);
        store.shifts.insert(id, shift.clone());
        Ok(shift)
    }

    async fn delete_shift(&self, id: Uuid) -> Result<(), ServiceError> {
        let mut store = self.write_store();
        Self::check_writes(&store)?;

        store
            .shifts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("shift {}", id)))
    }
}

#[async_trait]
impl ScheduledService for InMemoryBackend {
    async fn fetch_all_scheduled(&self) -> Result<Vec<Scheduled>, ServiceError> {
        let store = self.read_store();
        Self::check_reads(&store)?;
        Ok(store.scheduled.values().cloned().collect())
    }

    async fn create_scheduled(&self, input: ScheduledInput) -> Result<Scheduled, ServiceError> {
        let mut store = self.write_store();
        Self::check_writes(&store)?;

        let shift = store
            .shifts
            .get(&input.shift)
            .ok_or_else(|| ServiceError::NotFound(format!("shift {}", input.shift)))?;

        // An assignment must land on the weekday its template recurs on.
        if shift.day != input.date.weekday() {
            return Err(ServiceError::Validation(format!(
                "shift recurs on {:?}, not on {}",
                shift.day, input.date
            )));
        }

        // Re-creation semantics: the old assignment for this slot goes away.
        let replaced: Vec<Uuid> = store
            .scheduled
            .values()
            .filter(|entry| entry.shift == input.shift && entry.date == input.date)
            .map(|entry| entry.id)
            .collect();
        for id in replaced {
            store.scheduled.remove(&id);
        }

        let scheduled = Scheduled {
            id: Uuid::new_v4(),
            shift: input.shift,
            employee: input.employee,
            scheduler: self.caller_scheduler,
            date: input.date,
            created_at: Utc::now().naive_utc(),
        };
        store.scheduled.insert(scheduled.id, scheduled.clone());
        Ok(scheduled)
    }

    async fn delete_scheduled(&self, id: Uuid) -> Result<(), ServiceError> {
        let mut store = self.write_store();
        Self::check_writes(&store)?;

        store
            .scheduled
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("scheduled {}", id)))
    }
}

#[async_trait]
impl PreferredService for InMemoryBackend {
    async fn fetch_my_preferred(&self) -> Result<Option<Preferred>, ServiceError> {
        let store = self.read_store();
        Self::check_reads(&store)?;
        // Lowest id wins when the caller has ranked several shifts, so
        // repeated fetches always return the same record.
        Ok(store
            .preferred
            .values()
            .filter(|preferred| preferred.employee == self.caller_employee)
            .min_by_key(|preferred| preferred.id)
            .cloned())
    }

    async fn create_or_update_preferred(
        &self,
        id: Option<Uuid>,
        input: PreferredInput,
    ) -> Result<Preferred, ServiceError> {
        let mut store = self.write_store();
        Self::check_writes(&store)?;

        // One record per (employee, shift): an unkeyed submission against an
        // already-ranked shift updates the existing record.
        let existing = match id {
            Some(id) => Some(
                store
                    .preferred
                    .get(&id)
                    .map(|preferred| preferred.id)
                    .ok_or_else(|| ServiceError::NotFound(format!("preferred {}", id)))?,
            ),
            None => store
                .preferred
                .values()
                .find(|preferred| {
                    preferred.employee == self.caller_employee && preferred.shift == input.shift
                })
                .map(|preferred| preferred.id),
        };

        // A keyed update may re-target another shift; any record it would
        // now collide with goes away so the pair stays unique.
        let stale: Vec<Uuid> = store
            .preferred
            .values()
            .filter(|preferred| {
                preferred.employee == self.caller_employee
                    && preferred.shift == input.shift
                    && Some(preferred.id) != existing
            })
            .map(|preferred| preferred.id)
            .collect();
        for id in stale {
            store.preferred.remove(&id);
        }

        let preferred = Preferred {
            id: existing.unwrap_or_else(Uuid::new_v4),
            shift: input.shift,
            employee: self.caller_employee,
            rank: input.rank,
        };
        store.preferred.insert(preferred.id, preferred.clone());
        Ok(preferred)
    }

    async fn delete_preferred(&self, id: Uuid) -> Result<(), ServiceError> {
        let mut store = self.write_store();
        Self::check_writes(&store)?;

        store
            .preferred
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("preferred {}", id)))
    }
}

#[async_trait]
impl EmployeeService for InMemoryBackend {
    async fn fetch_all_employees(&self) -> Result<Vec<Employee>, ServiceError> {
        let store = self.read_store();
        Self::check_reads(&store)?;
        Ok(store.employees.clone())
    }
}

impl RoleService for InMemoryBackend {
    fn current_role(&self) -> RoleClaims {
        *self.role_tx.borrow()
    }

    fn role_updates(&self) -> watch::Receiver<RoleClaims> {
        self.role_tx.subscribe()
    }
}
