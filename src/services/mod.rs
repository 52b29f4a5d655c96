pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::auth::RoleClaims;
use crate::error::ServiceError;
use crate::models::{
    Employee, Preferred, PreferredInput, Scheduled, ScheduledInput, Shift, ShiftInput,
};

pub use memory::InMemoryBackend;

/// Shift template store. Full snapshots only; no pagination is assumed.
#[async_trait]
pub trait ShiftService: Send + Sync {
    async fn fetch_all_shifts(&self) -> Result<Vec<Shift>, ServiceError>;

    /// Create when `id` is None, update in place otherwise.
    async fn create_or_update_shift(
        &self,
        id: Option<Uuid>,
        input: ShiftInput,
    ) -> Result<Shift, ServiceError>;

    async fn delete_shift(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Concrete assignment store. Assignments are never updated in place:
/// creating one for an occupied (shift, date) slot replaces the old record.
#[async_trait]
pub trait ScheduledService: Send + Sync {
    async fn fetch_all_scheduled(&self) -> Result<Vec<Scheduled>, ServiceError>;

    async fn create_scheduled(&self, input: ScheduledInput) -> Result<Scheduled, ServiceError>;

    async fn delete_scheduled(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Preference store, scoped to the calling employee.
#[async_trait]
pub trait PreferredService: Send + Sync {
    async fn fetch_my_preferred(&self) -> Result<Option<Preferred>, ServiceError>;

    /// One record per (employee, shift): with or without an `id`, a
    /// submission for an already-ranked shift updates the existing record.
    async fn create_or_update_preferred(
        &self,
        id: Option<Uuid>,
        input: PreferredInput,
    ) -> Result<Preferred, ServiceError>;

    async fn delete_preferred(&self, id: Uuid) -> Result<(), ServiceError>;
}

/// Employee roster, used only to populate the scheduler's assignment form.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn fetch_all_employees(&self) -> Result<Vec<Employee>, ServiceError>;
}

/// Role claims for the current caller, plus a change channel so open views
/// can react to login/logout.
pub trait RoleService: Send + Sync {
    fn current_role(&self) -> RoleClaims;

    fn role_updates(&self) -> watch::Receiver<RoleClaims>;
}

/// Bundle of collaborator handles threaded through the navigator and the
/// detail surface.
#[derive(Clone)]
pub struct ScheduleServices {
    pub shifts: Arc<dyn ShiftService>,
    pub scheduled: Arc<dyn ScheduledService>,
    pub preferred: Arc<dyn PreferredService>,
    pub employees: Arc<dyn EmployeeService>,
    pub roles: Arc<dyn RoleService>,
}
