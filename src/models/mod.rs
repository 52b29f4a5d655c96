pub mod calendar;
pub mod employee;
pub mod preferred;
pub mod scheduled;
pub mod shift;

pub use calendar::{CalendarCell, CalendarItem, Granularity};
pub use employee::Employee;
pub use preferred::{Preferred, PreferredInput};
pub use scheduled::{Scheduled, ScheduledInput};
pub use shift::{Shift, ShiftInput, Slot};
