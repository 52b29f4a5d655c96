use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Days, Months, NaiveDate, Utc, Weekday};
use tokio::sync::{broadcast, watch};

use crate::config::Config;
use crate::error::{AppError, ServiceError};
use crate::grid::{build_month_grid, build_week_grid};
use crate::merge::merge_index;
use crate::models::{CalendarCell, CalendarItem, Granularity, Preferred};
use crate::routes::Route;
use crate::services::ScheduleServices;

/// The published calendar state: grid, merged per-date items and the loaded
/// flag observers must gate rendering on. Replaced wholesale on every
/// publication; an unloaded view carries the new grid with an empty index so
/// stale entities are never shown against a fresh grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub grid: Vec<CalendarCell>,
    pub items: BTreeMap<NaiveDate, Vec<CalendarItem>>,
    pub loaded: bool,
    pub generation: u64,
}

impl CalendarView {
    fn unloaded() -> Self {
        CalendarView {
            grid: Vec::new(),
            items: BTreeMap::new(),
            loaded: false,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorEvent {
    FetchFailed(ServiceError),
}

#[derive(Debug, Clone, Copy)]
struct Position {
    reference: NaiveDate,
    granularity: Granularity,
}

/// Owns the reference date and granularity, and turns every transition into
/// the same cycle: rebuild the grid, refetch all collections, merge, publish.
///
/// Shared state leaves this struct only through watch channels and only as
/// whole snapshots. Mutations downstream call [`CalendarNavigator::reload`]
/// instead of patching, so the published index can never diverge from the
/// backing store after a write.
pub struct CalendarNavigator {
    services: ScheduleServices,
    week_start: Weekday,
    position: Mutex<Position>,
    generation: AtomicU64,
    view_tx: watch::Sender<CalendarView>,
    preferred_tx: watch::Sender<Option<Preferred>>,
    events_tx: broadcast::Sender<NavigatorEvent>,
}

impl CalendarNavigator {
    pub fn new(config: &Config, services: ScheduleServices) -> Self {
        let (view_tx, _) = watch::channel(CalendarView::unloaded());
        let (preferred_tx, _) = watch::channel(None);
        let (events_tx, _) = broadcast::channel(16);

        CalendarNavigator {
            services,
            week_start: config.week_start,
            position: Mutex::new(Position {
                reference: Utc::now().date_naive(),
                granularity: config.default_view,
            }),
            generation: AtomicU64::new(0),
            view_tx,
            preferred_tx,
            events_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CalendarView> {
        self.view_tx.subscribe()
    }

    pub fn preferred_updates(&self) -> watch::Receiver<Option<Preferred>> {
        self.preferred_tx.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<NavigatorEvent> {
        self.events_tx.subscribe()
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.position().reference
    }

    pub fn granularity(&self) -> Granularity {
        self.position().granularity
    }

    /// The bookmarkable address of the current view.
    pub fn current_route(&self) -> Route {
        let position = self.position();
        Route {
            granularity: position.granularity,
            date: position.reference,
        }
    }

    pub async fn go_to_current(&self) -> Result<(), AppError> {
        self.set_reference(Utc::now().date_naive());
        self.reload().await
    }

    pub async fn go_to_previous(&self) -> Result<(), AppError> {
        let position = self.position();
        let reference = match position.granularity {
            Granularity::Month => position.reference - Months::new(1),
            Granularity::Week => position.reference - Days::new(7),
        };
        self.set_reference(reference);
        self.reload().await
    }

    pub async fn go_to_next(&self) -> Result<(), AppError> {
        let position = self.position();
        let reference = match position.granularity {
            Granularity::Month => position.reference + Months::new(1),
            Granularity::Week => position.reference + Days::new(7),
        };
        self.set_reference(reference);
        self.reload().await
    }

    pub async fn jump_to(&self, date: NaiveDate) -> Result<(), AppError> {
        self.set_reference(date);
        self.reload().await
    }

    pub async fn set_granularity(&self, granularity: Granularity) -> Result<(), AppError> {
        self.position.lock().expect("position lock poisoned").granularity = granularity;
        self.reload().await
    }

    pub async fn navigate(&self, route: Route) -> Result<(), AppError> {
        {
            let mut position = self.position.lock().expect("position lock poisoned");
            position.reference = route.date;
            position.granularity = route.granularity;
        }
        self.reload().await
    }

    /// The four-step cycle behind every transition and every mutation:
    /// stamp a generation, publish the unloaded view, join the shift and
    /// scheduled fetches, then merge and publish loaded — unless a newer
    /// navigation stamped past this one, in which case the result is
    /// discarded unpublished. The caller's preference is fetched last and
    /// rides its own channel without gating the grid.
    pub async fn reload(&self) -> Result<(), AppError> {
        let position = self.position();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let grid = match position.granularity {
            Granularity::Month => build_month_grid(position.reference, self.week_start),
            Granularity::Week => build_week_grid(position.reference, self.week_start),
        };

        log::debug!(
            "Reload {}: {} view around {} ({} cells)",
            generation,
            position.granularity,
            position.reference,
            grid.len()
        );

        self.publish(CalendarView {
            grid: grid.clone(),
            items: BTreeMap::new(),
            loaded: false,
            generation,
        });

        // Both snapshots must land before anything is published; rendering
        // shifts without their assignments is worse than rendering late.
        let (shifts, scheduled) = tokio::join!(
            self.services.shifts.fetch_all_shifts(),
            self.services.scheduled.fetch_all_scheduled(),
        );

        let (shifts, scheduled) = match (shifts, scheduled) {
            (Ok(shifts), Ok(scheduled)) => (shifts, scheduled),
            (Err(err), _) | (_, Err(err)) => {
                log::error!("Calendar fetch failed: {}", err);
                let _ = self.events_tx.send(NavigatorEvent::FetchFailed(err.clone()));
                return Err(AppError::FetchFailure(err));
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("Discarding superseded reload {}", generation);
            return Ok(());
        }

        let items = merge_index(&grid, &shifts, &scheduled);
        self.publish(CalendarView {
            grid,
            items,
            loaded: true,
            generation,
        });

        match self.services.preferred.fetch_my_preferred().await {
            Ok(preferred) => {
                self.preferred_tx.send_replace(preferred);
            }
            Err(err) => {
                log::error!("Preferred fetch failed: {}", err);
                let _ = self.events_tx.send(NavigatorEvent::FetchFailed(err));
            }
        }

        Ok(())
    }

    /// Only the highest-stamped view ever reaches observers; a slower
    /// navigation's publication is dropped here even if its fetches finish
    /// after a newer one's.
    fn publish(&self, view: CalendarView) {
        self.view_tx.send_if_modified(|current| {
            if view.generation >= current.generation {
                *current = view;
                true
            } else {
                false
            }
        });
    }

    fn position(&self) -> Position {
        *self.position.lock().expect("position lock poisoned")
    }

    fn set_reference(&self, reference: NaiveDate) {
        self.position.lock().expect("position lock poisoned").reference = reference;
    }
}
