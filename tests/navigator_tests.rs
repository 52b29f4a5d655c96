use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Weekday};
use pretty_assertions::assert_eq;

use shiftcal::auth::RoleClaims;
use shiftcal::error::ServiceError;
use shiftcal::models::{Granularity, ScheduledInput, Shift, ShiftInput, Slot};
use shiftcal::services::{
    InMemoryBackend, PreferredService, ScheduleServices, ScheduledService, ShiftService,
};
use shiftcal::sync::{MutationDispatcher, SchedulerMutationKind, UpwardMessage};
use shiftcal::{AppError, CalendarNavigator, NavigatorEvent, Route};

mod common;

use common::{date, seeded_backend, shift_input, test_config};

/// Shift service that sleeps before answering, for driving the loading
/// state and the rapid-navigation race.
#[derive(Clone)]
struct SlowShifts {
    inner: InMemoryBackend,
    delay_ms: Arc<AtomicU64>,
}

#[async_trait]
impl ShiftService for SlowShifts {
    async fn fetch_all_shifts(&self) -> Result<Vec<Shift>, ServiceError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.inner.fetch_all_shifts().await
    }

    async fn create_or_update_shift(
        &self,
        id: Option<uuid::Uuid>,
        input: ShiftInput,
    ) -> Result<Shift, ServiceError> {
        self.inner.create_or_update_shift(id, input).await
    }

    async fn delete_shift(&self, id: uuid::Uuid) -> Result<(), ServiceError> {
        self.inner.delete_shift(id).await
    }
}

fn slow_services(backend: &InMemoryBackend, delay_ms: Arc<AtomicU64>) -> ScheduleServices {
    let mut services = backend.services();
    services.shifts = Arc::new(SlowShifts {
        inner: backend.clone(),
        delay_ms,
    });
    services
}

#[tokio::test]
async fn next_twice_lands_two_months_ahead_with_full_in_period_count() {
    let backend = seeded_backend();
    let navigator = CalendarNavigator::new(&test_config(), backend.services());
    let mut views = navigator.subscribe();

    navigator
        .navigate(Route {
            granularity: Granularity::Month,
            date: date(2021, 1, 15),
        })
        .await
        .unwrap();
    navigator.go_to_next().await.unwrap();
    navigator.go_to_next().await.unwrap();

    assert_eq!(navigator.reference_date(), date(2021, 3, 15));

    let view = views.borrow_and_update().clone();
    assert!(view.loaded);
    // March has 31 days.
    assert_eq!(view.grid.iter().filter(|c| c.in_current_period).count(), 31);
}

#[tokio::test]
async fn previous_and_next_are_inverse_for_weeks() {
    let backend = seeded_backend();
    let navigator = CalendarNavigator::new(&test_config(), backend.services());

    navigator
        .navigate(Route {
            granularity: Granularity::Week,
            date: date(2021, 9, 8),
        })
        .await
        .unwrap();
    navigator.go_to_previous().await.unwrap();
    assert_eq!(navigator.reference_date(), date(2021, 9, 1));

    navigator.go_to_next().await.unwrap();
    assert_eq!(navigator.reference_date(), date(2021, 9, 8));

    let route = navigator.current_route();
    assert_eq!(route.encode(), "week/2021-09-08");
}

#[tokio::test]
async fn fetch_failure_leaves_view_unloaded_and_emits_event() {
    let backend = seeded_backend();
    let navigator = CalendarNavigator::new(&test_config(), backend.services());
    let mut views = navigator.subscribe();
    let mut events = navigator.events();

    backend.set_fail_reads(true);
    let result = navigator.jump_to(date(2021, 9, 15)).await;

    assert!(matches!(result, Err(AppError::FetchFailure(_))));
    let view = views.borrow_and_update().clone();
    assert!(!view.loaded);
    assert!(view.items.is_empty());
    // The unloaded view still carries the fresh grid, never the old data.
    assert_eq!(view.grid.len(), 35);
    assert!(matches!(
        events.try_recv(),
        Ok(NavigatorEvent::FetchFailed(ServiceError::Network(_)))
    ));

    // No auto-retry: recovery only happens on an explicit transition.
    backend.set_fail_reads(false);
    navigator.reload().await.unwrap();
    assert!(views.borrow_and_update().loaded);
}

#[tokio::test]
async fn deleting_an_assignment_reloads_with_preference_intact() {
    let backend = InMemoryBackend::new();
    backend.set_role(RoleClaims {
        employee_authorized: true,
        scheduler_authorized: true,
    });
    backend.seed_employee("Dana");
    let shift = backend.seed_shift(shift_input(Weekday::Mon, 6, Slot::Morning));

    // 2021-09-06 is a Monday inside the navigated month.
    let monday = date(2021, 9, 6);
    backend
        .create_scheduled(ScheduledInput {
            shift: shift.id,
            employee: backend.caller_employee(),
            date: monday,
        })
        .await
        .unwrap();
    backend
        .create_or_update_preferred(
            None,
            shiftcal::models::PreferredInput {
                shift: shift.id,
                rank: 1,
            },
        )
        .await
        .unwrap();

    let navigator = Arc::new(CalendarNavigator::new(&test_config(), backend.services()));
    let mut views = navigator.subscribe();
    navigator.jump_to(date(2021, 9, 15)).await.unwrap();

    let item = views.borrow_and_update().items[&monday][0].clone();
    assert!(item.scheduled.is_some());

    let dispatcher = MutationDispatcher::new(
        backend.services(),
        navigator.clone(),
        Some(backend.caller_employee()),
    );
    dispatcher
        .dispatch(UpwardMessage::Scheduler {
            kind: SchedulerMutationKind::DeleteScheduled,
            item,
        })
        .await
        .unwrap();

    let view = views.borrow_and_update().clone();
    assert!(view.loaded);
    assert_eq!(view.items[&monday][0].scheduled, None);

    // The employee's ranked interest survives the assignment's deletion.
    let preferred = backend.fetch_my_preferred().await.unwrap();
    assert_eq!(preferred.map(|p| p.shift), Some(shift.id));
}

#[tokio::test]
async fn view_stays_gated_until_both_fetches_join() {
    let backend = seeded_backend();
    let delay = Arc::new(AtomicU64::new(100));
    let navigator = Arc::new(CalendarNavigator::new(
        &test_config(),
        slow_services(&backend, delay),
    ));
    let views = navigator.subscribe();

    let background = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.jump_to(date(2021, 9, 15)).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    {
        let view = views.borrow();
        assert!(!view.loaded);
        assert_eq!(view.grid.len(), 35);
        assert!(view.items.is_empty());
    }

    background.await.unwrap().unwrap();
    let view = views.borrow();
    assert!(view.loaded);
    assert!(!view.items.is_empty());
}

#[tokio::test]
async fn superseded_navigation_never_overwrites_the_newer_view() {
    let backend = seeded_backend();
    let delay = Arc::new(AtomicU64::new(150));
    let navigator = Arc::new(CalendarNavigator::new(
        &test_config(),
        slow_services(&backend, delay.clone()),
    ));
    let views = navigator.subscribe();

    // First navigation is slow; the second overtakes and publishes first.
    let slow_nav = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.jump_to(date(2021, 1, 15)).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    delay.store(0, Ordering::SeqCst);
    navigator.jump_to(date(2021, 9, 15)).await.unwrap();

    slow_nav.await.unwrap().unwrap();

    // The late January result was discarded; September stands.
    let view = views.borrow();
    assert!(view.loaded);
    assert!(view.grid.iter().any(|c| c.date == date(2021, 9, 1)));
    assert!(view.grid.iter().all(|c| c.date != date(2021, 1, 15)));
}
