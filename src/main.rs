use anyhow::Result;
use chrono::{Datelike, NaiveTime, Weekday};

use shiftcal::auth::RoleClaims;
use shiftcal::models::{ScheduledInput, ShiftInput, Slot};
use shiftcal::services::{InMemoryBackend, ScheduledService};
use shiftcal::{CalendarNavigator, Config};

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    let config = Config::from_env()?;
    println!(
        "shiftcal demo (environment: {}, week starts {})",
        config.environment, config.week_start
    );

    // Seed the in-memory backend with a small roster and two templates.
    let backend = InMemoryBackend::new();
    backend.set_role(RoleClaims::scheduler());

    let employee = backend.seed_employee("Dana");
    backend.seed_employee("Riley");

    let opener = backend.seed_shift(ShiftInput {
        position: "server".to_string(),
        slot: Slot::Morning,
        location: "front".to_string(),
        day: Weekday::Mon,
        shift_start: time(6),
        shift_end: time(14),
    });
    backend.seed_shift(ShiftInput {
        position: "server".to_string(),
        slot: Slot::Evening,
        location: "front".to_string(),
        day: Weekday::Mon,
        shift_start: time(14),
        shift_end: time(22),
    });

    let navigator = CalendarNavigator::new(&config, backend.services());
    let mut views = navigator.subscribe();
    navigator.reload().await?;

    // Assign the opener on the first in-period Monday, then reload the way
    // any mutation does instead of patching the view.
    let view = views.borrow_and_update().clone();
    if let Some(monday) = view
        .grid
        .iter()
        .find(|cell| cell.in_current_period && cell.date.weekday() == Weekday::Mon)
    {
        backend
            .create_scheduled(ScheduledInput {
                shift: opener.id,
                employee: employee.id,
                date: monday.date,
            })
            .await?;
        navigator.reload().await?;
    }

    let view = views.borrow_and_update().clone();
    println!("route: {}", navigator.current_route());

    for row in view.grid.chunks(7) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| {
                let items = view.items.get(&cell.date).map_or(0, |items| items.len());
                let assigned = view
                    .items
                    .get(&cell.date)
                    .map_or(0, |items| items.iter().filter(|i| i.scheduled.is_some()).count());
                let marker = if cell.in_current_period { ' ' } else { '.' };
                format!("{}{:2}:{}/{}", marker, cell.date.day(), assigned, items)
            })
            .collect();
        println!("{}", line.join("  "));
    }

    Ok(())
}
