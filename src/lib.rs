pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod grid;
pub mod merge;
pub mod models;
pub mod navigator;
pub mod routes;
pub mod services;
pub mod sync;

pub use config::Config;
pub use error::{AppError, ServiceError};
pub use navigator::{CalendarNavigator, CalendarView, NavigatorEvent};
pub use routes::Route;
