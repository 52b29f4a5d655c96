use std::env;

use chrono::Weekday;
use pretty_assertions::assert_eq;

use shiftcal::Config;
use shiftcal::models::Granularity;

mod common;

#[test]
fn test_config_from_env_defaults_and_custom_values() {
    // Store original values
    let original_values = [
        ("CALENDAR_WEEK_START", env::var("CALENDAR_WEEK_START").ok()),
        ("CALENDAR_DEFAULT_VIEW", env::var("CALENDAR_DEFAULT_VIEW").ok()),
        ("ENVIRONMENT", env::var("ENVIRONMENT").ok()),
    ];

    // Clear environment variables
    for (key, _) in &original_values {
        unsafe {
            env::remove_var(key);
        }
    }

    let config = Config::from_env_only().unwrap();
    assert_eq!(config.week_start, Weekday::Sun);
    assert_eq!(config.default_view, Granularity::Month);
    assert_eq!(config.environment, "development");
    assert!(config.is_development());
    assert!(!config.is_production());

    // Set custom values
    unsafe {
        env::set_var("CALENDAR_WEEK_START", "mon");
        env::set_var("CALENDAR_DEFAULT_VIEW", "week");
        env::set_var("ENVIRONMENT", "production");
    }

    let config = Config::from_env_only().unwrap();
    assert_eq!(config.week_start, Weekday::Mon);
    assert_eq!(config.default_view, Granularity::Week);
    assert!(config.is_production());
    assert!(!config.is_development());

    // Restore original values
    for (key, value) in original_values {
        unsafe {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
fn test_default_config_is_development() {
    let config = Config::default();
    assert_eq!(config.week_start, Weekday::Sun);
    assert_eq!(config.default_view, Granularity::Month);
    assert!(config.is_development());
    assert!(!config.is_production());
}

#[test]
fn test_other_environments_are_neither_production_nor_development() {
    let config = common::test_config();
    assert_eq!(config.environment, "test");
    assert!(!config.is_production());
    assert!(!config.is_development());
}
