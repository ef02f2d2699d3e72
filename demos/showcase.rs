//! Prints the current date, the date one day and one second later, and the
//! differences between the two.
//!
//! Run with `RUST_LOG=debug cargo run --example showcase` to see the crate's
//! own diagnostics as well.

use date_value::{DateError, DateValue, DayOfWeek};
use tracing_subscriber::EnvFilter;

fn describe(label: &str, date: &DateValue) {
    tracing::info!(
        %date,
        formatted = %date.format_default(),
        day_of_month = date.day_of_month(),
        month = date.month(),
        year = date.year(),
        week_of_year = date.week_of_year(),
        "{label}"
    );
}

fn main() -> Result<(), DateError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let date = DateValue::now();
    describe("current date", &date);

    let updated = date.add_days(1)?.add_seconds(1)?;
    describe("updated date", &updated);

    let current = DateValue::now();
    tracing::info!(
        millis = updated.difference_in_millis(&current),
        seconds = updated.difference_in_seconds(&current),
        minutes = updated.difference_in_minutes(&current),
        days = updated.difference_in_days(&current),
        "difference between updated and current date"
    );

    let week_start = updated.start_of_week()?;
    let week_end = updated.end_of_week()?;
    let month_end = updated.end_of_month()?;
    tracing::info!(
        start = %week_start,
        end = %week_end,
        end_of_month = %month_end.format_default(),
        is_friday = updated.is_day_of_week(DayOfWeek::Friday),
        "week of the updated date"
    );

    Ok(())
}
