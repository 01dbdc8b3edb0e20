use crate::domain::terminal::{Priority, Recommendation, Terminal, TerminalStatus};
use serde::Serialize;

/// Days of trailing consumption the observed total covers.
pub const CONSUMPTION_WINDOW_DAYS: f64 = 7.0;

/// Below this many days of cash a terminal is `critical`.
pub const CRITICAL_DAYS: f64 = 1.0;

/// Below this many days of cash a terminal is `alert` and always needs a reload.
pub const ALERT_DAYS: f64 = 3.0;

/// Last day offset of the availability curve (T0..=T7).
pub const CURVE_HORIZON_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayAvailability {
    pub day: u32,
    pub projected_balance: f64,
    pub has_cash: bool,
}

pub fn daily_consumption_rate(terminal: &Terminal) -> f64 {
    terminal.actual_consumption_7d as f64 / CONSUMPTION_WINDOW_DAYS
}

/// Days until the balance hits zero at the average daily rate; infinite with no consumption.
pub fn days_remaining(terminal: &Terminal) -> f64 {
    let rate = daily_consumption_rate(terminal);
    if rate <= 0.0 {
        return f64::INFINITY;
    }
    (terminal.current_balance as f64 / rate).max(0.0)
}

pub fn projected_balance(terminal: &Terminal, day_offset: u32) -> f64 {
    let balance = terminal.current_balance as f64;
    let rate = daily_consumption_rate(terminal);
    if rate <= 0.0 {
        return balance;
    }
    (balance - rate * f64::from(day_offset)).max(0.0)
}

pub fn availability_curve(terminal: &Terminal) -> Vec<DayAvailability> {
    (0..=CURVE_HORIZON_DAYS)
        .map(|day| {
            let projected_balance = projected_balance(terminal, day);
            DayAvailability {
                day,
                projected_balance,
                has_cash: projected_balance > 0.0,
            }
        })
        .collect()
}

/// Priority and status depend on days remaining only.
pub fn classify(days_remaining: f64) -> (Priority, TerminalStatus) {
    if days_remaining < CRITICAL_DAYS {
        (Priority::High, TerminalStatus::Critical)
    } else if days_remaining < ALERT_DAYS {
        (Priority::Medium, TerminalStatus::Alert)
    } else {
        (Priority::Low, TerminalStatus::Operational)
    }
}

/// Callers decide whether to commit `status`.
pub fn recommend(terminal: &Terminal) -> Recommendation {
    let days_remaining = days_remaining(terminal);

    // Either signal alone triggers a reload, so a terminal may need one while still `Low`.
    let needs_replenishment =
        days_remaining < ALERT_DAYS || terminal.current_balance < terminal.forecast_7d;

    let (priority, status) = classify(days_remaining);

    let suggested_amount = if needs_replenishment {
        suggested_fill(terminal)
    } else {
        0
    };

    Recommendation {
        needs_replenishment,
        days_remaining,
        suggested_amount,
        priority,
        status,
        balance_exceeds_capacity: terminal.current_balance > terminal.max_capacity,
    }
}

fn suggested_fill(terminal: &Terminal) -> u64 {
    if terminal.current_balance > terminal.max_capacity {
        tracing::warn!(
            terminal_id = %terminal.id,
            current_balance = terminal.current_balance,
            max_capacity = terminal.max_capacity,
            "balance exceeds capacity; suggesting no reload"
        );
        return 0;
    }
    terminal.max_capacity - terminal.current_balance
}
