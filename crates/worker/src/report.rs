use cashload_core::engine::forecast::DayAvailability;
use cashload_core::fleet::{EvaluatedTerminal, FleetView};
use cashload_core::format::{format_amount, format_days};

/// `#` for a day with cash, `.` for a day without, T0 first.
pub fn curve_bar(curve: &[DayAvailability]) -> String {
    curve
        .iter()
        .map(|d| if d.has_cash { '#' } else { '.' })
        .collect()
}

pub fn terminal_line(e: &EvaluatedTerminal, symbol: &str) -> String {
    let t = &e.terminal;
    let rec = &e.recommendation;
    let mut line = format!(
        "{} [{}] {} / {} | balance {} of {} | {} days | {}",
        t.id,
        t.status,
        t.agency_name,
        t.location,
        format_amount(t.current_balance, symbol),
        format_amount(t.max_capacity, symbol),
        format_days(rec.days_remaining),
        curve_bar(&e.availability),
    );
    if rec.needs_replenishment {
        line.push_str(&format!(
            " | priority {} suggest {}",
            rec.priority,
            format_amount(rec.suggested_amount, symbol)
        ));
    }
    if rec.balance_exceeds_capacity {
        line.push_str(" | balance exceeds capacity");
    }
    if t.pending_reload_amount > 0 {
        line.push_str(&format!(
            " | pending {}",
            format_amount(t.pending_reload_amount, symbol)
        ));
    }
    line
}

pub fn log_view(view: &FleetView, symbol: &str) {
    if view.terminals.is_empty() {
        tracing::warn!(filters = ?view.filters, "no terminals match the selected filters");
    }

    for e in &view.terminals {
        tracing::info!("{}", terminal_line(e, symbol));
    }

    tracing::info!(
        matched = view.terminals.len(),
        critical = view.status_counts.critical,
        alert = view.status_counts.alert,
        operational = view.status_counts.operational,
        total = view.status_counts.total,
        scheduled = view.reload.count,
        scheduled_amount = %format_amount(view.reload.total, symbol),
        "fleet summary"
    );
}
