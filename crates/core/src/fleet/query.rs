use crate::domain::filter::FleetFilters;
use crate::domain::terminal::{Recommendation, Terminal, TerminalStatus};
use crate::engine::forecast::{self, DayAvailability};
use serde::Serialize;
use std::collections::BTreeMap;

/// A terminal annotated by one evaluation pass. `terminal.status` carries the fresh status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedTerminal {
    pub terminal: Terminal,
    pub recommendation: Recommendation,
    pub availability: Vec<DayAvailability>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReloadSummary {
    pub total: u64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub critical: usize,
    pub alert: usize,
    pub operational: usize,
    /// Whole fleet, regardless of the agency scope of the per-status counts.
    pub total: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TerminalStatus) -> usize {
        match status {
            TerminalStatus::Critical => self.critical,
            TerminalStatus::Alert => self.alert,
            TerminalStatus::Operational => self.operational,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgencyOption {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetView {
    pub filters: FleetFilters,
    pub terminals: Vec<EvaluatedTerminal>,
    pub reload: ReloadSummary,
    pub status_counts: StatusCounts,
    pub agencies: Vec<AgencyOption>,
}

pub fn evaluate_terminal(terminal: &Terminal) -> EvaluatedTerminal {
    let recommendation = forecast::recommend(terminal);
    let mut terminal = terminal.clone();
    terminal.status = recommendation.status;
    EvaluatedTerminal {
        availability: forecast::availability_curve(&terminal),
        terminal,
        recommendation,
    }
}

pub fn evaluate_all(terminals: &[Terminal]) -> Vec<EvaluatedTerminal> {
    terminals.iter().map(evaluate_terminal).collect()
}

fn matches(evaluated: &EvaluatedTerminal, filters: &FleetFilters) -> bool {
    let t = &evaluated.terminal;
    let survives_period = filters
        .period
        .map_or(true, |p| forecast::projected_balance(t, p.offset()) > 0.0);

    filters.matches_agency(&t.agency_code)
        && filters.matches_status(evaluated.recommendation.status)
        && survives_period
}

/// Filters are ANDed.
pub fn filter_terminals(terminals: &[Terminal], filters: &FleetFilters) -> Vec<EvaluatedTerminal> {
    filter_evaluated(evaluate_all(terminals), filters)
}

fn filter_evaluated(
    evaluated: Vec<EvaluatedTerminal>,
    filters: &FleetFilters,
) -> Vec<EvaluatedTerminal> {
    evaluated.into_iter().filter(|e| matches(e, filters)).collect()
}

/// Sums pending reloads of `critical`/`alert` terminals; stale amounts on operational ones are ignored.
pub fn aggregate_pending_reload<'a>(
    terminals: impl IntoIterator<Item = &'a Terminal>,
) -> ReloadSummary {
    terminals
        .into_iter()
        .filter(|t| t.status.is_reload_candidate() && t.pending_reload_amount > 0)
        .fold(ReloadSummary::default(), |acc, t| ReloadSummary {
            total: acc.total.saturating_add(t.pending_reload_amount),
            count: acc.count + 1,
        })
}

pub fn status_counts<'a>(
    terminals: impl IntoIterator<Item = &'a Terminal>,
    agency: Option<&str>,
) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for t in terminals {
        counts.total += 1;
        if agency.is_some_and(|a| a != t.agency_code) {
            continue;
        }
        match t.status {
            TerminalStatus::Critical => counts.critical += 1,
            TerminalStatus::Alert => counts.alert += 1,
            TerminalStatus::Operational => counts.operational += 1,
        }
    }
    counts
}

/// Distinct agencies sorted by code; the first name seen for a code wins.
pub fn agency_options<'a>(terminals: impl IntoIterator<Item = &'a Terminal>) -> Vec<AgencyOption> {
    let mut by_code = BTreeMap::<&str, &str>::new();
    for t in terminals {
        by_code.entry(&t.agency_code).or_insert(&t.agency_name);
    }
    by_code
        .into_iter()
        .map(|(code, name)| AgencyOption {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn evaluate(terminals: &[Terminal], filters: &FleetFilters) -> FleetView {
    view_from_evaluated(evaluate_all(terminals), filters)
}

/// Builds the view from an already annotated snapshot; aggregates cover the whole fleet.
pub fn view_from_evaluated(evaluated: Vec<EvaluatedTerminal>, filters: &FleetFilters) -> FleetView {
    let fresh = evaluated.iter().map(|e| &e.terminal);
    let reload = aggregate_pending_reload(fresh.clone());
    let status_counts = status_counts(fresh.clone(), filters.agency.as_deref());
    let agencies = agency_options(fresh);

    let terminals = filter_evaluated(evaluated, filters);

    FleetView {
        filters: filters.clone(),
        terminals,
        reload,
        status_counts,
        agencies,
    }
}
