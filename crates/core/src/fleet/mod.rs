pub mod detail;
pub mod query;

pub use detail::{terminal_detail, DenominationLine, TerminalDetail};
pub use query::{
    agency_options, aggregate_pending_reload, evaluate, evaluate_all, evaluate_terminal,
    filter_terminals, status_counts, view_from_evaluated, AgencyOption, EvaluatedTerminal,
    FleetView, ReloadSummary, StatusCounts,
};
