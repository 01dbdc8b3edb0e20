use crate::domain::filter::{FleetFilters, Period};
use crate::domain::terminal::{Terminal, TerminalStatus};
use crate::fleet::{self, FleetView, TerminalDetail};
use crate::notify::NoticeBatch;
use crate::registry::{PendingReloadError, TerminalRegistry};

/// Reads go through [`DashboardSession::view`], which commits the derived statuses.
#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    registry: TerminalRegistry,
    filters: FleetFilters,
    selected: Option<String>,
}

impl DashboardSession {
    pub fn new(registry: TerminalRegistry) -> Self {
        Self {
            registry,
            filters: FleetFilters::default(),
            selected: None,
        }
    }

    pub fn registry(&self) -> &TerminalRegistry {
        &self.registry
    }

    pub fn filters(&self) -> &FleetFilters {
        &self.filters
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_agency_filter(&mut self, agency: Option<String>) {
        self.filters.agency = agency;
    }

    pub fn set_status_filter(&mut self, status: Option<TerminalStatus>) {
        self.filters.status = status;
    }

    pub fn set_period_filter(&mut self, period: Option<Period>) {
        self.filters.period = period;
    }

    pub fn set_filters(&mut self, filters: FleetFilters) {
        self.filters = filters;
    }

    pub fn set_pending_reload_amount(
        &mut self,
        terminal_id: &str,
        amount: f64,
    ) -> Result<&Terminal, PendingReloadError> {
        self.registry.set_pending_reload_amount(terminal_id, amount)?;
        self.registry
            .get(terminal_id)
            .ok_or_else(|| PendingReloadError::UnknownTerminal {
                id: terminal_id.to_string(),
            })
    }

    /// Unknown ids are kept; the detail view then resolves to nothing.
    pub fn select_terminal_for_detail(&mut self, terminal_id: Option<String>) {
        if let Some(id) = terminal_id.as_deref() {
            if self.registry.get(id).is_none() {
                tracing::debug!(terminal_id = %id, "selected terminal not in registry");
            }
        }
        self.selected = terminal_id;
    }

    pub fn view(&mut self) -> FleetView {
        let evaluated = fleet::evaluate_all(self.registry.snapshot());
        let changed = self.registry.commit_statuses(&evaluated);
        let view = fleet::view_from_evaluated(evaluated, &self.filters);

        tracing::debug!(
            terminals = self.registry.len(),
            matched = view.terminals.len(),
            status_changes = changed,
            reload_total = view.reload.total,
            reload_count = view.reload.count,
            "evaluation pass"
        );
        view
    }

    pub fn selected_detail(&self) -> Option<TerminalDetail> {
        let id = self.selected.as_deref()?;
        self.detail(id)
    }

    pub fn detail(&self, terminal_id: &str) -> Option<TerminalDetail> {
        self.registry.get(terminal_id).map(fleet::terminal_detail)
    }

    /// Terminals to announce, using the statuses committed by the last pass.
    pub fn pending_notices(&self) -> NoticeBatch {
        NoticeBatch::from_terminals(self.registry.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_persist_across_views() {
        let mut session = DashboardSession::new(TerminalRegistry::seeded());
        session.set_agency_filter(Some("AG-002".to_string()));
        assert_eq!(session.view().terminals.len(), 2);

        session.set_period_filter(Some(Period::T3));
        assert!(session.view().terminals.is_empty());

        session.set_filters(FleetFilters::default());
        assert_eq!(session.view().terminals.len(), 6);
    }

    #[test]
    fn view_commits_fresh_statuses() {
        let mut session = DashboardSession::new(TerminalRegistry::seeded());
        session.set_status_filter(Some(TerminalStatus::Operational));
        let ids: Vec<String> = session
            .view()
            .terminals
            .into_iter()
            .map(|e| e.terminal.id)
            .collect();
        assert_eq!(ids, vec!["ATM-001", "ATM-003", "ATM-006"]);

        let atm6 = session.registry().get("ATM-006").unwrap();
        assert_eq!(atm6.status, TerminalStatus::Operational);
    }

    #[test]
    fn override_flows_into_aggregate() {
        let mut session = DashboardSession::new(TerminalRegistry::seeded());
        session.set_pending_reload_amount("ATM-004", 52_000.0).unwrap();
        session.set_pending_reload_amount("ATM-001", 30_000.0).unwrap();

        let view = session.view();
        assert_eq!(view.reload.total, 52_000);
        assert_eq!(view.reload.count, 1);

        let notices = session.pending_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices.lines[0].terminal_id, "ATM-004");
    }

    #[test]
    fn rejected_override_surfaces_error() {
        let mut session = DashboardSession::new(TerminalRegistry::seeded());
        let err = session.set_pending_reload_amount("ATM-004", 60_500.0).unwrap_err();
        assert!(matches!(err, PendingReloadError::ExceedsCapacity { .. }));
        assert!(session
            .set_pending_reload_amount("nope", 1.0)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn detail_selection() {
        let mut session = DashboardSession::new(TerminalRegistry::seeded());
        assert!(session.selected_detail().is_none());

        session.select_terminal_for_detail(Some("ATM-003".to_string()));
        let detail = session.selected_detail().unwrap();
        assert_eq!(detail.terminal.id, "ATM-003");

        session.select_terminal_for_detail(Some("ATM-404".to_string()));
        assert_eq!(session.selected(), Some("ATM-404"));
        assert!(session.selected_detail().is_none());

        session.select_terminal_for_detail(None);
        assert!(session.selected_detail().is_none());
    }

    #[test]
    fn empty_registry_is_usable() {
        let mut session = DashboardSession::default();
        let view = session.view();
        assert!(view.terminals.is_empty());
        assert!(session.pending_notices().is_empty());
    }
}
