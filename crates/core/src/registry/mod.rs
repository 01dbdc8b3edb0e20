pub mod error;
pub mod seed;

use crate::domain::terminal::Terminal;
use crate::fleet::EvaluatedTerminal;
use anyhow::Context;
use std::collections::BTreeSet;
use std::path::Path;

pub use error::{validate_reload_amount, PendingReloadError};

/// In-memory terminal set, in display order.
#[derive(Debug, Clone, Default)]
pub struct TerminalRegistry {
    terminals: Vec<Terminal>,
}

impl TerminalRegistry {
    pub fn seeded() -> Self {
        Self {
            terminals: seed::seed_terminals(),
        }
    }

    pub fn from_terminals(terminals: Vec<Terminal>) -> anyhow::Result<Self> {
        let mut seen = BTreeSet::new();
        for t in &terminals {
            anyhow::ensure!(!t.id.trim().is_empty(), "terminal id must be non-empty");
            anyhow::ensure!(seen.insert(t.id.as_str()), "duplicate terminal id: {}", t.id);
            if t.current_balance > t.max_capacity {
                tracing::warn!(
                    terminal_id = %t.id,
                    current_balance = t.current_balance,
                    max_capacity = t.max_capacity,
                    "terminal balance exceeds capacity"
                );
            }
        }
        Ok(Self { terminals })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read terminals file {}", path.display()))?;
        let terminals = serde_json::from_str::<Vec<Terminal>>(&text)
            .with_context(|| format!("failed to parse terminals file {}", path.display()))?;
        Self::from_terminals(terminals)
    }

    pub fn snapshot(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn get(&self, id: &str) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty()
    }

    /// Last write wins. Returns the stored amount.
    pub fn set_pending_reload_amount(
        &mut self,
        id: &str,
        amount: f64,
    ) -> Result<u64, PendingReloadError> {
        let terminal = self
            .terminals
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| PendingReloadError::UnknownTerminal { id: id.to_string() })?;

        let amount = validate_reload_amount(amount, terminal.max_capacity)?;
        let previous = std::mem::replace(&mut terminal.pending_reload_amount, amount);
        tracing::debug!(terminal_id = %id, previous, amount, "pending reload amount set");
        Ok(amount)
    }

    /// Writes derived statuses from an evaluation pass back onto the stored terminals.
    pub fn commit_statuses(&mut self, evaluated: &[EvaluatedTerminal]) -> usize {
        let mut changed = 0;
        for e in evaluated {
            let Some(t) = self.terminals.iter_mut().find(|t| t.id == e.terminal.id) else {
                continue;
            };
            if t.status != e.recommendation.status {
                tracing::info!(
                    terminal_id = %t.id,
                    from = %t.status,
                    to = %e.recommendation.status,
                    "terminal status changed"
                );
                t.status = e.recommendation.status;
                changed += 1;
            }
        }
        changed
    }
}
