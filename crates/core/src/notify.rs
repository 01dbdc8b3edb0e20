use crate::domain::terminal::Terminal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeChannel {
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeLine {
    pub terminal_id: String,
    pub agency_code: String,
    pub agency_name: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoticeBatch {
    pub lines: Vec<NoticeLine>,
}

impl NoticeBatch {
    /// Same selection as the pending-reload aggregate: alert/critical with an amount set.
    pub fn from_terminals<'a>(terminals: impl IntoIterator<Item = &'a Terminal>) -> Self {
        let lines = terminals
            .into_iter()
            .filter(|t| t.status.is_reload_candidate() && t.pending_reload_amount > 0)
            .map(|t| NoticeLine {
                terminal_id: t.id.clone(),
                agency_code: t.agency_code.clone(),
                agency_name: t.agency_name.clone(),
                amount: t.pending_reload_amount,
            })
            .collect();
        Self { lines }
    }

    pub fn total(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |acc, l| acc.saturating_add(l.amount))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn by_agency(&self) -> BTreeMap<&str, Vec<&NoticeLine>> {
        let mut out = BTreeMap::<&str, Vec<&NoticeLine>>::new();
        for line in &self.lines {
            out.entry(line.agency_code.as_str()).or_default().push(line);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeReport {
    pub notice_id: Uuid,
    pub sent_at: DateTime<Utc>,
    pub channel: NoticeChannel,
    pub notified: usize,
    pub total_amount: u64,
}

#[async_trait::async_trait]
pub trait ReplenishmentNotifier: Send + Sync {
    fn channel(&self) -> NoticeChannel;

    /// Announces the batch. Pending amounts are left for the caller to manage.
    async fn send(&self, batch: &NoticeBatch) -> anyhow::Result<NoticeReport>;
}

/// Writes notices to the tracing log instead of a mail or ticketing system.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl ReplenishmentNotifier for LogNotifier {
    fn channel(&self) -> NoticeChannel {
        NoticeChannel::Log
    }

    async fn send(&self, batch: &NoticeBatch) -> anyhow::Result<NoticeReport> {
        let notice_id = Uuid::new_v4();

        for (agency_code, lines) in batch.by_agency() {
            let terminal_ids: Vec<&str> = lines.iter().map(|l| l.terminal_id.as_str()).collect();
            let amount = lines.iter().fold(0u64, |acc, l| acc.saturating_add(l.amount));
            tracing::info!(
                %notice_id,
                agency_code,
                agency_name = %lines[0].agency_name,
                ?terminal_ids,
                amount,
                "replenishment notice"
            );
        }

        Ok(NoticeReport {
            notice_id,
            sent_at: Utc::now(),
            channel: self.channel(),
            notified: batch.len(),
            total_amount: batch.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::terminal::TerminalStatus;
    use crate::registry::seed::seed_terminals;

    fn scheduled_fleet() -> Vec<Terminal> {
        let mut terminals = seed_terminals();
        for t in terminals.iter_mut() {
            match t.id.as_str() {
                "ATM-002" => {
                    t.status = TerminalStatus::Alert;
                    t.pending_reload_amount = 65_000;
                }
                "ATM-005" => {
                    t.status = TerminalStatus::Alert;
                    t.pending_reload_amount = 78_000;
                }
                "ATM-001" => {
                    t.status = TerminalStatus::Operational;
                    t.pending_reload_amount = 10_000;
                }
                _ => {}
            }
        }
        terminals
    }

    #[test]
    fn batch_matches_aggregate_selection() {
        let terminals = scheduled_fleet();
        let batch = NoticeBatch::from_terminals(&terminals);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.total(), 143_000);

        let by_agency = batch.by_agency();
        assert_eq!(by_agency.len(), 1);
        assert_eq!(by_agency["AG-002"].len(), 2);
    }

    #[test]
    fn batch_total_saturates() {
        let mut terminals = scheduled_fleet();
        for t in terminals.iter_mut().filter(|t| t.pending_reload_amount > 0) {
            t.max_capacity = u64::MAX;
            t.pending_reload_amount = u64::MAX;
        }
        let batch = NoticeBatch::from_terminals(&terminals);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.total(), u64::MAX);
    }

    #[tokio::test]
    async fn log_notifier_reports_and_keeps_amounts() {
        let terminals = scheduled_fleet();
        let batch = NoticeBatch::from_terminals(&terminals);

        let report = LogNotifier.send(&batch).await.unwrap();
        assert_eq!(report.notified, 2);
        assert_eq!(report.total_amount, 143_000);
        assert_eq!(report.channel, NoticeChannel::Log);

        let atm2 = terminals.iter().find(|t| t.id == "ATM-002").unwrap();
        assert_eq!(atm2.pending_reload_amount, 65_000);
    }

    #[tokio::test]
    async fn empty_batch_notifies_nobody() {
        let report = LogNotifier.send(&NoticeBatch::default()).await.unwrap();
        assert_eq!(report.notified, 0);
        assert_eq!(report.total_amount, 0);
    }
}
