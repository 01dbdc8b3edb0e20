use crate::domain::terminal::{Recommendation, Terminal};
use crate::engine::forecast::{self, DayAvailability};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DenominationLine {
    pub denomination: u32,
    pub count: u32,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminalDetail {
    pub terminal: Terminal,
    pub recommendation: Recommendation,
    pub availability: Vec<DayAvailability>,
    /// `current_balance / max_capacity`, 0 for a zero-capacity terminal.
    pub balance_ratio: f64,
    pub denominations: Vec<DenominationLine>,
    pub denomination_total: u64,
}

pub fn terminal_detail(terminal: &Terminal) -> TerminalDetail {
    let recommendation = forecast::recommend(terminal);
    let mut terminal = terminal.clone();
    terminal.status = recommendation.status;

    let denominations: Vec<DenominationLine> = terminal
        .denominations
        .iter()
        .map(|(&denomination, &count)| DenominationLine {
            denomination,
            count,
            value: u64::from(denomination) * u64::from(count),
        })
        .collect();
    let denomination_total = denominations.iter().map(|d| d.value).sum();

    let balance_ratio = if terminal.max_capacity == 0 {
        0.0
    } else {
        terminal.current_balance as f64 / terminal.max_capacity as f64
    };

    TerminalDetail {
        availability: forecast::availability_curve(&terminal),
        recommendation,
        balance_ratio,
        denominations,
        denomination_total,
        terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::terminal::TerminalStatus;
    use crate::registry::seed::seed_terminals;

    #[test]
    fn detail_breaks_down_denominations() {
        let terminals = seed_terminals();
        let atm1 = terminals.iter().find(|t| t.id == "ATM-001").unwrap();
        let detail = terminal_detail(atm1);

        let values: Vec<u32> = detail.denominations.iter().map(|d| d.denomination).collect();
        assert_eq!(values, vec![20, 50, 100, 200]);
        // 200*50 + 100*100 + 50*150 + 20*200
        assert_eq!(detail.denomination_total, 31_500);
        assert!((detail.balance_ratio - 0.45).abs() < 1e-9);
        assert_eq!(detail.availability.len(), 8);
    }

    #[test]
    fn detail_carries_fresh_status() {
        let terminals = seed_terminals();
        let atm6 = terminals.iter().find(|t| t.id == "ATM-006").unwrap();
        assert_eq!(atm6.status, TerminalStatus::Alert);

        let detail = terminal_detail(atm6);
        assert_eq!(detail.terminal.status, TerminalStatus::Operational);
        assert!(detail.recommendation.needs_replenishment);
    }

    #[test]
    fn zero_capacity_has_zero_ratio() {
        let mut t = seed_terminals().remove(0);
        t.current_balance = 0;
        t.max_capacity = 0;
        assert_eq!(terminal_detail(&t).balance_ratio, 0.0);
    }
}
