use crate::domain::terminal::{Terminal, TerminalKind, TerminalStatus};
use chrono::NaiveDate;
use std::collections::BTreeMap;

struct SeedRow {
    id: &'static str,
    agency_code: &'static str,
    agency_name: &'static str,
    location: &'static str,
    kind: TerminalKind,
    current_balance: u64,
    max_capacity: u64,
    forecast_7d: u64,
    actual_consumption_7d: u64,
    denominations: [(u32, u32); 4],
    last_replenishment: (i32, u32, u32),
    status: TerminalStatus,
}

// Statuses here are the stale values a fresh registry starts with; the first pass rewrites them.
const SEED: [SeedRow; 6] = [
    SeedRow {
        id: "ATM-001",
        agency_code: "AG-001",
        agency_name: "Centro Lima",
        location: "Main Branch",
        kind: TerminalKind::Recycler,
        current_balance: 45_000,
        max_capacity: 100_000,
        forecast_7d: 38_000,
        actual_consumption_7d: 42_000,
        denominations: [(200, 50), (100, 100), (50, 150), (20, 200)],
        last_replenishment: (2025, 11, 28),
        status: TerminalStatus::Operational,
    },
    SeedRow {
        id: "ATM-002",
        agency_code: "AG-002",
        agency_name: "Miraflores",
        location: "Mall Plaza",
        kind: TerminalKind::Dispenser,
        current_balance: 15_000,
        max_capacity: 80_000,
        forecast_7d: 52_000,
        actual_consumption_7d: 48_000,
        denominations: [(200, 20), (100, 30), (50, 80), (20, 150)],
        last_replenishment: (2025, 11, 25),
        status: TerminalStatus::Alert,
    },
    SeedRow {
        id: "ATM-003",
        agency_code: "AG-001",
        agency_name: "Centro Lima",
        location: "Airport",
        kind: TerminalKind::Recycler,
        current_balance: 72_000,
        max_capacity: 150_000,
        forecast_7d: 65_000,
        actual_consumption_7d: 60_000,
        denominations: [(200, 120), (100, 180), (50, 200), (20, 250)],
        last_replenishment: (2025, 12, 1),
        status: TerminalStatus::Operational,
    },
    SeedRow {
        id: "ATM-004",
        agency_code: "AG-003",
        agency_name: "San Isidro",
        location: "University",
        kind: TerminalKind::Dispenser,
        current_balance: 8_000,
        max_capacity: 60_000,
        forecast_7d: 35_000,
        actual_consumption_7d: 32_000,
        denominations: [(200, 10), (100, 20), (50, 40), (20, 100)],
        last_replenishment: (2025, 11, 22),
        status: TerminalStatus::Critical,
    },
    SeedRow {
        id: "ATM-005",
        agency_code: "AG-002",
        agency_name: "Miraflores",
        location: "Shopping Center",
        kind: TerminalKind::Recycler,
        current_balance: 12_000,
        max_capacity: 90_000,
        forecast_7d: 45_000,
        actual_consumption_7d: 43_000,
        denominations: [(200, 15), (100, 25), (50, 60), (20, 120)],
        last_replenishment: (2025, 11, 24),
        status: TerminalStatus::Critical,
    },
    SeedRow {
        id: "ATM-006",
        agency_code: "AG-003",
        agency_name: "San Isidro",
        location: "Business Tower",
        kind: TerminalKind::Dispenser,
        current_balance: 28_000,
        max_capacity: 70_000,
        forecast_7d: 30_000,
        actual_consumption_7d: 28_000,
        denominations: [(200, 40), (100, 60), (50, 80), (20, 100)],
        last_replenishment: (2025, 11, 29),
        status: TerminalStatus::Alert,
    },
];

/// Demo fleet: six terminals across three agencies.
pub fn seed_terminals() -> Vec<Terminal> {
    SEED.iter()
        .map(|row| {
            let (y, m, d) = row.last_replenishment;
            let last_replenishment_date =
                NaiveDate::from_ymd_opt(y, m, d).expect("seed replenishment dates are valid");
            Terminal {
                id: row.id.to_string(),
                agency_code: row.agency_code.to_string(),
                agency_name: row.agency_name.to_string(),
                location: row.location.to_string(),
                kind: row.kind,
                current_balance: row.current_balance,
                max_capacity: row.max_capacity,
                forecast_7d: row.forecast_7d,
                actual_consumption_7d: row.actual_consumption_7d,
                denominations: row.denominations.iter().copied().collect::<BTreeMap<_, _>>(),
                last_replenishment_date,
                status: row.status,
                pending_reload_amount: 0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_complete_and_within_capacity() {
        let terminals = seed_terminals();
        assert_eq!(terminals.len(), SEED.len());
        let ids: Vec<&str> = terminals.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            ["ATM-001", "ATM-002", "ATM-003", "ATM-004", "ATM-005", "ATM-006"]
        );
        for (t, row) in terminals.iter().zip(SEED.iter()) {
            let (y, m, d) = row.last_replenishment;
            assert_eq!(
                t.last_replenishment_date,
                NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                "{}",
                t.id
            );
        }
        for t in &terminals {
            assert!(t.current_balance <= t.max_capacity, "{}", t.id);
            assert_eq!(t.denominations.len(), 4);
        }
    }
}
