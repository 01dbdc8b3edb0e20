use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    /// Accepts deposits and dispenses.
    Recycler,
    /// Dispenses only.
    Dispenser,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    #[default]
    Operational,
    Alert,
    Critical,
}

impl TerminalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminalStatus::Operational => "operational",
            TerminalStatus::Alert => "alert",
            TerminalStatus::Critical => "critical",
        }
    }

    /// Statuses whose pending reload amounts count toward the fleet total.
    pub fn is_reload_candidate(self) -> bool {
        matches!(self, TerminalStatus::Alert | TerminalStatus::Critical)
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerminalStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operational" => Ok(TerminalStatus::Operational),
            "alert" => Ok(TerminalStatus::Alert),
            "critical" => Ok(TerminalStatus::Critical),
            other => anyhow::bail!("unknown terminal status: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amounts are whole currency units. `status` is whatever the last evaluation pass committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    pub id: String,
    pub agency_code: String,
    pub agency_name: String,
    pub location: String,
    pub kind: TerminalKind,
    pub current_balance: u64,
    pub max_capacity: u64,
    pub forecast_7d: u64,
    pub actual_consumption_7d: u64,
    /// Bill value -> bills on hand.
    #[serde(default)]
    pub denominations: BTreeMap<u32, u32>,
    pub last_replenishment_date: NaiveDate,
    #[serde(default)]
    pub status: TerminalStatus,
    #[serde(default)]
    pub pending_reload_amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub needs_replenishment: bool,
    /// `f64::INFINITY` when the terminal has no consumption; serialized as `null`.
    pub days_remaining: f64,
    pub suggested_amount: u64,
    pub priority: Priority,
    pub status: TerminalStatus,
    /// Balance above `max_capacity`; the data is inconsistent and `suggested_amount` is 0.
    pub balance_exceeds_capacity: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_with_defaults_for_derived_fields() {
        let v = json!({
            "id": "ATM-900",
            "agency_code": "AG-9",
            "agency_name": "Test Agency",
            "location": "Lobby",
            "kind": "dispenser",
            "current_balance": 1000,
            "max_capacity": 5000,
            "forecast_7d": 2000,
            "actual_consumption_7d": 700,
            "denominations": {"100": 5, "50": 10},
            "last_replenishment_date": "2025-11-20"
        });

        let t: Terminal = serde_json::from_value(v).unwrap();
        assert_eq!(t.status, TerminalStatus::Operational);
        assert_eq!(t.pending_reload_amount, 0);
        assert_eq!(t.denominations.get(&100).copied(), Some(5));
        assert_eq!(t.kind, TerminalKind::Dispenser);
    }

    #[test]
    fn rejects_negative_consumption() {
        let v = json!({
            "id": "ATM-901",
            "agency_code": "AG-9",
            "agency_name": "Test Agency",
            "location": "Lobby",
            "kind": "recycler",
            "current_balance": 1000,
            "max_capacity": 5000,
            "forecast_7d": 2000,
            "actual_consumption_7d": -700,
            "last_replenishment_date": "2025-11-20"
        });

        assert!(serde_json::from_value::<Terminal>(v).is_err());
    }

    #[test]
    fn infinite_days_remaining_serializes_as_null() {
        let rec = Recommendation {
            needs_replenishment: false,
            days_remaining: f64::INFINITY,
            suggested_amount: 0,
            priority: Priority::Low,
            status: TerminalStatus::Operational,
            balance_exceeds_capacity: false,
        };
        let v = serde_json::to_value(rec).unwrap();
        assert!(v["days_remaining"].is_null());
        assert_eq!(v["balance_exceeds_capacity"], false);
        assert_eq!(v["priority"], "low");
    }

    #[test]
    fn parses_status_case_insensitively() {
        assert_eq!("Critical".parse::<TerminalStatus>().unwrap(), TerminalStatus::Critical);
        assert_eq!(" alert ".parse::<TerminalStatus>().unwrap(), TerminalStatus::Alert);
        assert!("broken".parse::<TerminalStatus>().is_err());
    }
}
