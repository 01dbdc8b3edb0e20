use crate::domain::terminal::TerminalStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel accepted by the string parsers below to mean "no filter".
pub const ALL: &str = "all";

/// Forward-looking survivability check at a fixed day offset (`t-N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    T0,
    T1,
    T2,
    T3,
    T7,
}

impl Period {
    pub const ALL: [Period; 5] = [Period::T0, Period::T1, Period::T2, Period::T3, Period::T7];

    pub fn offset(self) -> u32 {
        match self {
            Period::T0 => 0,
            Period::T1 => 1,
            Period::T2 => 2,
            Period::T3 => 3,
            Period::T7 => 7,
        }
    }

    pub fn from_offset(offset: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.offset() == offset)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::T0 => "t-0",
            Period::T1 => "t-1",
            Period::T2 => "t-2",
            Period::T3 => "t-3",
            Period::T7 => "t-7",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    /// Accepts `t-3`, `T-3`, `t3` and `T3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let rest = lower
            .strip_prefix('t')
            .ok_or_else(|| anyhow::anyhow!("invalid period: {s}"))?;
        let digits = rest.strip_prefix('-').unwrap_or(rest);
        // A single digit; rejects signs, padding and repeated dashes.
        anyhow::ensure!(
            digits.len() == 1 && digits.bytes().all(|b| b.is_ascii_digit()),
            "invalid period: {s}"
        );
        let offset: u32 = digits
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid period: {s}"))?;
        Period::from_offset(offset)
            .ok_or_else(|| anyhow::anyhow!("unsupported period offset {offset} (expected 0, 1, 2, 3 or 7)"))
    }
}

impl TryFrom<String> for Period {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.as_str().to_string()
    }
}

/// The three conjunctive dashboard filters. `None` means pass-through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetFilters {
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub status: Option<TerminalStatus>,
    #[serde(default)]
    pub period: Option<Period>,
}

impl FleetFilters {
    pub fn matches_agency(&self, agency_code: &str) -> bool {
        self.agency.as_deref().map_or(true, |a| a == agency_code)
    }

    pub fn matches_status(&self, status: TerminalStatus) -> bool {
        self.status.map_or(true, |s| s == status)
    }
}

fn is_all(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case(ALL)
}

pub fn parse_agency_filter(s: &str) -> Option<String> {
    if is_all(s) {
        None
    } else {
        Some(s.trim().to_string())
    }
}

pub fn parse_status_filter(s: &str) -> anyhow::Result<Option<TerminalStatus>> {
    if is_all(s) {
        return Ok(None);
    }
    Ok(Some(s.parse()?))
}

pub fn parse_period_filter(s: &str) -> anyhow::Result<Option<Period>> {
    if is_all(s) {
        return Ok(None);
    }
    Ok(Some(s.parse()?))
}
