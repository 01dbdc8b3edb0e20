use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PendingReloadError {
    #[error("unknown terminal: {id}")]
    UnknownTerminal { id: String },

    #[error("reload amount must be a finite number")]
    NotANumber,

    #[error("reload amount must not be negative (got {amount})")]
    Negative { amount: f64 },

    #[error("reload amount must be a whole number (got {amount})")]
    Fractional { amount: f64 },

    #[error("reload amount {amount} exceeds terminal capacity {max_capacity}")]
    ExceedsCapacity { amount: f64, max_capacity: u64 },
}

impl PendingReloadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PendingReloadError::UnknownTerminal { .. })
    }
}

/// Checks an operator-entered amount against `[0, max_capacity]` in whole units.
pub fn validate_reload_amount(amount: f64, max_capacity: u64) -> Result<u64, PendingReloadError> {
    if !amount.is_finite() {
        return Err(PendingReloadError::NotANumber);
    }
    if amount < 0.0 {
        return Err(PendingReloadError::Negative { amount });
    }
    if amount.fract() != 0.0 {
        return Err(PendingReloadError::Fractional { amount });
    }
    if amount > max_capacity as f64 {
        return Err(PendingReloadError::ExceedsCapacity {
            amount,
            max_capacity,
        });
    }
    Ok(amount as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_inclusive() {
        assert_eq!(validate_reload_amount(0.0, 60_000), Ok(0));
        assert_eq!(validate_reload_amount(60_000.0, 60_000), Ok(60_000));
        assert_eq!(validate_reload_amount(52_000.0, 60_000), Ok(52_000));
    }

    #[test]
    fn rejects_out_of_range_and_malformed() {
        assert_eq!(
            validate_reload_amount(f64::NAN, 60_000),
            Err(PendingReloadError::NotANumber)
        );
        assert_eq!(
            validate_reload_amount(f64::INFINITY, 60_000),
            Err(PendingReloadError::NotANumber)
        );
        assert_eq!(
            validate_reload_amount(-100.0, 60_000),
            Err(PendingReloadError::Negative { amount: -100.0 })
        );
        assert_eq!(
            validate_reload_amount(100.5, 60_000),
            Err(PendingReloadError::Fractional { amount: 100.5 })
        );
        assert_eq!(
            validate_reload_amount(60_001.0, 60_000),
            Err(PendingReloadError::ExceedsCapacity {
                amount: 60_001.0,
                max_capacity: 60_000
            })
        );
    }
}
