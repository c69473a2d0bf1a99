//! Conversion between planck (smallest unit) and DOT, plus display helpers.

use crate::types::Balance;

/// Number of decimal places of the human-facing unit.
pub const TOKEN_DECIMALS: u32 = 10;

/// Planck per DOT (10^10).
pub const PLANCK_PER_DOT: Balance = 10_000_000_000;

/// Unit conversion error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("amount must be a finite number, got {0}")]
    NotFinite(f64),
    #[error("amount must not be negative, got {0}")]
    Negative(f64),
}

/// Convert a DOT amount to planck, flooring any sub-planck remainder.
pub fn dot_to_planck(dot: f64) -> Result<Balance, UnitError> {
    if !dot.is_finite() {
        return Err(UnitError::NotFinite(dot));
    }
    if dot < 0.0 {
        return Err(UnitError::Negative(dot));
    }
    Ok((dot * PLANCK_PER_DOT as f64).floor() as Balance)
}

/// Convert planck to DOT.
pub fn planck_to_dot(planck: Balance) -> f64 {
    planck as f64 / PLANCK_PER_DOT as f64
}

/// Format a planck amount with four decimal places and the network's token symbol.
pub fn format_balance(planck: Option<Balance>, symbol: &str) -> String {
    match planck {
        None | Some(0) => format!("0 {}", symbol),
        Some(p) => format!("{:.4} {}", planck_to_dot(p), symbol),
    }
}

/// Format a commission percentage (0-100) for display.
pub fn format_commission(commission: f64) -> String {
    format!("{:.2}%", commission)
}
