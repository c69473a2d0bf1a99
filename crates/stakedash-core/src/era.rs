//! Era window helpers.

use crate::types::EraIndex;

/// Number of past eras offered for inspection.
pub const HISTORICAL_ERA_WINDOW: u32 = 7;

/// Eras preceding `current`, newest first, clipped at era 0.
pub fn historical_eras(current: EraIndex) -> Vec<EraIndex> {
    (1..=HISTORICAL_ERA_WINDOW)
        .filter_map(|back| current.checked_sub(back))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_historical_eras_full_window() {
        assert_eq!(historical_eras(100), vec![99, 98, 97, 96, 95, 94, 93]);
    }

    #[test]
    fn test_historical_eras_clipped() {
        assert_eq!(historical_eras(3), vec![2, 1, 0]);
        assert_eq!(historical_eras(0), Vec::<EraIndex>::new());
    }
}
