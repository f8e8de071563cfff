use bigdecimal::{BigDecimal, Zero};

/// Moving-average windows in trading days. The weekly windows assume a
/// 5-day trading week.
pub const SMA_1D_WINDOW: usize = 1;
pub const SMA_5W_WINDOW: usize = 25;
pub const SMA_13W_WINDOW: usize = 65;
pub const SMA_26W_WINDOW: usize = 130;

/// Simple Moving Average (SMA)
/// Returns a vector aligned with `values`:
/// - `None` until enough values exist
/// - `Some(avg)` after `window` values
pub fn sma(values: &[BigDecimal], window: usize) -> Vec<Option<BigDecimal>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let divisor = BigDecimal::from(window as u64);
    let mut sum = BigDecimal::zero();
    let mut result = Vec::with_capacity(values.len());

    // Running sum; the value that falls out of the window is subtracted.
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= &values[i - window];
        }

        if i + 1 >= window {
            result.push(Some((&sum / &divisor).round(4)));
        } else {
            result.push(None);
        }
    }

    result
}

/// Trading value for one day: close price times share volume.
pub fn turnover(close: &BigDecimal, volume: i64) -> BigDecimal {
    close * BigDecimal::from(volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decs(values: &[&str]) -> Vec<BigDecimal> {
        values.iter().map(|v| BigDecimal::from_str(v).unwrap()).collect()
    }

    #[test]
    fn test_sma_warmup_is_none() {
        let values = decs(&["1", "2", "3", "4", "5"]);
        let out = sma(&values, 3);

        assert_eq!(out.len(), values.len());
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert!(out[2].is_some());
    }

    #[test]
    fn test_sma_known_values() {
        let values = decs(&["1", "2", "3", "4", "5"]);
        let out = sma(&values, 3);

        assert_eq!(out[2], Some(BigDecimal::from(2)));
        assert_eq!(out[3], Some(BigDecimal::from(3)));
        assert_eq!(out[4], Some(BigDecimal::from(4)));
    }

    #[test]
    fn test_sma_window_one_is_identity() {
        let values = decs(&["10", "20", "30"]);
        let out = sma(&values, SMA_1D_WINDOW);

        assert_eq!(out[0], Some(BigDecimal::from(10)));
        assert_eq!(out[2], Some(BigDecimal::from(30)));
    }

    #[test]
    fn test_sma_zero_window_yields_all_none() {
        let values = decs(&["1", "2"]);
        let out = sma(&values, 0);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_turnover() {
        let close = BigDecimal::from_str("123.5").unwrap();
        assert_eq!(turnover(&close, 1000), BigDecimal::from_str("123500").unwrap());
    }
}
