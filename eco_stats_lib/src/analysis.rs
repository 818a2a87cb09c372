//! Arithmetic helpers over numeric series.
//!
//! Results are aligned to the end of the input: element `i` of the output
//! corresponds to element `i + offset` of the input, where the offset is the
//! lookback period or `window - 1`.

use crate::error::EcoStatsError;

/// Period-over-period percent change, `(cur - prev) / prev * 100`.
///
/// Returns `n - 1` values. A zero previous value yields `None` for that
/// position so later values stay aligned.
pub fn calculate_percent_change(values: &[f64]) -> Vec<Option<f64>> {
    percent_change(values, 1)
}

/// Percent change against the value `periods` steps back.
///
/// Returns `n - periods` values, or none when the series is not longer than
/// `periods`.
pub fn calculate_percent_change_over(
    values: &[f64],
    periods: usize,
) -> Result<Vec<Option<f64>>, EcoStatsError> {
    if periods == 0 {
        return Err(EcoStatsError::InvalidArgument(
            "periods must be at least 1".to_string(),
        ));
    }
    Ok(percent_change(values, periods))
}

fn percent_change(values: &[f64], periods: usize) -> Vec<Option<f64>> {
    if values.len() <= periods {
        return Vec::new();
    }
    values
        .iter()
        .zip(values.iter().skip(periods))
        .map(|(&prev, &cur)| {
            if prev == 0.0 {
                None
            } else {
                Some((cur - prev) / prev * 100.0)
            }
        })
        .collect()
}

/// Trailing mean over each full window.
///
/// Returns `n - window + 1` values. Fails when `window` is zero or longer
/// than the series.
pub fn calculate_moving_average(values: &[f64], window: usize) -> Result<Vec<f64>, EcoStatsError> {
    if window == 0 {
        return Err(EcoStatsError::InvalidArgument(
            "window must be at least 1".to_string(),
        ));
    }
    if window > values.len() {
        return Err(EcoStatsError::InvalidArgument(format!(
            "window {} exceeds series length {}",
            window,
            values.len()
        )));
    }

    let mut sum: f64 = values[..window].iter().sum();
    let mut averages = Vec::with_capacity(values.len() - window + 1);
    averages.push(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        averages.push(sum / window as f64);
    }
    Ok(averages)
}
