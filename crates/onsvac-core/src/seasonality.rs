//! Seasonality detection via autocorrelation.

/// Scan lags `2..=max_period` and return the one with the strongest
/// positive autocorrelation, or `None` when nothing clears the 0.3
/// threshold or the series is too short to judge.
///
/// The pipeline fits a 12-month season by construction; this check exists
/// so the driver can warn when the data disagrees.
pub fn detect_seasonality(data: &[f64], max_period: usize) -> Option<usize> {
    let n = data.len();
    if n < max_period * 2 {
        return None;
    }

    let mean = data.iter().sum::<f64>() / n as f64;
    let variance: f64 = data.iter().map(|x| (x - mean) * (x - mean)).sum();
    if variance <= f64::EPSILON {
        return None;
    }

    (2..=max_period.min(n / 2))
        .map(|lag| {
            let acf: f64 = data[..n - lag]
                .iter()
                .zip(&data[lag..])
                .map(|(a, b)| (a - mean) * (b - mean))
                .sum::<f64>()
                / variance;
            (lag, acf)
        })
        .filter(|&(_, acf)| acf > 0.3)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(lag, _)| lag)
}
