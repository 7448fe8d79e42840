// Rolling-window primitives shared by the indicator calculators.
// Every function returns one entry per input value; entries without a full
// window are `None`.

/// Simple moving average using a running sum.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let mut results = vec![None; period - 1];
    let mut sum: f64 = values.iter().take(period).sum();
    results.push(Some(sum / period as f64));

    for i in period..values.len() {
        sum = sum - values[i - period] + values[i];
        results.push(Some(sum / period as f64));
    }
    results
}

/// Simple moving average over a partially defined series. A window with any
/// undefined value yields `None`.
pub fn rolling_mean_opt(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            let sum = window.iter().try_fold(0.0, |acc, v| v.map(|x| acc + x))?;
            Some(sum / period as f64)
        })
        .collect()
}

/// Rolling sample standard deviation (n - 1 denominator).
pub fn rolling_sample_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }
    let means = rolling_mean(values, period);
    means
        .iter()
        .enumerate()
        .map(|(i, mean)| {
            let mean = (*mean)?;
            let window = &values[i + 1 - period..=i];
            let sq_sum: f64 = window.iter().map(|x| (x - mean) * (x - mean)).sum();
            Some((sq_sum / (period - 1) as f64).sqrt())
        })
        .collect()
}

pub fn rolling_max(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling_fold(values, period, f64::max)
}

pub fn rolling_min(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling_fold(values, period, f64::min)
}

fn rolling_fold(values: &[f64], period: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            values[i + 1 - period..=i].iter().copied().reduce(pick)
        })
        .collect()
}

/// Exponential moving average seeded with the SMA of the first `period`
/// consecutive defined values. Undefined values before the seed are skipped;
/// an undefined value after the seed ends the series.
pub fn ema(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut results = vec![None; values.len()];
    if period == 0 {
        return results;
    }

    let mut run = 0;
    let mut seed_end = None;
    for (i, v) in values.iter().enumerate() {
        if v.is_some() {
            run += 1;
            if run == period {
                seed_end = Some(i);
                break;
            }
        } else {
            run = 0;
        }
    }
    let Some(seed_end) = seed_end else {
        return results;
    };

    let multiplier = 2.0 / (period as f64 + 1.0);
    let seed_sum: f64 = values[seed_end + 1 - period..=seed_end].iter().flatten().sum();
    let mut previous = seed_sum / period as f64;
    results[seed_end] = Some(previous);

    for (i, v) in values.iter().enumerate().skip(seed_end + 1) {
        let Some(value) = v else { break };
        let current = (value - previous) * multiplier + previous;
        results[i] = Some(current);
        previous = current;
    }
    results
}
