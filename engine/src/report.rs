// Console report for evaluated signals.
use engine::signals::SignalResult;
use engine::watcher::CycleSummary;
use shared::utils::format_thousands;

/// Presentation label for a signal score.
pub fn score_label(score: i32) -> &'static str {
    match score {
        s if s >= 3 => "strong buy",
        2 => "buy",
        1 => "lean buy",
        0 => "neutral",
        -1 => "lean sell",
        -2 => "sell",
        _ => "strong sell",
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format_thousands(v, decimals))
}

pub fn render_result(result: &SignalResult) -> String {
    let row = &result.snapshot;
    let mut out = format!(
        "{} | price {} | score {} ({})\n  RSI {} | MA5 {} | MA20 {} | MA60 {}",
        result.asset,
        format_thousands(result.current_price, 0),
        result.score,
        score_label(result.score),
        fmt_opt(row.rsi, 2),
        fmt_opt(row.ma5, 0),
        fmt_opt(row.ma20, 0),
        fmt_opt(row.ma60, 0),
    );
    if row.adx.is_some() {
        out.push_str(&format!(
            "\n  Stoch %K {} %D {} | ADX {} (+DI {} / -DI {}) | OBV {} (avg {})",
            fmt_opt(row.stoch_k, 2),
            fmt_opt(row.stoch_d, 2),
            fmt_opt(row.adx, 2),
            fmt_opt(row.plus_di, 2),
            fmt_opt(row.minus_di, 2),
            fmt_opt(row.obv, 0),
            fmt_opt(row.obv_ma, 0),
        ));
    }
    for observation in &result.observations {
        out.push_str("\n  - ");
        out.push_str(observation);
    }
    out
}

pub fn render_cycle(summary: &CycleSummary) {
    if !summary.added.is_empty() {
        tracing::info!(added = ?summary.added, "Added top traded assets to the watch set");
    }
    for result in &summary.results {
        tracing::info!("\n{}", render_result(result));
    }
    for asset in &summary.skipped {
        tracing::info!(asset = %asset, "No analysis this cycle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::indicators::IndicatorRow;

    #[test]
    fn test_score_labels() {
        assert_eq!(score_label(7), "strong buy");
        assert_eq!(score_label(3), "strong buy");
        assert_eq!(score_label(2), "buy");
        assert_eq!(score_label(0), "neutral");
        assert_eq!(score_label(-2), "sell");
        assert_eq!(score_label(-3), "strong sell");
        assert_eq!(score_label(-10), "strong sell");
    }

    #[test]
    fn test_render_result_lists_observations() {
        let result = SignalResult {
            asset: "KRW-BTC".to_string(),
            current_price: 95_123_456.0,
            observations: vec!["RSI oversold (buy signal)".to_string()],
            score: 1,
            snapshot: IndicatorRow {
                rsi: Some(28.5),
                ..Default::default()
            },
        };
        let text = render_result(&result);
        assert!(text.starts_with("KRW-BTC | price 95,123,456 | score 1 (lean buy)"));
        assert!(text.contains("RSI 28.50"));
        assert!(text.contains("MA60 -"));
        assert!(text.ends_with("- RSI oversold (buy signal)"));
    }
}
