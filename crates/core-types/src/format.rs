/// Clamps a raw consumption reading to a finite, non-negative value.
///
/// Missing or corrupt readings (NaN, infinities, negatives) become `0.0` so that
/// downstream arithmetic stays total.
pub fn sanitize_consumption(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Renders a signed variance percentage with one decimal place, e.g. `+23.1%`.
///
/// Values that round to zero always render as `+0.0%`, never `-0.0%`.
pub fn format_variance_pct(value: f64) -> String {
    let rounded = if value.is_finite() {
        (value * 10.0).round() / 10.0
    } else {
        0.0
    };
    // `-0.0 == 0.0`, so this also normalizes negative zero.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:+.1}%", rounded)
}
