//! Tick placement, tick label formatting, and dash patterns for gridlines.

use crate::rc::LineStyle;

/// "Nice" tick positions inside `[lo, hi]`: steps of 1, 2, 2.5 or 5 times a
/// power of ten, with at most `max_ticks` intervals across the range.
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo || max_ticks == 0 {
        return Vec::new();
    }
    let step = nice_step(hi - lo, max_ticks);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            // snap -0.0 and float noise like 0.30000000000000004
            if v.abs() < step * 1e-9 { 0.0 } else { v }
        })
        .collect()
}

/// Smallest nice step that splits `span` into at most `max_ticks` intervals.
pub fn nice_step(span: f64, max_ticks: usize) -> f64 {
    let raw = span / max_ticks.max(1) as f64;
    let mag = 10f64.powf(raw.log10().floor());
    for m in [1.0, 2.0, 2.5, 5.0, 10.0] {
        let step = m * mag;
        if span / step <= max_ticks as f64 {
            return step;
        }
    }
    10.0 * mag
}

/// Decimal places needed to tell ticks `step` apart.
pub fn decimals_for_step(step: f64) -> usize {
    if step <= 0.0 || !step.is_finite() {
        return 0;
    }
    let off = |d: usize| {
        let scaled = step * 10f64.powi(d as i32);
        (scaled.round() - scaled).abs()
    };
    let mut d = 0usize;
    while d < 8 && off(d) > 1e-6 {
        d += 1;
    }
    d
}

/// Format a tick value with a fixed number of decimals, avoiding "-0".
pub fn format_tick(v: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, v);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// Label for a category slot, or an empty string between slots.
pub fn category_label(v: f64, categories: &[String]) -> String {
    let i = v.round();
    if (v - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    categories.get(i as usize).cloned().unwrap_or_default()
}

/// On/off run lengths as fractions of the line length; empty means solid.
fn dash_pattern(style: LineStyle) -> &'static [f64] {
    match style {
        LineStyle::Solid => &[],
        LineStyle::Dashed => &[0.018, 0.008],
        LineStyle::Dotted => &[0.003, 0.007],
        LineStyle::DashDot => &[0.018, 0.006, 0.003, 0.006],
    }
}

/// Split `[a, b]` into the "on" runs of `style`'s dash pattern.
pub fn dash_segments(a: f64, b: f64, style: LineStyle) -> Vec<(f64, f64)> {
    let pattern = dash_pattern(style);
    let len = b - a;
    if pattern.is_empty() || len <= 0.0 {
        return vec![(a, b)];
    }
    let mut out = Vec::new();
    let mut pos = a;
    let mut i = 0usize;
    while pos < b {
        let run = pattern[i % pattern.len()] * len;
        let end = (pos + run).min(b);
        if i % 2 == 0 {
            out.push((pos, end));
        }
        pos = end;
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_round_and_inside() {
        assert_eq!(nice_ticks(0.0, 10.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(-0.5, 10.5, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.0, 10.0, 4), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        let t = nice_ticks(0.0, 1.0, 6);
        assert_eq!(t.len(), 6);
        assert!((t[3] - 0.6).abs() < 1e-12);
        assert!(nice_ticks(1.0, 1.0, 5).is_empty());
    }

    #[test]
    fn decimals_follow_step() {
        assert_eq!(decimals_for_step(2.0), 0);
        assert_eq!(decimals_for_step(2.5), 1);
        assert_eq!(decimals_for_step(0.2), 1);
        assert_eq!(decimals_for_step(0.025), 3);
        assert_eq!(format_tick(-0.0001, 2), "0.00");
        assert_eq!(format_tick(1234.5, 1), "1234.5");
    }

    #[test]
    fn category_labels_only_on_slots() {
        let cats = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(1.0, &cats), "b");
        assert_eq!(category_label(0.5, &cats), "");
        assert_eq!(category_label(2.0, &cats), "");
        assert_eq!(category_label(-1.0, &cats), "");
    }

    #[test]
    fn dashes_cover_part_of_the_line() {
        assert_eq!(dash_segments(0.0, 1.0, LineStyle::Solid), vec![(0.0, 1.0)]);
        let dashed = dash_segments(0.0, 1.0, LineStyle::Dashed);
        assert!(dashed.len() > 10);
        let on: f64 = dashed.iter().map(|(a, b)| b - a).sum();
        assert!(on > 0.5 && on < 0.9);
        assert!(dashed.iter().all(|(a, b)| a < b && *b <= 1.0));
    }
}
