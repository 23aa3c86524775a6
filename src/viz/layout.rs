//! Text measurement and label-area sizing ("tight layout").
//!
//! Plotters has no text measuring for the `ab_glyph` path at layout time, so
//! widths are estimated from character counts.

/// Output resolution used to turn point sizes into pixels.
pub const DPI: f64 = 100.0;

/// Point size → whole pixels, never below 1.
pub fn pt_to_px(pt: f64) -> u32 {
    (pt * DPI / 72.0).round().max(1.0) as u32
}

/// Heuristic pixel width of `text` at `font_px`.
pub fn text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Shorten `text` with a trailing ellipsis until it fits `max_px`.
pub fn fit_text(text: &str, font_px: u32, max_px: u32) -> String {
    if text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out: String = text.to_string();
    while !out.is_empty() && text_width_px(&format!("{out}…"), font_px) > max_px {
        out.pop();
    }
    format!("{}…", out.trim_end())
}

/// Gutters handed to the chart builder, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub margin: u32,
    /// Space below the plot for x tick labels and the x label.
    pub x_label_area: u32,
    /// Space left of the plot for y tick labels and the y label.
    pub y_label_area: u32,
}

/// What the label areas have to hold.
#[derive(Debug, Clone, Copy)]
pub struct LabelText<'a> {
    pub y_tick_labels: &'a [String],
    pub tick_px: u32,
    pub label_px: u32,
    pub has_xlabel: bool,
    pub has_ylabel: bool,
}

const TICK_LEN_PX: u32 = 5;
const PAD_PX: u32 = 4;

/// Fixed gutters used when tight layout is off.
pub fn loose() -> Layout {
    Layout {
        margin: 20,
        x_label_area: 50,
        y_label_area: 64,
    }
}

/// Gutters sized to the labels that will actually be drawn.
pub fn tight(text: LabelText<'_>) -> Layout {
    let widest_tick = text
        .y_tick_labels
        .iter()
        .map(|t| text_width_px(t, text.tick_px))
        .max()
        .unwrap_or(0);
    let label_band = |on: bool| if on { text.label_px + 2 * PAD_PX } else { 0 };

    let y_label_area = widest_tick + TICK_LEN_PX + 2 * PAD_PX + label_band(text.has_ylabel);
    let x_label_area = text.tick_px + TICK_LEN_PX + 2 * PAD_PX + label_band(text.has_xlabel);

    Layout {
        margin: 10,
        x_label_area: x_label_area.clamp(20, 160),
        y_label_area: y_label_area.clamp(24, 200),
    }
}
