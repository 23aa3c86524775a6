//! Presentation: turn a retained [`Axes`] into **SVG** or **PNG** through plotters.
//!
//! - Every color, font size and gridline style comes from the parameters the
//!   axes captured when they were created, never from the live configuration
//! - Gridlines are drawn as plain path segments so dashed and dotted theme
//!   styles work on every backend
//! - Legend placement `Best` is resolved here, against the final view limits

pub mod layout;
pub mod legend;
pub mod ticks;
pub mod util;

use crate::axes::{Artist, Axes};
use crate::error::{Result, render_err};
use crate::models::Output;
use crate::rc::RcKey;
use log::{debug, info};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use layout::{DPI, LabelText, fit_text, pt_to_px};
use legend::series_label_position;
use ticks::{category_label, dash_segments, decimals_for_step, format_tick, nice_ticks};
use util::{NONE, color, faded};

/// Upper bound on tick intervals per axis.
const MAX_TICKS: usize = 8;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        // from `src/viz/mod.rs` → project root → `assets/DejaVuSans.ttf`
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            debug!("bundled sans-serif font was rejected");
        }
    });
}

/// Render `axes` at `size` pixels. In-memory output is stored on the axes
/// (see [`Axes::svg`]); file output picks the backend from the extension.
pub fn present(axes: &mut Axes, size: (u32, u32), output: &Output) -> Result<()> {
    ensure_fonts_registered();
    match output {
        Output::Memory => {
            let mut buf = String::new();
            {
                let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
                draw_axes(&root, axes)?;
                root.present().map_err(render_err)?;
            }
            debug!("rendered {} bytes of SVG in memory", buf.len());
            axes.set_svg(buf);
        }
        Output::File(path) => {
            if is_png(path) {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                draw_axes(&root, axes)?;
                root.present().map_err(render_err)?;
            } else {
                let root = SVGBackend::new(path, size).into_drawing_area();
                draw_axes(&root, axes)?;
                root.present().map_err(render_err)?;
            }
            info!("wrote chart to {}", path.display());
        }
    }
    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

fn step_of(ticks: &[f64]) -> f64 {
    match ticks {
        [a, b, ..] => b - a,
        _ => 1.0,
    }
}

fn draw_axes<DB>(root: &DrawingArea<DB, Shift>, axes: &Axes) -> Result<()>
where
    DB: DrawingBackend,
{
    let p = axes.params();
    root.fill(&color(p.color(RcKey::FigureFaceColor)))
        .map_err(render_err)?;

    let tick_px = pt_to_px(p.number(RcKey::FontSize));
    let label_px = pt_to_px(p.number(RcKey::AxesLabelSize));
    let title_px = pt_to_px(p.number(RcKey::AxesTitleSize));
    let text_color = color(p.color(RcKey::TextColor));

    // ----------------------------
    // 1) Limits, ticks, gutters
    // ----------------------------
    let limits = axes.view_limits();
    let ((x0, x1), (y0, y1)) = limits;
    let categories = axes.x_categories();
    let x_ticks: Vec<f64> = match categories {
        Some(c) => (0..c.len()).map(|i| i as f64).collect(),
        None => nice_ticks(x0, x1, MAX_TICKS),
    };
    let y_ticks = nice_ticks(y0, y1, MAX_TICKS);
    let x_dec = decimals_for_step(step_of(&x_ticks));
    let y_dec = decimals_for_step(step_of(&y_ticks));
    let y_tick_labels: Vec<String> = y_ticks.iter().map(|v| format_tick(*v, y_dec)).collect();

    let gutters = if axes.is_tight() {
        layout::tight(LabelText {
            y_tick_labels: &y_tick_labels,
            tick_px,
            label_px,
            has_xlabel: axes.xlabel().is_some(),
            has_ylabel: axes.ylabel().is_some(),
        })
    } else {
        layout::loose()
    };

    // ----------------------------
    // 2) Chart frame and title
    // ----------------------------
    let (root_w, _) = root.dim_in_pixel();
    let mut builder = ChartBuilder::on(root);
    builder
        .margin(gutters.margin)
        .x_label_area_size(gutters.x_label_area)
        .y_label_area_size(gutters.y_label_area);
    if let Some(title) = axes.title().filter(|t| !t.is_empty()) {
        let avail = root_w.saturating_sub(2 * gutters.margin);
        builder.caption(
            fit_text(title, title_px, avail),
            (FontFamily::SansSerif, title_px)
                .into_font()
                .color(&text_color),
        );
    }
    let mut chart = builder
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;
    chart
        .plotting_area()
        .fill(&color(p.color(RcKey::AxesFaceColor)))
        .map_err(render_err)?;

    // ----------------------------
    // 3) Gridlines, under everything else
    // ----------------------------
    if let Some(alpha) = axes.grid_alpha() {
        let style = ShapeStyle {
            color: faded(p.color(RcKey::GridColor), alpha),
            filled: false,
            stroke_width: 1,
        };
        let dash = p.line_style(RcKey::GridLineStyle);
        let mut lines: Vec<PathElement<(f64, f64)>> = Vec::new();
        for &x in &x_ticks {
            for (a, b) in dash_segments(y0, y1, dash) {
                lines.push(PathElement::new(vec![(x, a), (x, b)], style));
            }
        }
        for &y in &y_ticks {
            for (a, b) in dash_segments(x0, x1, dash) {
                lines.push(PathElement::new(vec![(a, y), (b, y)], style));
            }
        }
        chart.draw_series(lines).map_err(render_err)?;
    }

    // ----------------------------
    // 4) Axis lines, tick labels, axis labels
    // ----------------------------
    {
        let x_fmt = |v: &f64| match categories {
            Some(c) => category_label(*v, c),
            None => format_tick(*v, x_dec),
        };
        let y_fmt = |v: &f64| format_tick(*v, y_dec);
        let tick_font = |key: RcKey| {
            (FontFamily::SansSerif, tick_px)
                .into_font()
                .color(&color(p.color(key)))
        };

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_labels(x_ticks.len().max(2))
            .y_labels(y_ticks.len().max(2))
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_label_style(tick_font(RcKey::XTickColor))
            .y_label_style(tick_font(RcKey::YTickColor))
            .axis_style(color(p.color(RcKey::AxesEdgeColor)).stroke_width(1))
            .axis_desc_style(
                (FontFamily::SansSerif, label_px)
                    .into_font()
                    .color(&color(p.color(RcKey::AxesLabelColor))),
            );
        if let Some(l) = axes.xlabel() {
            mesh.x_desc(l);
        }
        if let Some(l) = axes.ylabel() {
            mesh.y_desc(l);
        }
        mesh.draw().map_err(render_err)?;
    }

    // ----------------------------
    // 5) Artists, in call order
    // ----------------------------
    let with_legend = axes.legend_spec().is_some();
    for artist in axes.artists() {
        let style = artist.style();
        let c = faded(style.color, style.alpha);
        let anno = match artist {
            Artist::Scatter { points, .. } => {
                // marker size is an area in pt²; plotters wants a radius in px
                let radius = (style.size.sqrt() / 2.0 * DPI / 72.0).round().max(1.0) as i32;
                chart.draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), radius, c.filled())),
                )
            }
            Artist::Line { points, .. } => chart.draw_series(LineSeries::new(
                points.iter().copied(),
                c.stroke_width(pt_to_px(style.size)),
            )),
            Artist::Bars { bars, .. } => chart.draw_series(
                bars.iter()
                    .map(|b| Rectangle::new([(b.x0, 0.0), (b.x1, b.height)], c.filled())),
            ),
        }
        .map_err(render_err)?;

        if with_legend && let Some(label) = style.legend_label() {
            anno.label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], c.filled()));
        }
    }

    // ----------------------------
    // 6) Legend
    // ----------------------------
    if let Some(spec) = axes.legend_spec()
        && axes.has_legend_entries()
    {
        let loc = legend::resolve(spec.loc, axes.artists(), limits);
        let (background, border) = if spec.frameon {
            (
                faded(p.color(RcKey::AxesFaceColor), 0.8),
                color(p.color(RcKey::AxesEdgeColor)),
            )
        } else {
            (NONE, NONE)
        };
        chart
            .configure_series_labels()
            .position(series_label_position(loc))
            .background_style(background)
            .border_style(border)
            .label_font((FontFamily::SansSerif, tick_px).into_font().color(&text_color))
            .draw()
            .map_err(render_err)?;
        debug!("legend placed at {loc:?}");
    }

    Ok(())
}
