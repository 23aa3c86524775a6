//! Retained axes: what was drawn, how it is decorated, and which theme values
//! it was drawn under. This is the handle `quickplot` returns.

use crate::error::{PlotError, Result};
use crate::models::{StyleOptions, StyleValue};
use crate::rc::{self, COLOR_CYCLE, RcKey, RcParams, Rgba};
use log::debug;

/// Bar width in x units; categories sit 1.0 apart.
pub const DEFAULT_BAR_WIDTH: f64 = 0.8;
pub const DEFAULT_BINS: usize = 10;
/// Upper bound for the `bins` option; each bin is allocated up front.
pub const MAX_BINS: usize = 10_000;

/// Legend placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLoc {
    /// Corner with the fewest data points, resolved when presenting.
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Legend {
    pub loc: LegendLoc,
    pub frameon: bool,
}

/// Resolved visual attributes of one drawn series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: Option<String>,
    pub color: Rgba,
    pub alpha: f64,
    /// Marker area (pt²) for scatter, stroke width (pt) for lines; unused for bars.
    pub size: f64,
}

impl SeriesStyle {
    /// Labels that are empty or start with `_` are kept off the legend.
    pub fn legend_label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty() && !l.starts_with('_'))
    }
}

/// One bar in data coordinates, spanning `x0..x1` from 0 to `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x0: f64,
    pub x1: f64,
    pub height: f64,
}

/// Something drawn on the axes.
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Scatter {
        points: Vec<(f64, f64)>,
        style: SeriesStyle,
    },
    Line {
        points: Vec<(f64, f64)>,
        style: SeriesStyle,
    },
    Bars {
        bars: Vec<Bar>,
        style: SeriesStyle,
    },
}

impl Artist {
    pub fn style(&self) -> &SeriesStyle {
        match self {
            Artist::Scatter { style, .. } | Artist::Line { style, .. } | Artist::Bars { style, .. } => {
                style
            }
        }
    }

    /// Anchor points used for extent and legend placement.
    pub fn points(&self) -> Vec<(f64, f64)> {
        match self {
            Artist::Scatter { points, .. } | Artist::Line { points, .. } => points.clone(),
            Artist::Bars { bars, .. } => bars
                .iter()
                .map(|b| ((b.x0 + b.x1) / 2.0, b.height))
                .collect(),
        }
    }
}

/// x values for a bar chart.
#[derive(Debug, Clone, Copy)]
pub enum BarX<'a> {
    Numeric(&'a [f64]),
    /// Categories are placed at 0, 1, 2, … in first-seen order.
    Categories(&'a [String]),
}

/// Axis limits `((x_min, x_max), (y_min, y_max))`.
pub type Limits = ((f64, f64), (f64, f64));

#[derive(Debug, Clone)]
pub struct Axes {
    params: RcParams,
    artists: Vec<Artist>,
    title: Option<String>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    grid: Option<f64>,
    legend: Option<Legend>,
    x_categories: Option<Vec<String>>,
    tight: bool,
    svg: Option<String>,
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

impl Axes {
    /// New empty axes, styled by the rendering configuration in effect right now.
    pub fn new() -> Self {
        Self::with_params(rc::snapshot())
    }

    pub fn with_params(params: RcParams) -> Self {
        Self {
            params,
            artists: Vec::new(),
            title: None,
            xlabel: None,
            ylabel: None,
            grid: None,
            legend: None,
            x_categories: None,
            tight: false,
            svg: None,
        }
    }

    // ------------------------ Draw primitives ------------------------

    /// Markers at each `(x, y)`. Options: `label`, `color`, `alpha`, `s` (area in pt²).
    pub fn scatter(&mut self, xs: &[f64], ys: &[f64], opts: &StyleOptions) -> Result<()> {
        let o = OptReader::new("scatter", opts, &["label", "color", "alpha", "s"])?;
        let points = zip_finite(xs, ys)?;
        let marker = self.params.number(RcKey::LinesMarkerSize);
        let style = self.series_style(&o, o.positive("s")?.unwrap_or(marker * marker))?;
        self.artists.push(Artist::Scatter { points, style });
        Ok(())
    }

    /// Polyline through `(x, y)` in the given order. Options: `label`, `color`, `alpha`, `linewidth`.
    pub fn plot(&mut self, xs: &[f64], ys: &[f64], opts: &StyleOptions) -> Result<()> {
        let o = OptReader::new("plot", opts, &["label", "color", "alpha", "linewidth"])?;
        let points = zip_finite(xs, ys)?;
        let lw = self.params.number(RcKey::LinesLineWidth);
        let style = self.series_style(&o, o.positive("linewidth")?.unwrap_or(lw))?;
        self.artists.push(Artist::Line { points, style });
        Ok(())
    }

    /// One bar per `(x, height)`. Options: `label`, `color`, `alpha`, `width`.
    pub fn bar(&mut self, x: BarX<'_>, heights: &[f64], opts: &StyleOptions) -> Result<()> {
        let o = OptReader::new("bar", opts, &["label", "color", "alpha", "width"])?;
        let width = o.positive("width")?.unwrap_or(DEFAULT_BAR_WIDTH);
        let positions: Vec<f64> = match x {
            BarX::Numeric(v) => v.to_vec(),
            BarX::Categories(names) => self.category_positions(names),
        };
        let bars: Vec<Bar> = zip_finite(&positions, heights)?
            .into_iter()
            .map(|(x, h)| Bar {
                x0: x - width / 2.0,
                x1: x + width / 2.0,
                height: h,
            })
            .collect();
        let style = self.series_style(&o, 0.0)?;
        self.artists.push(Artist::Bars { bars, style });
        Ok(())
    }

    /// Equal-width histogram of the finite values. Options: `label`, `color`,
    /// `alpha`, `bins`, `density`.
    pub fn hist(&mut self, values: &[f64], opts: &StyleOptions) -> Result<()> {
        let o = OptReader::new(
            "hist",
            opts,
            &["label", "color", "alpha", "bins", "density"],
        )?;
        if values.is_empty() {
            return Err(PlotError::EmptyData);
        }
        let bins = o.bins()?.unwrap_or(DEFAULT_BINS);
        let density = o.flag("density")?.unwrap_or(false);
        let bars = histogram(values, bins, density)?;
        let style = self.series_style(&o, 0.0)?;
        self.artists.push(Artist::Bars { bars, style });
        Ok(())
    }

    fn category_positions(&mut self, names: &[String]) -> Vec<f64> {
        let cats = self.x_categories.get_or_insert_with(Vec::new);
        names
            .iter()
            .map(|n| match cats.iter().position(|c| c == n) {
                Some(i) => i as f64,
                None => {
                    cats.push(n.clone());
                    (cats.len() - 1) as f64
                }
            })
            .collect()
    }

    fn series_style(&self, o: &OptReader<'_>, size: f64) -> Result<SeriesStyle> {
        let color = match o.color()? {
            Some(c) => c,
            None => COLOR_CYCLE[self.artists.len() % COLOR_CYCLE.len()],
        };
        Ok(SeriesStyle {
            label: o.label(),
            color,
            alpha: o.alpha()?.unwrap_or(1.0),
            size,
        })
    }

    // ------------------------ Decorations ------------------------

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.xlabel = Some(label.into());
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.ylabel = Some(label.into());
    }

    /// Turn gridlines on with the given opacity; color and stroke come from the theme.
    pub fn grid(&mut self, alpha: f64) {
        self.grid = Some(alpha.clamp(0.0, 1.0));
    }

    pub fn legend(&mut self, loc: LegendLoc, frameon: bool) {
        self.legend = Some(Legend { loc, frameon });
    }

    /// Fit label areas to the text that will be drawn instead of fixed gutters.
    pub fn tight_layout(&mut self) {
        self.tight = true;
    }

    // ------------------------ Accessors ------------------------

    pub fn params(&self) -> &RcParams {
        &self.params
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn xlabel(&self) -> Option<&str> {
        self.xlabel.as_deref()
    }

    pub fn ylabel(&self) -> Option<&str> {
        self.ylabel.as_deref()
    }

    pub fn grid_alpha(&self) -> Option<f64> {
        self.grid
    }

    pub fn legend_spec(&self) -> Option<Legend> {
        self.legend
    }

    pub fn x_categories(&self) -> Option<&[String]> {
        self.x_categories.as_deref()
    }

    pub fn is_tight(&self) -> bool {
        self.tight
    }

    /// SVG markup, when the chart was presented in memory.
    pub fn svg(&self) -> Option<&str> {
        self.svg.as_deref()
    }

    pub(crate) fn set_svg(&mut self, svg: String) {
        self.svg = Some(svg);
    }

    /// `(label, color)` for every artist that belongs on a legend.
    pub fn legend_entries(&self) -> Vec<(&str, Rgba)> {
        self.artists
            .iter()
            .filter_map(|a| a.style().legend_label().map(|l| (l, a.style().color)))
            .collect()
    }

    pub fn has_legend_entries(&self) -> bool {
        !self.legend_entries().is_empty()
    }

    /// Data extent padded by 5% per side. Bars keep their 0 baseline on the
    /// edge; an empty or zero-width span is widened to ±1 (±0.5 for categories).
    pub fn view_limits(&self) -> Limits {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        let mut sticky_zero = false;
        fn widen(r: &mut (f64, f64), v: f64) {
            r.0 = r.0.min(v);
            r.1 = r.1.max(v);
        }
        for artist in &self.artists {
            match artist {
                Artist::Scatter { points, .. } | Artist::Line { points, .. } => {
                    for &(px, py) in points {
                        widen(&mut x, px);
                        widen(&mut y, py);
                    }
                }
                Artist::Bars { bars, .. } => {
                    sticky_zero = sticky_zero || !bars.is_empty();
                    for b in bars {
                        widen(&mut x, b.x0);
                        widen(&mut x, b.x1);
                        widen(&mut y, 0.0);
                        widen(&mut y, b.height);
                    }
                }
            }
        }
        let x = pad(x, false);
        let y = pad(y, sticky_zero);
        (x, y)
    }
}

fn pad((lo, hi): (f64, f64), sticky_zero: bool) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let m = (hi - lo) * 0.05;
    let lo = if sticky_zero && lo == 0.0 { 0.0 } else { lo - m };
    let hi = if sticky_zero && hi == 0.0 { 0.0 } else { hi + m };
    (lo, hi)
}

/// Pair up x and y, dropping rows where either is NaN or infinite.
fn zip_finite(xs: &[f64], ys: &[f64]) -> Result<Vec<(f64, f64)>> {
    if xs.len() != ys.len() {
        return Err(PlotError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(PlotError::EmptyData);
    }
    Ok(xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .collect())
}

/// Equal-width bins over `[min, max]`; the last bin includes `max`.
/// Single-valued input spans `value ± 0.5`. `bins` is clamped to
/// [`MAX_BINS`], and a span that overflows `f64` is an error.
pub fn histogram(values: &[f64], bins: usize, density: bool) -> Result<Vec<Bar>> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let bins = bins.min(MAX_BINS);
    if finite.is_empty() || bins == 0 {
        return Ok(Vec::new());
    }
    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    if !(hi - lo).is_finite() {
        return Err(PlotError::RangeTooWide { lo, hi });
    }
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let scale = if density {
        1.0 / (finite.len() as f64 * width)
    } else {
        1.0
    };
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| Bar {
            x0: lo + i as f64 * width,
            x1: lo + (i + 1) as f64 * width,
            height: c as f64 * scale,
        })
        .collect())
}

/// Validates and reads the style options handed to one primitive.
struct OptReader<'a> {
    opts: &'a StyleOptions,
}

impl<'a> OptReader<'a> {
    fn new(primitive: &'static str, opts: &'a StyleOptions, allowed: &[&str]) -> Result<Self> {
        if let Some(key) = opts.keys().find(|k| !allowed.contains(k)) {
            debug!("{primitive}: rejecting style option '{key}'");
            return Err(PlotError::UnknownStyleOption {
                primitive,
                key: key.to_string(),
            });
        }
        Ok(Self { opts })
    }

    fn invalid(key: &str, expected: &'static str) -> PlotError {
        PlotError::InvalidStyleOption {
            key: key.to_string(),
            expected,
        }
    }

    fn label(&self) -> Option<String> {
        self.opts.get("label").map(|v| match v {
            StyleValue::Str(s) => s.clone(),
            StyleValue::Int(i) => i.to_string(),
            StyleValue::Float(f) => f.to_string(),
            StyleValue::Bool(b) => b.to_string(),
        })
    }

    fn color(&self) -> Result<Option<Rgba>> {
        match self.opts.get("color") {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .and_then(Rgba::parse)
                .map(Some)
                .ok_or_else(|| Self::invalid("color", "a color such as '#1f77b4', 'C2' or 'red'")),
        }
    }

    fn alpha(&self) -> Result<Option<f64>> {
        match self.opts.get("alpha") {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .filter(|a| (0.0..=1.0).contains(a))
                .map(Some)
                .ok_or_else(|| Self::invalid("alpha", "a number in [0, 1]")),
        }
    }

    fn positive(&self, key: &str) -> Result<Option<f64>> {
        match self.opts.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .filter(|x| x.is_finite() && *x > 0.0)
                .map(Some)
                .ok_or_else(|| Self::invalid(key, "a positive number")),
        }
    }

    fn bins(&self) -> Result<Option<usize>> {
        let expected = "a positive integer up to 10000";
        match self.opts.get("bins") {
            None => Ok(None),
            Some(StyleValue::Int(n)) => usize::try_from(*n)
                .ok()
                .filter(|n| (1..=MAX_BINS).contains(n))
                .map(Some)
                .ok_or_else(|| Self::invalid("bins", expected)),
            Some(_) => Err(Self::invalid("bins", expected)),
        }
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        match self.opts.get(key) {
            None => Ok(None),
            Some(StyleValue::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(Self::invalid(key, "true or false")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes() -> Axes {
        Axes::with_params(RcParams::default())
    }

    #[test]
    fn scatter_drops_non_finite_rows() {
        let mut ax = axes();
        ax.scatter(&[1.0, f64::NAN, 3.0], &[4.0, 5.0, 6.0], &StyleOptions::new())
            .unwrap();
        match &ax.artists()[0] {
            Artist::Scatter { points, style } => {
                assert_eq!(points, &vec![(1.0, 4.0), (3.0, 6.0)]);
                assert_eq!(style.size, 36.0);
                assert_eq!(style.color, COLOR_CYCLE[0]);
            }
            other => panic!("unexpected artist {other:?}"),
        }
    }

    #[test]
    fn colors_follow_the_cycle() {
        let mut ax = axes();
        let o = StyleOptions::new();
        ax.plot(&[0.0, 1.0], &[0.0, 1.0], &o).unwrap();
        ax.plot(&[0.0, 1.0], &[1.0, 0.0], &o).unwrap();
        assert_eq!(ax.artists()[1].style().color, COLOR_CYCLE[1]);
    }

    #[test]
    fn unknown_option_is_rejected_per_primitive() {
        let mut ax = axes();
        let opts = StyleOptions::new().with("bins", 5i64);
        let err = ax.scatter(&[1.0], &[1.0], &opts).unwrap_err();
        assert!(matches!(
            err,
            PlotError::UnknownStyleOption { primitive: "scatter", ref key } if key == "bins"
        ));
        assert!(ax.hist(&[1.0, 2.0], &opts).is_ok());
    }

    #[test]
    fn bad_option_values_are_rejected() {
        let mut ax = axes();
        let bad_alpha = StyleOptions::new().with("alpha", 2.0);
        assert!(matches!(
            ax.plot(&[1.0], &[1.0], &bad_alpha),
            Err(PlotError::InvalidStyleOption { .. })
        ));
        let bad_color = StyleOptions::new().with("color", "not-a-color");
        assert!(ax.plot(&[1.0], &[1.0], &bad_color).is_err());
        let bad_bins = StyleOptions::new().with("bins", 0i64);
        assert!(ax.hist(&[1.0], &bad_bins).is_err());
        assert!(ax.artists().is_empty());
    }

    #[test]
    fn mismatched_lengths_fail() {
        let mut ax = axes();
        assert!(matches!(
            ax.plot(&[1.0, 2.0], &[1.0], &StyleOptions::new()),
            Err(PlotError::LengthMismatch { x: 2, y: 1 })
        ));
    }

    #[test]
    fn categorical_bars_take_slots_in_first_seen_order() {
        let mut ax = axes();
        let cats: Vec<String> = ["b", "a", "b"].iter().map(|s| s.to_string()).collect();
        ax.bar(BarX::Categories(&cats), &[1.0, 2.0, 3.0], &StyleOptions::new())
            .unwrap();
        assert_eq!(ax.x_categories().unwrap(), ["b", "a"]);
        match &ax.artists()[0] {
            Artist::Bars { bars, .. } => {
                assert_eq!(bars[0].x0, -0.4);
                assert!((bars[1].x1 - 1.4).abs() < 1e-12);
                assert_eq!(bars[2].x0, -0.4);
            }
            other => panic!("unexpected artist {other:?}"),
        }
        let ((_, _), (y0, _)) = ax.view_limits();
        assert_eq!(y0, 0.0);
    }

    #[test]
    fn histogram_counts_and_closes_last_bin() {
        let bars = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4, false).unwrap();
        let counts: Vec<f64> = bars.iter().map(|b| b.height).collect();
        assert_eq!(counts, vec![1.0, 1.0, 1.0, 2.0]);
        assert_eq!(bars[0].x0, 0.0);
        assert_eq!(bars[3].x1, 4.0);

        let dens = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4, true).unwrap();
        let area: f64 = dens.iter().map(|b| b.height * (b.x1 - b.x0)).sum();
        assert!((area - 1.0).abs() < 1e-9);

        let single = histogram(&[7.0, 7.0], 2, false).unwrap();
        assert_eq!(single[0].x0, 6.5);
        assert_eq!(single[1].x1, 7.5);
    }

    #[test]
    fn bin_count_is_bounded() {
        for bins in [0i64, -3, MAX_BINS as i64 + 1, i64::MAX] {
            let mut ax = axes();
            let err = ax
                .hist(&[1.0, 2.0], &StyleOptions::new().with("bins", bins))
                .unwrap_err();
            assert!(
                matches!(err, PlotError::InvalidStyleOption { ref key, .. } if key == "bins"),
                "bins={bins}"
            );
            assert!(ax.artists().is_empty());
        }

        let mut ax = axes();
        ax.hist(&[1.0, 2.0], &StyleOptions::new().with("bins", MAX_BINS as i64))
            .unwrap();
        match &ax.artists()[0] {
            Artist::Bars { bars, .. } => assert_eq!(bars.len(), MAX_BINS),
            other => panic!("unexpected artist {other:?}"),
        }

        // direct callers are clamped rather than rejected
        assert_eq!(histogram(&[1.0, 2.0], usize::MAX, false).unwrap().len(), MAX_BINS);
    }

    #[test]
    fn histogram_rejects_a_span_wider_than_f64() {
        let err = histogram(&[-1e308, 1e308], 10, false).unwrap_err();
        assert!(matches!(err, PlotError::RangeTooWide { .. }));

        let mut ax = axes();
        let err = ax.hist(&[-1e308, 0.0, 1e308], &StyleOptions::new()).unwrap_err();
        assert!(matches!(err, PlotError::RangeTooWide { .. }));
        assert!(ax.artists().is_empty());

        // wide but representable spans still bin
        let bars = histogram(&[-1e307, 1e307], 4, false).unwrap();
        assert!(bars.iter().all(|b| b.x0.is_finite() && b.x1.is_finite()));
    }

    #[test]
    fn legend_labels_skip_blank_and_underscore() {
        let mut ax = axes();
        ax.plot(&[0.0], &[0.0], &StyleOptions::new()).unwrap();
        ax.plot(&[0.0], &[0.0], &StyleOptions::new().with("label", "_nolegend_"))
            .unwrap();
        ax.plot(&[0.0], &[0.0], &StyleOptions::new().with("label", ""))
            .unwrap();
        assert!(!ax.has_legend_entries());
        ax.plot(&[0.0], &[0.0], &StyleOptions::new().with("label", "Series A"))
            .unwrap();
        assert_eq!(ax.legend_entries(), vec![("Series A", COLOR_CYCLE[3])]);
    }

    #[test]
    fn limits_pad_and_widen() {
        let mut ax = axes();
        assert_eq!(ax.view_limits(), ((0.0, 1.0), (0.0, 1.0)));
        ax.scatter(&[0.0, 10.0], &[5.0, 5.0], &StyleOptions::new())
            .unwrap();
        let ((x0, x1), (y0, y1)) = ax.view_limits();
        assert_eq!((x0, x1), (-0.5, 10.5));
        assert_eq!((y0, y1), (4.0, 6.0));
    }
}
