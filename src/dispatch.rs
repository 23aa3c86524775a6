//! The `quickplot` dispatcher: validate a request, apply its theme for the
//! duration of the call, draw the requested kind onto fresh axes, decorate
//! and present them.

use crate::axes::{Axes, BarX, LegendLoc};
use crate::data::{Column, DataFrame};
use crate::error::Result;
use crate::models::{Backend, ChartKind, ChartSpec, PlotRequest};
use crate::theme::ThemeScope;
use crate::viz;
use log::{debug, info};

/// Gridline opacity used when a request asks for a grid.
pub const GRID_ALPHA: f64 = 0.3;

/// Draw `data` as described by `req` and return the presented axes.
///
/// Kind and backend names are checked before anything else happens, so an
/// unsupported name never touches the rendering configuration. An unknown
/// theme name falls back to `modern`.
///
/// ```
/// use quickplot::{DataFrame, PlotRequest, quickplot};
///
/// let df = DataFrame::from_columns([
///     ("age", vec![23.0, 35.0, 47.0]),
///     ("income", vec![31_000.0, 52_000.0, 61_000.0]),
/// ])?;
/// let ax = quickplot(&df, &PlotRequest::new("scatter").x("age").y("income"))?;
/// assert_eq!(ax.title(), Some("Scatter of income vs age"));
/// assert!(ax.svg().is_some());
/// # Ok::<(), quickplot::PlotError>(())
/// ```
pub fn quickplot(data: &DataFrame, req: &PlotRequest) -> Result<Axes> {
    let spec = ChartSpec::try_from(req)?;
    quickplot_typed(data, &spec)
}

/// Same as [`quickplot`] for a request that is already validated.
pub fn quickplot_typed(data: &DataFrame, spec: &ChartSpec) -> Result<Axes> {
    match spec.backend {
        Backend::Plotters => {}
    }
    // Everything below runs under the theme; the scope restores the previous
    // configuration on every exit path, including `?` and panics.
    let _scope = ThemeScope::enter(spec.theme);

    let mut ax = Axes::new();
    draw_kind(&mut ax, data, spec)?;

    let title = spec
        .title
        .clone()
        .unwrap_or_else(|| default_title(spec.kind, spec.x.as_deref(), spec.y.as_deref()));
    ax.set_title(title);

    let (xlabel, ylabel) = default_labels(spec);
    if let Some(l) = xlabel {
        ax.set_xlabel(l);
    }
    if let Some(l) = ylabel {
        ax.set_ylabel(l);
    }

    if spec.grid {
        ax.grid(GRID_ALPHA);
    }
    if spec.legend {
        if ax.has_legend_entries() {
            ax.legend(LegendLoc::Best, false);
        } else {
            debug!("legend requested but no series carries a label; skipping");
        }
    }
    ax.tight_layout();

    viz::present(&mut ax, spec.size, &spec.output)?;
    info!(
        "{} chart drawn with theme '{}' ({} series)",
        spec.kind,
        spec.theme,
        ax.artists().len()
    );
    Ok(ax)
}

fn draw_kind(ax: &mut Axes, data: &DataFrame, spec: &ChartSpec) -> Result<()> {
    let x = spec.x.as_deref().ok_or_else(|| spec.kind.missing_column())?;
    let y = if spec.kind.needs_y() {
        Some(spec.y.as_deref().ok_or_else(|| spec.kind.missing_column())?)
    } else {
        None
    };

    match (spec.kind, y) {
        (ChartKind::Scatter, Some(y)) => {
            ax.scatter(data.numeric(x)?, data.numeric(y)?, &spec.style)
        }
        (ChartKind::Line, Some(y)) => ax.plot(data.numeric(x)?, data.numeric(y)?, &spec.style),
        (ChartKind::Bar, Some(y)) => {
            let heights = data.numeric(y)?;
            match data.column(x)? {
                Column::Numeric(v) => ax.bar(BarX::Numeric(v), heights, &spec.style),
                Column::Text(v) => ax.bar(BarX::Categories(v), heights, &spec.style),
            }
        }
        (ChartKind::Hist, _) => ax.hist(data.numeric(x)?, &spec.style),
        (_, None) => Err(spec.kind.missing_column()),
    }
}

/// "Scatter of income vs age", or "Hist of age" when there is no y.
pub fn default_title(kind: ChartKind, x: Option<&str>, y: Option<&str>) -> String {
    match (x, y) {
        (Some(x), Some(y)) => format!("{} of {y} vs {x}", kind.title_word()),
        (Some(x), _) => format!("{} of {x}", kind.title_word()),
        (None, _) => kind.title_word().to_string(),
    }
}

/// Axis labels: explicit text wins, otherwise the column names. Empty
/// strings mean no label.
fn default_labels(spec: &ChartSpec) -> (Option<String>, Option<String>) {
    let xlabel = spec.xlabel.clone().or_else(|| spec.x.clone());
    let ylabel = spec.ylabel.clone().or_else(|| spec.y.clone());
    (
        xlabel.filter(|l| !l.is_empty()),
        ylabel.filter(|l| !l.is_empty()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_name_kind_and_columns() {
        assert_eq!(
            default_title(ChartKind::Scatter, Some("age"), Some("income")),
            "Scatter of income vs age"
        );
        assert_eq!(
            default_title(ChartKind::Line, Some("t"), Some("v")),
            "Line of v vs t"
        );
        assert_eq!(default_title(ChartKind::Hist, Some("age"), None), "Hist of age");
        // y is only read by the kinds that need it, but still names the chart
        assert_eq!(
            default_title(ChartKind::Hist, Some("age"), Some("w")),
            "Hist of w vs age"
        );
        assert_eq!(default_title(ChartKind::Bar, None, None), "Bar");
    }

    #[test]
    fn labels_fall_back_to_columns() {
        let mut spec = ChartSpec::new(ChartKind::Scatter);
        spec.x = Some("age".into());
        spec.y = Some("income".into());
        assert_eq!(
            default_labels(&spec),
            (Some("age".into()), Some("income".into()))
        );

        spec.xlabel = Some("Age (years)".into());
        spec.ylabel = Some(String::new());
        assert_eq!(default_labels(&spec), (Some("Age (years)".into()), None));
    }
}
