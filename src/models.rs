//! Request types: chart kinds, backends, style options, outputs and the
//! validated chart spec the dispatcher works from.

use crate::error::PlotError;
use crate::theme::ThemeName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Chart kinds the dispatcher can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Markers only.
    Scatter,
    /// Connected polyline.
    Line,
    /// Vertical bars, categorical or numeric x.
    Bar,
    /// Histogram of the x column.
    Hist,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Hist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Hist => "hist",
        }
    }

    /// Kind name with its first letter upper-cased, as used in default titles.
    pub fn title_word(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter",
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Hist => "Hist",
        }
    }

    pub fn needs_y(&self) -> bool {
        !matches!(self, ChartKind::Hist)
    }

    fn requirement(&self) -> &'static str {
        if self.needs_y() { "x and y" } else { "x" }
    }

    /// Error for a call that left out a column this kind needs.
    pub(crate) fn missing_column(&self) -> PlotError {
        PlotError::MissingColumn {
            kind: self.title_word(),
            required: self.requirement(),
        }
    }
}

impl FromStr for ChartKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PlotError::UnsupportedKind(s.to_string()))
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering backends. Only one is implemented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Plotters,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Plotters => "plotters",
        }
    }
}

impl FromStr for Backend {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plotters" => Ok(Backend::Plotters),
            other => Err(PlotError::UnsupportedBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One style option value, forwarded to a draw primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl StyleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Int(i) => Some(*i as f64),
            StyleValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl FromStr for StyleValue {
    type Err = std::convert::Infallible;

    /// Command-line style: `true`/`false`, integers, floats, else a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s {
            "true" => StyleValue::Bool(true),
            "false" => StyleValue::Bool(false),
            _ => {
                if let Ok(i) = s.parse::<i64>() {
                    StyleValue::Int(i)
                } else if let Ok(f) = s.parse::<f64>() {
                    StyleValue::Float(f)
                } else {
                    StyleValue::Str(s.to_string())
                }
            }
        })
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Str(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Str(s)
    }
}

impl From<f64> for StyleValue {
    fn from(v: f64) -> Self {
        StyleValue::Float(v)
    }
}

impl From<i64> for StyleValue {
    fn from(v: i64) -> Self {
        StyleValue::Int(v)
    }
}

impl From<bool> for StyleValue {
    fn from(v: bool) -> Self {
        StyleValue::Bool(v)
    }
}

/// Open key → value set of extra style options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleOptions(BTreeMap<String, StyleValue>);

impl StyleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse `key=value`.
    pub fn parse_pair(s: &str) -> Option<(String, StyleValue)> {
        let (k, v) = s.split_once('=')?;
        let k = k.trim();
        if k.is_empty() {
            return None;
        }
        let Ok(v) = v.parse::<StyleValue>();
        Some((k.to_string(), v))
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = StyleOptions::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

/// Where the finished chart is presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Output {
    /// Render SVG into the returned handle.
    #[default]
    Memory,
    /// Write to a file; `.png` goes through the bitmap backend, anything else is SVG.
    File(PathBuf),
}

/// Default figure size in pixels (6.4 x 4.8 in at 100 dpi).
pub const DEFAULT_SIZE: (u32, u32) = (640, 480);

/// A chart request as received from a caller: kind, theme and backend are
/// plain names and are validated by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub x: Option<String>,
    pub y: Option<String>,
    pub kind: String,
    pub theme: String,
    pub backend: String,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub legend: bool,
    pub grid: bool,
    pub style: StyleOptions,
    pub size: (u32, u32),
    pub output: Output,
}

impl Default for PlotRequest {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            kind: ChartKind::Scatter.as_str().to_string(),
            theme: ThemeName::Modern.as_str().to_string(),
            backend: Backend::Plotters.as_str().to_string(),
            title: None,
            xlabel: None,
            ylabel: None,
            legend: true,
            grid: true,
            style: StyleOptions::new(),
            size: DEFAULT_SIZE,
            output: Output::Memory,
        }
    }
}

impl PlotRequest {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn x(mut self, col: impl Into<String>) -> Self {
        self.x = Some(col.into());
        self
    }

    pub fn y(mut self, col: impl Into<String>) -> Self {
        self.y = Some(col.into());
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn xlabel(mut self, label: impl Into<String>) -> Self {
        self.xlabel = Some(label.into());
        self
    }

    pub fn ylabel(mut self, label: impl Into<String>) -> Self {
        self.ylabel = Some(label.into());
        self
    }

    pub fn legend(mut self, on: bool) -> Self {
        self.legend = on;
        self
    }

    pub fn grid(mut self, on: bool) -> Self {
        self.grid = on;
        self
    }

    pub fn style(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.style.insert(key, value);
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }
}

/// A validated request with closed enums, for Rust callers that already
/// know what they want.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub x: Option<String>,
    pub y: Option<String>,
    pub kind: ChartKind,
    pub theme: ThemeName,
    pub backend: Backend,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub legend: bool,
    pub grid: bool,
    pub style: StyleOptions,
    pub size: (u32, u32),
    pub output: Output,
}

impl ChartSpec {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            x: None,
            y: None,
            kind,
            theme: ThemeName::default(),
            backend: Backend::default(),
            title: None,
            xlabel: None,
            ylabel: None,
            legend: true,
            grid: true,
            style: StyleOptions::new(),
            size: DEFAULT_SIZE,
            output: Output::Memory,
        }
    }
}

impl TryFrom<&PlotRequest> for ChartSpec {
    type Error = PlotError;

    /// Backend first, then kind; the theme never fails.
    fn try_from(req: &PlotRequest) -> Result<Self, Self::Error> {
        let backend = req.backend.parse::<Backend>()?;
        let kind = req.kind.parse::<ChartKind>()?;
        Ok(ChartSpec {
            x: req.x.clone(),
            y: req.y.clone(),
            kind,
            theme: ThemeName::resolve(&req.theme),
            backend,
            title: req.title.clone(),
            xlabel: req.xlabel.clone(),
            ylabel: req.ylabel.clone(),
            legend: req.legend,
            grid: req.grid,
            style: req.style.clone(),
            size: req.size,
            output: req.output.clone(),
        })
    }
}
