//! Global rendering configuration: the visual defaults every draw call reads.
//!
//! The configuration is a full key → value table. Draw primitives capture it
//! when an [`Axes`](crate::axes::Axes) is created and the presenter reads the
//! captured copy, so anything that changes the table (a theme scope, a caller
//! using [`set`]) only affects charts started afterwards.
//!
//! There is one table per process. Each accessor takes the lock for a single
//! read or write; callers that render from several threads at once must
//! serialize those renders themselves, as theme scopes snapshot and restore
//! the whole table.

use crate::error::{PlotError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, a color-cycle reference `C0`..`C9`,
    /// or one of a handful of basic color names.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(idx) = s.strip_prefix('C').and_then(|n| n.parse::<usize>().ok()) {
            return Some(COLOR_CYCLE[idx % COLOR_CYCLE.len()]);
        }
        let named = match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Rgba::WHITE,
            "black" | "k" => Rgba::BLACK,
            "red" | "r" => Rgba::rgb(255, 0, 0),
            "green" | "g" => Rgba::rgb(0, 128, 0),
            "blue" | "b" => Rgba::rgb(0, 0, 255),
            "gray" | "grey" => Rgba::rgb(128, 128, 128),
            "orange" => Rgba::rgb(255, 165, 0),
            "purple" => Rgba::rgb(128, 0, 128),
            "yellow" | "y" => Rgba::rgb(255, 255, 0),
            "cyan" | "c" => Rgba::rgb(0, 255, 255),
            "magenta" | "m" => Rgba::rgb(255, 0, 255),
            _ => return None,
        };
        Some(named)
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    // byte slicing below needs every char to be one byte wide
    if !hex.is_ascii() {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Rgba::rgb(it.next()??, it.next()??, it.next()??))
        }
        6 => Some(Rgba::rgb(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        8 => Some(Rgba::new(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => None,
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Series color cycle (tab10), used in draw order.
pub const COLOR_CYCLE: [Rgba; 10] = [
    Rgba::rgb(0x1f, 0x77, 0xb4), // blue
    Rgba::rgb(0xff, 0x7f, 0x0e), // orange
    Rgba::rgb(0x2c, 0xa0, 0x2c), // green
    Rgba::rgb(0xd6, 0x27, 0x28), // red
    Rgba::rgb(0x94, 0x67, 0xbd), // purple
    Rgba::rgb(0x8c, 0x56, 0x4b), // brown
    Rgba::rgb(0xe3, 0x77, 0xc2), // pink
    Rgba::rgb(0x7f, 0x7f, 0x7f), // gray
    Rgba::rgb(0xbc, 0xbd, 0x22), // olive
    Rgba::rgb(0x17, 0xbe, 0xcf), // cyan
];

/// Stroke pattern for grid lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

/// Every configurable key. Displayed under its conventional dotted name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RcKey {
    #[serde(rename = "axes.facecolor")]
    AxesFaceColor,
    #[serde(rename = "figure.facecolor")]
    FigureFaceColor,
    #[serde(rename = "axes.edgecolor")]
    AxesEdgeColor,
    #[serde(rename = "axes.labelcolor")]
    AxesLabelColor,
    #[serde(rename = "xtick.color")]
    XTickColor,
    #[serde(rename = "ytick.color")]
    YTickColor,
    #[serde(rename = "text.color")]
    TextColor,
    #[serde(rename = "axes.labelsize")]
    AxesLabelSize,
    #[serde(rename = "axes.titlesize")]
    AxesTitleSize,
    #[serde(rename = "font.size")]
    FontSize,
    #[serde(rename = "grid.color")]
    GridColor,
    #[serde(rename = "grid.linestyle")]
    GridLineStyle,
    #[serde(rename = "grid.alpha")]
    GridAlpha,
    #[serde(rename = "lines.linewidth")]
    LinesLineWidth,
    #[serde(rename = "lines.markersize")]
    LinesMarkerSize,
}

impl RcKey {
    pub const ALL: [RcKey; 15] = [
        RcKey::AxesFaceColor,
        RcKey::FigureFaceColor,
        RcKey::AxesEdgeColor,
        RcKey::AxesLabelColor,
        RcKey::XTickColor,
        RcKey::YTickColor,
        RcKey::TextColor,
        RcKey::AxesLabelSize,
        RcKey::AxesTitleSize,
        RcKey::FontSize,
        RcKey::GridColor,
        RcKey::GridLineStyle,
        RcKey::GridAlpha,
        RcKey::LinesLineWidth,
        RcKey::LinesMarkerSize,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RcKey::AxesFaceColor => "axes.facecolor",
            RcKey::FigureFaceColor => "figure.facecolor",
            RcKey::AxesEdgeColor => "axes.edgecolor",
            RcKey::AxesLabelColor => "axes.labelcolor",
            RcKey::XTickColor => "xtick.color",
            RcKey::YTickColor => "ytick.color",
            RcKey::TextColor => "text.color",
            RcKey::AxesLabelSize => "axes.labelsize",
            RcKey::AxesTitleSize => "axes.titlesize",
            RcKey::FontSize => "font.size",
            RcKey::GridColor => "grid.color",
            RcKey::GridLineStyle => "grid.linestyle",
            RcKey::GridAlpha => "grid.alpha",
            RcKey::LinesLineWidth => "lines.linewidth",
            RcKey::LinesMarkerSize => "lines.markersize",
        }
    }

    /// Library default for this key.
    pub fn default_value(&self) -> RcValue {
        match self {
            RcKey::AxesFaceColor | RcKey::FigureFaceColor => RcValue::Color(Rgba::WHITE),
            RcKey::AxesEdgeColor
            | RcKey::AxesLabelColor
            | RcKey::XTickColor
            | RcKey::YTickColor
            | RcKey::TextColor => RcValue::Color(Rgba::BLACK),
            RcKey::AxesLabelSize | RcKey::FontSize => RcValue::Size(10.0),
            RcKey::AxesTitleSize => RcValue::Size(12.0),
            RcKey::GridColor => RcValue::Color(Rgba::rgb(0xb0, 0xb0, 0xb0)),
            RcKey::GridLineStyle => RcValue::LineStyle(LineStyle::Solid),
            RcKey::GridAlpha => RcValue::Alpha(1.0),
            RcKey::LinesLineWidth => RcValue::Size(1.5),
            RcKey::LinesMarkerSize => RcValue::Size(6.0),
        }
    }

    /// Check that `value` has the shape this key stores.
    pub fn validate(&self, value: &RcValue) -> Result<()> {
        let ok = match (self.default_value(), value) {
            (RcValue::Color(_), RcValue::Color(_)) => true,
            (RcValue::Size(_), RcValue::Size(s)) => s.is_finite() && *s > 0.0,
            (RcValue::Alpha(_), RcValue::Alpha(a)) => (0.0..=1.0).contains(a),
            (RcValue::LineStyle(_), RcValue::LineStyle(_)) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(PlotError::InvalidRcValue {
                key: self.name(),
                expected: self.default_value().kind_name(),
            })
        }
    }
}

impl fmt::Display for RcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One configuration value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RcValue {
    Color(Rgba),
    /// Font or line size in points.
    Size(f64),
    /// Opacity in `[0, 1]`.
    Alpha(f64),
    LineStyle(LineStyle),
}

impl RcValue {
    fn kind_name(&self) -> &'static str {
        match self {
            RcValue::Color(_) => "a color",
            RcValue::Size(_) => "a positive size",
            RcValue::Alpha(_) => "an alpha in [0, 1]",
            RcValue::LineStyle(_) => "a line style",
        }
    }
}

/// A key → value table. [`RcParams::default`] is the full library default
/// table; theme definitions are partial tables of overrides.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RcParams(BTreeMap<RcKey, RcValue>);

impl Default for RcParams {
    fn default() -> Self {
        Self(RcKey::ALL.iter().map(|k| (*k, k.default_value())).collect())
    }
}

impl RcParams {
    /// An empty table, for building override sets.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: RcKey, value: RcValue) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn get(&self, key: RcKey) -> Option<&RcValue> {
        self.0.get(&key)
    }

    pub fn insert(&mut self, key: RcKey, value: RcValue) -> Result<()> {
        key.validate(&value)?;
        self.0.insert(key, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RcKey, RcValue)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Color stored under `key`, or the library default when absent or mistyped.
    pub fn color(&self, key: RcKey) -> Rgba {
        match (self.get(key), key.default_value()) {
            (Some(RcValue::Color(c)), _) => *c,
            (_, RcValue::Color(c)) => c,
            _ => Rgba::BLACK,
        }
    }

    /// Size (points) or alpha stored under `key`, with the same fallback.
    pub fn number(&self, key: RcKey) -> f64 {
        match (self.get(key), key.default_value()) {
            (Some(RcValue::Size(v) | RcValue::Alpha(v)), _) => *v,
            (_, RcValue::Size(v) | RcValue::Alpha(v)) => v,
            _ => 0.0,
        }
    }

    pub fn line_style(&self, key: RcKey) -> LineStyle {
        match self.get(key) {
            Some(RcValue::LineStyle(s)) => *s,
            _ => LineStyle::Solid,
        }
    }
}

static RC_PARAMS: LazyLock<Mutex<RcParams>> = LazyLock::new(|| Mutex::new(RcParams::default()));

/// The process-wide table. A panic while the lock was held cannot leave a
/// half-written table behind, so poisoning is ignored.
fn table() -> MutexGuard<'static, RcParams> {
    RC_PARAMS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Current value for `key`.
pub fn get(key: RcKey) -> RcValue {
    table().get(key).copied().unwrap_or_else(|| key.default_value())
}

/// Overwrite one key.
pub fn set(key: RcKey, value: RcValue) -> Result<()> {
    table().insert(key, value)
}

/// Overwrite every key present in `overrides`, leaving the rest untouched.
pub fn update(overrides: &RcParams) {
    let mut rc = table();
    for (k, v) in overrides.iter() {
        rc.0.insert(k, v);
    }
}

/// Full copy of the current table.
pub fn snapshot() -> RcParams {
    table().clone()
}

/// Replace the whole table with `params`, key for key.
pub fn restore(params: RcParams) {
    *table() = params;
}

pub fn reset_defaults() {
    restore(RcParams::default());
}

/// Unit tests that touch the process-wide table hold this for their duration.
#[cfg(test)]
pub(crate) fn test_serial() -> MutexGuard<'static, ()> {
    static SERIAL: Mutex<()> = Mutex::new(());
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}
