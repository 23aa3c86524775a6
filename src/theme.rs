//! Built-in themes and the scope guard that applies one for the duration of a render.
//!
//! ```
//! use quickplot::rc;
//! use quickplot::theme::{ThemeName, ThemeScope};
//!
//! let before = rc::snapshot();
//! {
//!     let _scope = ThemeScope::enter(ThemeName::Dark);
//!     assert_ne!(rc::snapshot(), before);
//! }
//! assert_eq!(rc::snapshot(), before);
//! ```

use crate::rc::{self, LineStyle, RcKey, RcParams, RcValue, Rgba};
use log::debug;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Built-in theme names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Modern,
    Dark,
    Pastel,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Modern, ThemeName::Dark, ThemeName::Pastel];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Modern => "modern",
            ThemeName::Dark => "dark",
            ThemeName::Pastel => "pastel",
        }
    }

    /// Resolve a theme name; anything unrecognized becomes the default theme.
    pub fn resolve(name: &str) -> Self {
        match name {
            "modern" => ThemeName::Modern,
            "dark" => ThemeName::Dark,
            "pastel" => ThemeName::Pastel,
            other => {
                debug!("unknown theme '{other}', falling back to modern");
                ThemeName::default()
            }
        }
    }

    /// The keys this theme overrides and their values.
    pub fn overrides(&self) -> RcParams {
        let color = |hex: &str| RcValue::Color(Rgba::parse(hex).unwrap_or(Rgba::BLACK));
        let common = RcParams::empty()
            .with(RcKey::AxesLabelSize, RcValue::Size(11.0))
            .with(RcKey::AxesTitleSize, RcValue::Size(13.0))
            .with(RcKey::FontSize, RcValue::Size(10.0));
        match self {
            ThemeName::Modern => common
                .with(RcKey::AxesFaceColor, RcValue::Color(Rgba::WHITE))
                .with(RcKey::FigureFaceColor, RcValue::Color(Rgba::WHITE))
                .with(RcKey::AxesEdgeColor, color("#e0e0e0"))
                .with(RcKey::GridLineStyle, RcValue::LineStyle(LineStyle::Dashed))
                .with(RcKey::GridAlpha, RcValue::Alpha(0.3)),
            ThemeName::Dark => common
                .with(RcKey::AxesFaceColor, color("#111111"))
                .with(RcKey::FigureFaceColor, color("#111111"))
                .with(RcKey::AxesEdgeColor, color("#444444"))
                .with(RcKey::AxesLabelColor, color("#e5e5e5"))
                .with(RcKey::XTickColor, color("#e5e5e5"))
                .with(RcKey::YTickColor, color("#e5e5e5"))
                .with(RcKey::GridColor, color("#333333"))
                .with(RcKey::GridAlpha, RcValue::Alpha(0.4)),
            ThemeName::Pastel => common
                .with(RcKey::AxesFaceColor, color("#FAFAFF"))
                .with(RcKey::FigureFaceColor, color("#FFFFFF"))
                .with(RcKey::AxesEdgeColor, color("#DADAF5"))
                .with(RcKey::GridLineStyle, RcValue::LineStyle(LineStyle::Dotted))
                .with(RcKey::GridAlpha, RcValue::Alpha(0.25)),
        }
    }
}

impl FromStr for ThemeName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ThemeName::resolve(s))
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies a theme to the process-wide rendering configuration and puts the
/// previous configuration back, in full, when dropped.
///
/// Anything written to the configuration while the scope is alive is
/// discarded on exit, including writes to keys the theme never touched.
/// Restoration also runs during unwinding.
#[must_use = "the theme is reverted as soon as the scope is dropped"]
pub struct ThemeScope {
    theme: ThemeName,
    saved: Option<RcParams>,
}

impl ThemeScope {
    pub fn enter(theme: ThemeName) -> Self {
        let saved = rc::snapshot();
        rc::update(&theme.overrides());
        debug!("entered theme scope '{theme}'");
        Self {
            theme,
            saved: Some(saved),
        }
    }

    pub fn theme(&self) -> ThemeName {
        self.theme
    }
}

impl Drop for ThemeScope {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            rc::restore(saved);
            debug!("left theme scope '{}', configuration restored", self.theme);
        }
    }
}

/// Run `f` with `theme` applied, restoring the previous configuration afterwards.
pub fn with_theme<R>(theme: ThemeName, f: impl FnOnce() -> R) -> R {
    let _scope = ThemeScope::enter(theme);
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_modern() {
        assert_eq!(ThemeName::resolve("neon"), ThemeName::Modern);
        assert_eq!("dark".parse::<ThemeName>().unwrap(), ThemeName::Dark);
        assert_eq!("".parse::<ThemeName>().unwrap(), ThemeName::Modern);
    }

    #[test]
    fn theme_tables_match_definitions() {
        let dark = ThemeName::Dark.overrides();
        assert_eq!(dark.color(RcKey::AxesFaceColor), Rgba::rgb(0x11, 0x11, 0x11));
        assert_eq!(dark.color(RcKey::XTickColor), Rgba::rgb(0xe5, 0xe5, 0xe5));
        assert_eq!(dark.number(RcKey::GridAlpha), 0.4);
        assert!(dark.get(RcKey::GridLineStyle).is_none());

        let pastel = ThemeName::Pastel.overrides();
        assert_eq!(pastel.line_style(RcKey::GridLineStyle), LineStyle::Dotted);
        assert_eq!(pastel.color(RcKey::AxesFaceColor), Rgba::rgb(0xfa, 0xfa, 0xff));
        assert!(pastel.get(RcKey::AxesLabelColor).is_none());

        for t in ThemeName::ALL {
            let o = t.overrides();
            assert_eq!(o.number(RcKey::AxesLabelSize), 11.0);
            assert_eq!(o.number(RcKey::AxesTitleSize), 13.0);
            assert_eq!(o.number(RcKey::FontSize), 10.0);
        }
    }

    #[test]
    fn scope_applies_then_restores() {
        let _serial = rc::test_serial();
        rc::reset_defaults();
        let before = rc::snapshot();
        {
            let scope = ThemeScope::enter(ThemeName::Modern);
            assert_eq!(scope.theme(), ThemeName::Modern);
            assert_eq!(rc::get(RcKey::GridAlpha), RcValue::Alpha(0.3));
            assert_eq!(
                rc::get(RcKey::GridLineStyle),
                RcValue::LineStyle(LineStyle::Dashed)
            );
        }
        assert_eq!(rc::snapshot(), before);
    }

    #[test]
    fn writes_inside_scope_are_discarded() {
        let _serial = rc::test_serial();
        rc::reset_defaults();
        let before = rc::snapshot();
        with_theme(ThemeName::Pastel, || {
            rc::set(RcKey::GridAlpha, RcValue::Alpha(0.9)).unwrap();
            rc::set(RcKey::LinesLineWidth, RcValue::Size(4.0)).unwrap();
        });
        assert_eq!(rc::snapshot(), before);
    }

    #[test]
    fn nested_scopes_restore_outer_theme() {
        let _serial = rc::test_serial();
        rc::reset_defaults();
        let _outer = ThemeScope::enter(ThemeName::Dark);
        let outer = rc::snapshot();
        {
            let _inner = ThemeScope::enter(ThemeName::Pastel);
            assert_eq!(rc::get(RcKey::GridAlpha), RcValue::Alpha(0.25));
            // dark's label color survives because pastel leaves the key alone
            assert_eq!(
                rc::get(RcKey::AxesLabelColor),
                RcValue::Color(Rgba::rgb(0xe5, 0xe5, 0xe5))
            );
        }
        assert_eq!(rc::snapshot(), outer);
    }

    #[test]
    fn restores_when_body_panics() {
        let _serial = rc::test_serial();
        rc::reset_defaults();
        let before = rc::snapshot();
        let res = std::panic::catch_unwind(|| {
            with_theme(ThemeName::Dark, || panic!("draw failed"));
        });
        assert!(res.is_err());
        assert_eq!(rc::snapshot(), before);
    }
}
