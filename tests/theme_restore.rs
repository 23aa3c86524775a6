use quickplot::rc::{self, LineStyle, RcKey, RcParams, RcValue, Rgba};
use quickplot::{DataFrame, PlotRequest, ThemeName, ThemeScope, quickplot, with_theme};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The rendering configuration is process-wide, so tests that render or
/// inspect it take turns.
fn serial() -> MutexGuard<'static, ()> {
    static SERIAL: Mutex<()> = Mutex::new(());
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn data() -> DataFrame {
    DataFrame::from_columns([("x", vec![1.0, 2.0, 3.0]), ("y", vec![3.0, 1.0, 2.0])]).unwrap()
}

/// A configuration no theme would produce, so leaks are visible.
fn customized() -> RcParams {
    rc::set(RcKey::AxesFaceColor, RcValue::Color(Rgba::rgb(1, 2, 3))).unwrap();
    rc::set(RcKey::GridLineStyle, RcValue::LineStyle(LineStyle::DashDot)).unwrap();
    rc::set(RcKey::LinesLineWidth, RcValue::Size(4.0)).unwrap();
    rc::snapshot()
}

#[test]
fn every_theme_leaves_the_configuration_as_found() {
    let _serial = serial();
    let before = customized();
    for theme in ["modern", "dark", "pastel", "neon", ""] {
        let req = PlotRequest::new("line").x("x").y("y").theme(theme);
        quickplot(&data(), &req).unwrap();
        assert_eq!(rc::snapshot(), before, "theme {theme:?} leaked");
    }
}

#[test]
fn failures_inside_the_scope_still_restore() {
    let _serial = serial();
    let before = customized();
    let df = DataFrame::from_columns([("x", vec!["a", "b"]), ("y", vec!["c", "d"])]).unwrap();

    let failing = [
        PlotRequest::new("scatter").x("x").y("y").theme("dark"),
        PlotRequest::new("hist").x("missing").theme("pastel"),
        PlotRequest::new("bar").x("x").theme("dark"),
    ];
    for req in &failing {
        assert!(quickplot(&df, req).is_err());
        assert_eq!(rc::snapshot(), before);
    }

    let bad_option = PlotRequest::new("line")
        .x("x")
        .y("y")
        .theme("dark")
        .style("markersize", 3i64);
    assert!(quickplot(&data(), &bad_option).is_err());
    assert_eq!(rc::snapshot(), before);
}

#[test]
fn theme_values_apply_only_inside_the_scope() {
    let _serial = serial();
    rc::reset_defaults();
    let dark = with_theme(ThemeName::Dark, || rc::get(RcKey::AxesFaceColor));
    assert_eq!(dark, RcValue::Color(Rgba::rgb(0x11, 0x11, 0x11)));
    assert_eq!(rc::get(RcKey::AxesFaceColor), RcValue::Color(Rgba::WHITE));

    let pastel_grid = with_theme(ThemeName::Pastel, || {
        (rc::get(RcKey::GridLineStyle), rc::get(RcKey::GridAlpha))
    });
    assert_eq!(
        pastel_grid,
        (RcValue::LineStyle(LineStyle::Dotted), RcValue::Alpha(0.25))
    );
    assert_eq!(rc::snapshot(), RcParams::default());
}

#[test]
fn keys_outside_the_theme_are_reverted_too() {
    let _serial = serial();
    let before = customized();
    {
        let scope = ThemeScope::enter(ThemeName::Modern);
        assert_eq!(scope.theme(), ThemeName::Modern);
        // markersize is not part of any theme
        rc::set(RcKey::LinesMarkerSize, RcValue::Size(20.0)).unwrap();
    }
    assert_eq!(rc::snapshot(), before);
}
