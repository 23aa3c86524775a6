//! Conversions from configuration values to plotters styles.

use crate::rc::Rgba;
use plotters::prelude::*;

/// Plotters color for `c`, keeping its own alpha.
#[inline]
pub fn color(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a as f64 / 255.0)
}

/// Plotters color for `c` with its alpha multiplied by `alpha`.
#[inline]
pub fn faded(c: Rgba, alpha: f64) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, (c.a as f64 / 255.0) * alpha.clamp(0.0, 1.0))
}

/// Fully transparent, for frameless legends.
pub const NONE: RGBAColor = RGBAColor(0, 0, 0, 0.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_multiplies() {
        let c = faded(Rgba::new(10, 20, 30, 255), 0.3);
        assert_eq!((c.0, c.1, c.2), (10, 20, 30));
        assert!((c.3 - 0.3).abs() < 1e-12);
        let clear = faded(Rgba::new(0, 0, 0, 0), 1.0);
        assert_eq!(clear.3, 0.0);
        assert_eq!(color(Rgba::WHITE).3, 1.0);
    }
}
