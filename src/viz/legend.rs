//! Legend placement.

use crate::axes::{Artist, LegendLoc, Limits};
use plotters::prelude::SeriesLabelPosition;

/// Corners in preference order when several are equally empty.
const CORNERS: [LegendLoc; 4] = [
    LegendLoc::UpperRight,
    LegendLoc::UpperLeft,
    LegendLoc::LowerLeft,
    LegendLoc::LowerRight,
];

/// Resolve `Best` to the corner quadrant holding the fewest data points.
pub fn resolve(loc: LegendLoc, artists: &[Artist], limits: Limits) -> LegendLoc {
    if loc != LegendLoc::Best {
        return loc;
    }
    let ((x0, x1), (y0, y1)) = limits;
    let (xm, ym) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    let mut counts = [0usize; 4];
    for (x, y) in artists.iter().flat_map(Artist::points) {
        let idx = match (x >= xm, y >= ym) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        };
        counts[idx] += 1;
    }
    let (best, _) = counts
        .iter()
        .enumerate()
        .min_by_key(|(i, c)| (**c, *i))
        .unwrap_or((0, &0));
    CORNERS[best]
}

pub fn series_label_position(loc: LegendLoc) -> SeriesLabelPosition {
    match loc {
        LegendLoc::UpperRight | LegendLoc::Best => SeriesLabelPosition::UpperRight,
        LegendLoc::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLoc::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLoc::LowerRight => SeriesLabelPosition::LowerRight,
    }
}
