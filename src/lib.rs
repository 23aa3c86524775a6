//! quickplot
//!
//! One opinionated call that turns a table into a finished chart: it validates
//! the requested columns, draws the kind, fills in a title and axis labels, and
//! renders through plotters under a named theme. Pairs with the `quickplot` CLI.
//!
//! ### Features
//! - Chart kinds: `scatter`, `line`, `bar` (categorical or numeric x), `hist`
//! - Themes `modern`, `dark` and `pastel`, applied to a process-wide rendering
//!   configuration and reverted in full when the call returns or fails
//! - Default titles ("Scatter of income vs age") and axis labels from column names
//! - Legend only when a series carries a label, placed in the emptiest corner
//! - SVG in memory, or SVG/PNG files
//!
//! ### Example
//! ```no_run
//! use quickplot::{DataFrame, Output, PlotRequest, quickplot};
//!
//! let df = DataFrame::from_csv_path("people.csv")?;
//! let req = PlotRequest::new("hist")
//!     .x("age")
//!     .theme("dark")
//!     .style("bins", 20i64)
//!     .output(Output::File("ages.png".into()));
//! let ax = quickplot(&df, &req)?;
//! println!("{}", ax.title().unwrap_or_default());
//! # Ok::<(), quickplot::PlotError>(())
//! ```

pub mod axes;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod rc;
pub mod theme;
pub mod viz;

pub use axes::Axes;
pub use data::{Column, DataFrame};
pub use dispatch::{quickplot, quickplot_typed};
pub use error::{PlotError, Result};
pub use models::{Backend, ChartKind, ChartSpec, Output, PlotRequest, StyleOptions, StyleValue};
pub use theme::{ThemeName, ThemeScope, with_theme};
