//! Error taxonomy for the dispatcher, the draw primitives and presentation.

use thiserror::Error;

/// Every way a `quickplot` call can fail.
///
/// None of these are retried or recovered internally; the theme scope has
/// already restored the global configuration by the time a caller sees one.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("unsupported backend '{0}': only 'plotters' is implemented")]
    UnsupportedBackend(String),

    #[error("unsupported kind '{0}': expected one of scatter, line, bar, hist")]
    UnsupportedKind(String),

    #[error("{kind} requires {required}")]
    MissingColumn {
        kind: &'static str,
        required: &'static str,
    },

    #[error("column '{0}' not found in data")]
    ColumnNotFound(String),

    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("no data to plot")]
    EmptyData,

    #[error("values span [{lo}, {hi}], which is too wide to split into bins")]
    RangeTooWide { lo: f64, hi: f64 },

    #[error("{primitive}() got an unexpected style option '{key}'")]
    UnknownStyleOption {
        primitive: &'static str,
        key: String,
    },

    #[error("style option '{key}' expects {expected}")]
    InvalidStyleOption {
        key: String,
        expected: &'static str,
    },

    #[error("invalid value for rc key '{key}': expected {expected}")]
    InvalidRcValue {
        key: &'static str,
        expected: &'static str,
    },

    #[error("rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PlotError>;

/// Map any plotters drawing error into [`PlotError::Render`].
pub(crate) fn render_err<E: std::fmt::Debug>(e: E) -> PlotError {
    PlotError::Render(format!("{e:?}"))
}
