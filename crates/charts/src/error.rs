//! Error types for chart rendering

use thiserror::Error;

/// Errors that can occur while laying out or rendering a chart
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Series configuration covers {found} series but the table has {expected}")]
    SeriesMismatch { expected: usize, found: usize },

    #[error("Unknown series index: {0}")]
    UnknownSeries(usize),

    #[error("Canvas {width}x{height} leaves no room for the plot area")]
    CanvasTooSmall { width: f64, height: f64 },

    #[error("Pie chart needs at least one enabled series")]
    NoEnabledSeries,

    #[error("No chart has been rendered yet")]
    NothingRendered,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;
