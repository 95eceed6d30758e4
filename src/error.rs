use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Loader errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format '.{extension}' (only .xlsx and .csv are supported)")]
    UnsupportedFormat { extension: String },
    #[error("no usable two-column data in file: {0}")]
    EmptyOrMalformed(String),
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),
}

// ---------------------------------------------------------------------------
// Threshold input errors
// ---------------------------------------------------------------------------

/// Raised before any computation when the threshold text inputs do not parse.
#[derive(Debug, Error, PartialEq)]
#[error("invalid numeric input: {0}")]
pub struct InvalidNumericInput(pub String);

// ---------------------------------------------------------------------------
// Rendering errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to draw chart: {0}")]
    Draw(String),
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for RenderError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(format!("{value:?}"))
    }
}
