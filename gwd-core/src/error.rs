//! Error types for the groundwater dropoff library
use thiserror::Error;

/// Main error type for groundwater data operations.
///
/// Row-level problems (a non-numeric depth, a well outside every region)
/// are absorbed by the parsers and aggregators and never show up here.
/// These variants cover inputs that are unusable as a whole.
#[derive(Error, Debug)]
pub enum GwdError {
    /// The record set handed to an aggregation was empty
    #[error("No well records to aggregate")]
    EmptyRecordSet,

    /// The region set handed to the classifier was empty
    #[error("No region geometries were provided")]
    MissingGeometry,

    /// Failed to read the CSV container itself
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to read a GeoJSON document
    #[error("Failed to parse GeoJSON: {0}")]
    GeoJsonParse(#[from] serde_json::Error),

    /// None of the accepted header names for a required column were present
    #[error("Required column missing (expected one of: {0})")]
    MissingColumn(String),

    /// Histogram domain is empty or the bin width is not positive
    #[error("Invalid histogram (min: {min}, max: {max}, bin width: {bin_width})")]
    InvalidHistogram { min: f64, max: f64, bin_width: f64 },

    /// Ranking requested a component the table does not carry
    #[error("Component {index} out of range ({available} available)")]
    UnknownComponent { index: usize, available: usize },
}

/// Type alias for Results using GwdError
pub type Result<T> = std::result::Result<T, GwdError>;
