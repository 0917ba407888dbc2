use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures of a single insight query. None of them touch loaded data.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("{0}")]
    MissingInput(String),
    #[error("API Error: {0}")]
    Provider(String),
    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
    #[error("Error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Insight(#[from] InsightError),
}
