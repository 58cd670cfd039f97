use thiserror::Error;

#[derive(Error, Debug)]
pub enum GdfError {
    /// User-facing, names every required column the input table is missing.
    #[error("Fehlende Spalten: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, GdfError>;
