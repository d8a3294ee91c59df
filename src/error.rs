use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to load {path}: {reason}")]
    LoadFailure { path: String, reason: String },

    #[error("{0} has no days")]
    EmptyData(String),

    #[error("No calendar data for year {0}")]
    UnknownYear(i32),

    #[error("Calendar not loaded")]
    NotLoaded,

    #[error("Calendar load failed earlier in this session")]
    SessionFailed,

    #[error("Template has no <div id=\"{0}\">")]
    TemplateTarget(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CadenceError>;
