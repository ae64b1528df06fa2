//! Error types shared by the daybook crates

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to load '{key}': {message}")]
    Load { key: String, message: String },

    #[error("Failed to save '{key}': {message}")]
    Save { key: String, message: String },

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Errors the user should see. Storage failures are logged instead.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Duplicate(_) | Error::NotFound(_) | Error::Export(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::Validation("bad".to_string()).is_user_facing());
        assert!(Error::Duplicate("Acme".to_string()).is_user_facing());
        assert!(Error::Export("nothing to export".to_string()).is_user_facing());

        let load = Error::Load {
            key: "clients".to_string(),
            message: "corrupt".to_string(),
        };
        assert!(!load.is_user_facing());
        assert_eq!(load.to_string(), "Failed to load 'clients': corrupt");
    }
}
