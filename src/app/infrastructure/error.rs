use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Catalog("duplicated field id: valor_locacao".to_string());
        assert_eq!(
            err.to_string(),
            "Catalog error: duplicated field id: valor_locacao"
        );

        let err = AppError::Import("Falha ao carregar DOCX (404)".to_string());
        assert_eq!(err.to_string(), "Import error: Falha ao carregar DOCX (404)");

        let err = AppError::Render("pagination backend unavailable".to_string());
        assert_eq!(
            err.to_string(),
            "Render error: pagination backend unavailable"
        );
    }
}
