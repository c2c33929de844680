use thiserror::Error;

/// Failures reported by the remote bill store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("store failure: {0}")]
    Server(String),
}

impl StoreError {
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::Server(_) => 500,
        }
    }

    /// The fixed text shown to the user in place of the bills table.
    pub fn user_message(&self) -> String {
        format!("Erreur {}", self.status_code())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("no matching row".to_string()),
            other => StoreError::Server(other.to_string()),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(err.to_string()),
            _ => StoreError::Server(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum NewBillError {
    #[error("unsupported receipt file {0}: only jpg, jpeg and png are accepted")]
    UnsupportedFile(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_carries_status_code() {
        assert_eq!(StoreError::NotFound("bills".into()).user_message(), "Erreur 404");
        assert_eq!(StoreError::Server("boom".into()).user_message(), "Erreur 500");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), 404);

        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.status_code(), 500);
    }
}
