use thiserror::Error;

use comanda_core::DomainError;

use crate::ports::StoreError;

/// Error surface of the use cases.
///
/// Domain and store errors are flattened here so callers see one kind of
/// failure regardless of which layer raised it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Store(StoreError),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<DomainError> for AppError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::InvariantViolation(msg) => AppError::InvariantViolation(msg),
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidId(msg) => AppError::Validation(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UniqueViolation(msg) => AppError::Conflict(msg),
            other => AppError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_onto_app_variants() {
        assert!(matches!(
            AppError::from(DomainError::validation("bad input")),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::invariant("broken")),
            AppError::InvariantViolation(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::invalid_id("not a uuid")),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::not_found()),
            AppError::NotFound
        ));
    }

    #[test]
    fn unique_violations_surface_as_conflicts() {
        let err = AppError::from(StoreError::UniqueViolation("sku taken".into()));
        assert!(matches!(err, AppError::Conflict(_)));

        let err = AppError::from(StoreError::Storage("disk on fire".into()));
        assert!(matches!(err, AppError::Store(_)));
    }
}
