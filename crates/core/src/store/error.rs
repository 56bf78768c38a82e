//! Store error types.

use std::path::{Path, PathBuf};

use burnrate_shared::AppError;
use burnrate_shared::types::CycleId;
use thiserror::Error;

use crate::cycle::CycleError;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O failed on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded or decoded.
    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No cycle with this ID exists.
    #[error("cycle not found: {0}")]
    CycleNotFound(CycleId),

    /// The operation needs an active cycle and there is none.
    #[error("no active cycle")]
    NoActiveCycle,

    /// Input failed validation.
    #[error(transparent)]
    Invalid(#[from] CycleError),
}

impl StoreError {
    /// Create an I/O error for `path`.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CycleNotFound(_) | StoreError::NoActiveCycle => {
                Self::NotFound(err.to_string())
            }
            StoreError::Invalid(
                CycleError::NegativeBudget { .. } | CycleError::BudgetOverflow { .. },
            ) => {
                Self::BusinessRule(err.to_string())
            }
            StoreError::Invalid(_) => Self::Validation(err.to_string()),
            StoreError::Io { .. } | StoreError::Serialization(_) => {
                Self::Storage(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_maps_to_app_error() {
        let not_found: AppError = StoreError::NoActiveCycle.into();
        assert!(matches!(not_found, AppError::NotFound(_)));

        let invalid: AppError = StoreError::Invalid(CycleError::NegativeAmount).into();
        assert!(matches!(
            invalid,
            AppError::Validation(ref m) if m == "Expense amount cannot be negative"
        ));

        let rule: AppError =
            StoreError::Invalid(CycleError::NegativeBudget { delta: dec!(-5) }).into();
        assert!(matches!(rule, AppError::BusinessRule(_)));

        let overflow: AppError =
            StoreError::Invalid(CycleError::BudgetOverflow { delta: dec!(1) }).into();
        assert!(matches!(overflow, AppError::BusinessRule(_)));

        let io: AppError = StoreError::io(
            Path::new("data/x.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        )
        .into();
        assert!(matches!(io, AppError::Storage(ref m) if m.contains("data/x.json")));
    }
}
