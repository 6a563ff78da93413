//! Service-layer error type
//!
//! `ServiceError` bridges data-access failures (`sqlx::Error`, `BoxError`,
//! fetch timeouts) and the API-layer `AppError`, so services can use `?` and
//! handlers get a coded error with the right HTTP status.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Database or infrastructure error (logged, surfaced as `DatabaseError`)
    #[error("database error: {0}")]
    Db(BoxError),
    /// A data fetch exceeded the configured query timeout
    #[error("{0} fetch timed out")]
    Timeout(&'static str),
    /// Already an `AppError` with the correct code
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Analytics data fetch failed");
                AppError::new(ErrorCode::DatabaseError)
            }
            ServiceError::Timeout(dataset) => {
                tracing::warn!(dataset, "Analytics data fetch timed out");
                AppError::timeout(format!("Timed out loading {dataset}"))
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
