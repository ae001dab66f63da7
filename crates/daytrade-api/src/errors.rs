use crate::dto::{ApiResponse, PromptDto};
use axum::{Json, http::StatusCode, response::IntoResponse};
use daytrade_db::DatabaseError;
use daytrade_kpi::KpiError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The outcome raised a prompt the request did not answer.
    #[error("Decision required: {msg}")]
    DecisionRequired { msg: String, prompt: PromptDto },
    #[error("Internal server error")]
    InternalServerError,
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        // NOTE: Error is already logged in the DatabaseError layer
        match err {
            DatabaseError::NotFound { .. } => {
                Self::NotFound("The requested resource was not found".to_string())
            }
            DatabaseError::UniqueViolation { .. } => {
                Self::Conflict("The resource already exists".to_string())
            }
            DatabaseError::PoolError { .. }
            | DatabaseError::InteractionError { .. }
            | DatabaseError::QueryError { .. }
            | DatabaseError::CorruptData { .. } => {
                // Don't expose internal database details to clients
                Self::InternalServerError
            }
        }
    }
}

impl From<KpiError> for ApiError {
    fn from(err: KpiError) -> Self {
        match err {
            KpiError::InvalidData(msg) => Self::BadRequest(msg),
            KpiError::Conflict(msg) => Self::Conflict(msg),
            KpiError::DecisionRequired(prompt) => Self::DecisionRequired {
                msg: prompt.to_string(),
                prompt: prompt.into(),
            },
        }
    }
}

/// Extension trait for `DatabaseError` to provide convenient conversion to `ApiError`
pub trait DatabaseErrorExt {
    /// Convert to `ApiError` with a custom `NotFound` message, or use default conversion
    fn or_not_found(self, message: String) -> ApiError;
}

impl DatabaseErrorExt for DatabaseError {
    fn or_not_found(self, message: String) -> ApiError {
        if self.is_not_found() {
            ApiError::NotFound(message)
        } else {
            self.into()
        }
    }
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::DecisionRequired { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let response: ApiResponse<PromptDto> = match self {
            Self::DecisionRequired { msg, prompt } => ApiResponse::error_with(msg, prompt),
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::Conflict(msg) => {
                ApiResponse::error(msg)
            }
            Self::InternalServerError => ApiResponse::error("Internal server error".to_string()),
        };
        (status, Json(response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use daytrade_kpi::Prompt;
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_database_errors_hide_internals() {
        let err: ApiError = DatabaseError::QueryError {
            operation: "load setup".to_string(),
            message: "relation does not exist".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::InternalServerError));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_or_not_found_uses_custom_message() {
        let err = DatabaseError::not_found("find setup").or_not_found("Setup missing".to_string());
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Setup missing"));
    }

    #[test]
    fn test_kpi_errors_map_to_client_errors() {
        let bad: ApiError = KpiError::InvalidData("day out of range".to_string()).into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let decision: ApiError = KpiError::DecisionRequired(Prompt::ExcessRouting {
            excess: dec!(5),
        })
        .into();
        assert_eq!(decision.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let locked: ApiError = KpiError::Conflict("day already recorded".to_string()).into();
        assert_eq!(locked.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_decision_required_body_carries_prompt() {
        let err: ApiError = KpiError::DecisionRequired(Prompt::LossCoverage {
            loss: dec!(80),
            box2_balance: dec!(50),
            box2_sufficient: false,
        })
        .into();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["data"]["kind"], "loss_coverage");
        assert_eq!(body["data"]["loss"], "80.00");
        assert_eq!(body["data"]["box2_balance"], "50.00");
        assert_eq!(body["data"]["box2_sufficient"], false);
        assert!(body["msg"].as_str().unwrap().contains("coverage"));
    }

    #[tokio::test]
    async fn test_plain_errors_have_no_data() {
        let response = ApiError::Conflict("taken".to_string()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["msg"], "taken");
        assert!(body.get("data").is_none());
    }
}
