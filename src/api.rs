use crate::config::Config;
use crate::http::{api_error_message, ApiClient, ClientError};
use crate::testcase::api::{
    ask_test_form, generate_test_case, home, list_test_cases, list_test_cases_page, submit_ask_test,
};
use crate::testcase::service::TestCaseService;
use axum::extract::FromRef;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, Level};

#[derive(Clone)]
pub struct AppState {
    pub test_cases: Arc<TestCaseService>,
}

impl FromRef<AppState> for TestCaseService {
    fn from_ref(app_state: &AppState) -> TestCaseService {
        app_state.test_cases.deref().clone()
    }
}

pub fn build_api(config: &Config) -> Result<Router, ClientError> {
    let api_client = ApiClient::new(&config.api_base_url, config.request_timeout())?;
    info!("backend api: {}", api_client.base_url());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app_state = AppState {
        test_cases: Arc::new(TestCaseService::new(api_client)),
    };

    Ok(Router::new()
        .route("/", get(home))
        .route("/ask-test", get(ask_test_form).post(submit_ask_test))
        .route("/test-cases", get(list_test_cases_page))
        .route("/api/test-cases", get(list_test_cases))
        .route("/api/generate", post(generate_test_case))
        .fallback(home)
        .layer(cors)
        .layer(TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new().include_headers(true))
            .on_request(
                DefaultOnRequest::new()
                    .level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Micros)
            ))
        .with_state(app_state))
}

pub struct ApiResponse<T>(pub T);

impl<T> ApiResponse<T> {
    pub fn from(result: Result<T, AppError>) -> Result<ApiResponse<T>, AppError> {
        result.map(ApiResponse)
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match serde_json::to_string(&self.0) {
            Ok(json) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                json,
            )
                .into_response(),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to serialize response",
            )
                .into_response(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// The backend failed; carries the user-facing message.
    Upstream(String),
    Internal(String),
}

impl From<ClientError> for AppError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Validation(message) => AppError::Validation(message),
            ClientError::Decode(_) => AppError::Internal(error.to_string()),
            _ => AppError::Upstream(api_error_message(&error)),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { message })).into_response()
            }
            AppError::Upstream(message) => {
                (StatusCode::BAD_GATEWAY, Json(ErrorBody { message })).into_response()
            }
            AppError::Internal(message) => {
                tracing::error!("{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        message: "Internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_app_errors() {
        let error = AppError::from(ClientError::Validation("requirement must not be empty".to_string()));
        assert!(matches!(error, AppError::Validation(m) if m == "requirement must not be empty"));

        let error = AppError::from(ClientError::Transport("network down".to_string()));
        assert!(matches!(error, AppError::Upstream(m) if m == "network down"));

        let error = AppError::from(ClientError::Decode("eof".to_string()));
        assert!(matches!(error, AppError::Internal(_)));
    }

    #[test]
    fn error_statuses() {
        assert_eq!(AppError::Validation("x".to_string()).into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Upstream("x".to_string()).into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::Internal("x".to_string()).into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
