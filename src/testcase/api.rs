use crate::api::{ApiResponse, AppError};
use crate::http::api_error_message;
use crate::pages::{ask_test_page, home_page, test_cases_page, AskTestView};
use crate::testcase::model::{Framework, GenerationRequest, GenerationResult, Model, TestCaseRecord};
use crate::testcase::service::TestCaseService;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::{Form, Json};
use serde::Deserialize;
use tracing::warn;

pub async fn home() -> Html<String> {
    Html(home_page())
}

pub async fn ask_test_form() -> Html<String> {
    Html(ask_test_page(&AskTestView::default()))
}

pub async fn submit_ask_test(
    State(service): State<TestCaseService>,
    Form(form): Form<AskTestForm>,
) -> Html<String> {
    let requirement = form.requirement.trim();
    let framework = form.framework();
    let model = form.model();
    if requirement.is_empty() {
        return Html(ask_test_page(&AskTestView {
            framework,
            model,
            ..Default::default()
        }));
    }

    let request = GenerationRequest::builder()
        .requirement(requirement)
        .framework(framework)
        .model(model)
        .build();
    match service.generate_test_case(&request).await {
        Ok(result) => Html(ask_test_page(&AskTestView {
            framework,
            model,
            result: Some(&result),
            ..Default::default()
        })),
        Err(err) => {
            warn!("test case generation failed: {}", err);
            let message = api_error_message(&err);
            Html(ask_test_page(&AskTestView {
                requirement: &form.requirement,
                framework,
                model,
                error: Some(&message),
                result: None,
            }))
        }
    }
}

pub async fn list_test_cases_page(
    State(service): State<TestCaseService>,
    Query(params): Query<ListTestCaseParams>,
) -> Html<String> {
    match service.fetch_test_cases().await {
        Ok(records) => Html(test_cases_page(Ok(&records), params.selected())),
        Err(err) => {
            warn!("listing test cases failed: {}", err);
            Html(test_cases_page(Err(&api_error_message(&err)), None))
        }
    }
}

pub async fn list_test_cases(
    State(service): State<TestCaseService>,
) -> Result<ApiResponse<Vec<TestCaseRecord>>, AppError> {
    let result = service.fetch_test_cases().await;
    ApiResponse::from(result.map_err(AppError::from))
}

pub async fn generate_test_case(
    State(service): State<TestCaseService>,
    Json(payload): Json<GenerationRequest>,
) -> Result<ApiResponse<GenerationResult>, AppError> {
    let result = service.generate_test_case(&payload).await;
    ApiResponse::from(result.map_err(AppError::from))
}

#[derive(Deserialize, Clone)]
pub struct AskTestForm {
    #[serde(default)]
    pub requirement: String,
    pub framework: Option<String>,
    pub model: Option<String>,
}

impl AskTestForm {
    /// Unknown values fall back to the default selection.
    pub fn framework(&self) -> Framework {
        self.framework
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn model(&self) -> Model {
        self.model
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

#[derive(Deserialize, Clone)]
pub struct ListTestCaseParams {
    pub selected: Option<String>,
}

impl ListTestCaseParams {
    /// An id that does not parse selects nothing.
    pub fn selected(&self) -> Option<i64> {
        self.selected.as_deref().and_then(|value| value.trim().parse().ok())
    }
}
