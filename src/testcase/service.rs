use crate::http::{ApiClient, ClientError};
use crate::testcase::model::{GenerationRequest, GenerationResult, TestCaseRecord};
use crate::testcase::normalize::normalize_record;
use serde_json::Value;
use tracing::info;

const LIST_PATH: &str = "/Ai/list";
const GENERATE_PATH: &str = "/Ai/generate";

#[derive(Clone)]
pub struct TestCaseService {
    api_client: ApiClient,
}

impl TestCaseService {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    /// Every persisted test case, normalized, in server order.
    pub async fn fetch_test_cases(&self) -> Result<Vec<TestCaseRecord>, ClientError> {
        let raw: Vec<Value> = self.api_client.get_json(LIST_PATH).await?;
        info!("fetched {} test cases", raw.len());
        Ok(raw.iter().map(normalize_record).collect())
    }

    /// The generate response is returned as received; only the list path normalizes.
    pub async fn generate_test_case(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ClientError> {
        if request.requirement.trim().is_empty() {
            return Err(ClientError::Validation("requirement must not be empty".to_string()));
        }
        info!(
            "requesting a {} test case, model: {:?}",
            request.framework.as_str(),
            request.model
        );
        self.api_client.post_json(GENERATE_PATH, request).await
    }
}
