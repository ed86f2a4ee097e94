use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Test tool the generated script targets.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Framework {
    #[default]
    Playwright,
    Cypress,
    Selenium,
}

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::Playwright, Framework::Cypress, Framework::Selenium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Playwright => "Playwright",
            Framework::Cypress => "Cypress",
            Framework::Selenium => "Selenium",
        }
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "playwright" => Ok(Framework::Playwright),
            "cypress" => Ok(Framework::Cypress),
            "selenium" => Ok(Framework::Selenium),
            _ => Err(format!("Invalid framework: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    #[default]
    Qwen,
    Llama,
    Deepseek,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Qwen, Model::Llama, Model::Deepseek];

    /// Identifier sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Qwen => "qwen",
            Model::Llama => "llama",
            Model::Deepseek => "deepseek",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Model::Qwen => "Qwen 2.5 Coder 7B",
            Model::Llama => "Llama 3.1",
            Model::Deepseek => "Deepseek",
        }
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qwen" => Ok(Model::Qwen),
            "llama" => Ok(Model::Llama),
            "deepseek" => Ok(Model::Deepseek),
            _ => Err(format!("Invalid model: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Builder)]
pub struct GenerationRequest {
    #[builder(into)]
    pub requirement: String,
    pub framework: Framework,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
}

/// Reads an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GeneratedTestCase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected: String,
}

/// Response of the generate endpoint, kept exactly as the backend sent it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GenerationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub model_used: String,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub test_case: GeneratedTestCase,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub script_code: Option<String>,
}

impl GenerationResult {
    /// Code block content: the script code, or the tool name when no code came back.
    pub fn script_body(&self) -> Option<&str> {
        let script = self.script.as_deref().filter(|s| !s.is_empty())?;
        Some(self.script_code.as_deref().filter(|c| !c.is_empty()).unwrap_or(script))
    }
}

/// A persisted test case after normalization.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRecord {
    pub id: i64,
    #[builder(default)]
    pub requirement: String,
    #[builder(default)]
    pub title: String,
    #[builder(default)]
    pub steps: Vec<String>,
    #[builder(default)]
    pub expected: String,
    #[builder(default)]
    pub framework: String,
    #[builder(default)]
    pub script_code: String,
    #[builder(default)]
    pub created_at: String,
    #[builder(default)]
    pub latency_ms: f64,
    #[builder(default)]
    pub prompt_tokens: f64,
    #[builder(default)]
    pub completion_tokens: f64,
    #[builder(default)]
    pub total_tokens: f64,
    #[builder(default)]
    pub total_duration_ms: f64,
    #[builder(default)]
    pub prompt_eval_duration_ms: f64,
    #[builder(default)]
    pub eval_duration_ms: f64,
}
