use serde::{Deserialize, Serialize};
use serde_json::Value as J;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Message(String),
}

/// One ranked hit from the search backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub company: String,
    pub industry: String,
    #[serde(default)]
    pub relevance_score: f64,
    pub content_excerpt: String,
}

/// Answer from the analyst backend: generated SQL, result rows and a
/// natural-language interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystAnswer {
    pub sql_generated: String,
    #[serde(default)]
    pub results: Vec<J>,
    pub interpretation: String,
}

/// What a tool invocation yields: rendered text for the MCP content block,
/// plus optional structured data for the direct REST surface.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
    pub data: Option<J>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), data: None }
    }

    pub fn with_data(text: impl Into<String>, data: J) -> Self {
        Self { text: text.into(), data: Some(data) }
    }
}

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> J;
    async fn call(&self, arguments: &J) -> Result<ToolOutput, ToolError>;
}
