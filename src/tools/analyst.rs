use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::clients::cortex::CortexRemote;
use crate::domain::{AnalystAnswer, Tool, ToolError, ToolOutput};

#[async_trait]
pub trait AnalystBackend: Send + Sync {
    async fn analyze(&self, query: &str) -> Result<AnalystAnswer, String>;
}

#[async_trait]
impl AnalystBackend for CortexRemote {
    async fn analyze(&self, query: &str) -> Result<AnalystAnswer, String> {
        CortexRemote::analyze(self, query).await
    }
}

#[derive(Default)]
pub struct SimulatedAnalystBackend;

#[async_trait]
impl AnalystBackend for SimulatedAnalystBackend {
    async fn analyze(&self, query: &str) -> Result<AnalystAnswer, String> {
        Ok(AnalystAnswer {
            sql_generated: "SELECT COUNT(*) FROM EMPLOYER_BENEFIT_GUIDES WHERE ...".into(),
            results: vec![json!({"metric": "example", "value": 123})],
            interpretation: format!("Analysis for: {query}"),
        })
    }
}

pub struct CortexAnalystTool {
    backend: Arc<dyn AnalystBackend>,
}

impl CortexAnalystTool {
    pub fn new(backend: Arc<dyn AnalystBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for CortexAnalystTool {
    fn name(&self) -> &'static str {
        "cortex_analyst"
    }
    fn description(&self) -> &'static str {
        "Natural language queries on structured benefit data"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural language question about benefit data"
                }
            },
            "required": ["query"]
        })
    }
    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, ToolError> {
        let query = arguments.get("query").and_then(|v| v.as_str()).unwrap_or("");
        let answer = self
            .backend
            .analyze(query)
            .await
            .map_err(ToolError::Message)?;
        let text = format!("{}\n\nGenerated SQL: {}", answer.interpretation, answer.sql_generated);
        let data = serde_json::to_value(&answer).map_err(|e| ToolError::Message(e.to_string()))?;
        Ok(ToolOutput::with_data(text, data))
    }
}
