use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::clients::cortex::CortexRemote;
use crate::domain::{SearchHit, Tool, ToolError, ToolOutput};

/// Backend abstraction so the search tool can be remote or simulated.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, String>;
}

#[async_trait]
impl SearchBackend for CortexRemote {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, String> {
        CortexRemote::search(self, query).await
    }
}

/// Stand-in backend used until a real Cortex service is configured. Returns
/// representative data so the whole surface stays exercisable.
#[derive(Default)]
pub struct SimulatedSearchBackend;

#[async_trait]
impl SearchBackend for SimulatedSearchBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, String> {
        let excerpt = |benefit: &str| format!("{benefit} (matched: {query})");
        Ok(vec![
            SearchHit {
                company: "Manufacturing Corp".into(),
                industry: "Manufacturing".into(),
                relevance_score: 0.95,
                content_excerpt: excerpt("Offers comprehensive wellness programs"),
            },
            SearchHit {
                company: "Industrial Solutions LLC".into(),
                industry: "Industrial".into(),
                relevance_score: 0.90,
                content_excerpt: excerpt("Mental health benefits included"),
            },
            SearchHit {
                company: "Production Inc".into(),
                industry: "Manufacturing".into(),
                relevance_score: 0.85,
                content_excerpt: excerpt("Employee assistance programs available"),
            },
        ])
    }
}

pub struct CortexSearchTool {
    backend: Arc<dyn SearchBackend>,
}

impl CortexSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }
}

fn render_hits(query: &str, hits: &[SearchHit]) -> String {
    let mut text = format!(
        "Search Results for '{query}':\n\nFound {} companies matching your criteria:\n",
        hits.len()
    );
    for (i, hit) in hits.iter().enumerate() {
        text.push_str(&format!("{}. {} - {}\n", i + 1, hit.company, hit.content_excerpt));
    }
    text
}

#[async_trait]
impl Tool for CortexSearchTool {
    fn name(&self) -> &'static str {
        "cortex_search"
    }
    fn description(&self) -> &'static str {
        "Search through employer benefit guide text content"
    }
    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query for benefit guides"
                }
            },
            "required": ["query"]
        })
    }
    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, ToolError> {
        let query = arguments.get("query").and_then(|v| v.as_str()).unwrap_or("");
        let hits = self
            .backend
            .search(query)
            .await
            .map_err(ToolError::Message)?;
        let text = render_hits(query, &hits);
        let data = json!({ "results": hits });
        Ok(ToolOutput::with_data(text, data))
    }
}
