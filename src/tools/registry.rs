use std::sync::Arc;

use serde::Serialize;

use crate::clients::cortex::CortexRemote;
use crate::domain::{Tool, ToolOutput};
use crate::infra::config::Config;
use crate::tools::analyst::{CortexAnalystTool, SimulatedAnalystBackend};
use crate::tools::search::{CortexSearchTool, SimulatedSearchBackend};

/// Fixed, ordered sequence of tools. Built once at startup; no runtime
/// mutation. Listing preserves insertion order, lookup is exact-name match.
#[derive(Clone)]
pub struct Registry {
    tools: Arc<Vec<Arc<dyn Tool>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

impl Registry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        Self { tools: Arc::new(iter.into_iter().collect()) }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn list(&self) -> Vec<ToolMeta> {
        self.tools
            .iter()
            .map(|t| ToolMeta {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    pub async fn call(&self, name: &str, args: &serde_json::Value) -> Result<ToolOutput, String> {
        let t = self.get(name).ok_or_else(|| format!("Unknown tool: {name}"))?;
        t.call(args).await.map_err(|e| e.to_string())
    }
}

/// Build the registry from configuration: remote backends when a Cortex base
/// URL is configured, simulated ones otherwise.
pub fn build_registry(cfg: &Config) -> Registry {
    match cfg.cortex_base_url.as_deref() {
        Some(base) if !base.trim().is_empty() => {
            let client = CortexRemote::new(base);
            Registry::with_tools([
                Arc::new(CortexSearchTool::new(Arc::new(client.clone()))) as Arc<dyn Tool>,
                Arc::new(CortexAnalystTool::new(Arc::new(client))) as Arc<dyn Tool>,
            ])
        }
        _ => Registry::with_tools([
            Arc::new(CortexSearchTool::new(Arc::new(SimulatedSearchBackend))) as Arc<dyn Tool>,
            Arc::new(CortexAnalystTool::new(Arc::new(SimulatedAnalystBackend))) as Arc<dyn Tool>,
        ]),
    }
}
