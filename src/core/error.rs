use thiserror::Error;

/// Gateway-wide error model for uniform JSON-RPC mapping.
///
/// Only two wire codes exist: `-32601` (method or tool not found) and
/// `-32603` (everything else, including parse failures). Parse failures are
/// deliberately not `-32700`; clients in the field depend on the catch-all.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Unknown method: {0}")]
    MethodNotFound(String),
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),
    #[error("Internal error: {0}")]
    Malformed(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Internal error: {0}")]
    ToolExecution(String),
}

pub const CODE_METHOD_NOT_FOUND: i32 = -32601;
pub const CODE_INTERNAL_ERROR: i32 = -32603;

impl GatewayError {
    pub fn code(&self) -> i32 {
        match self {
            GatewayError::MethodNotFound(_) | GatewayError::ToolNotFound(_) => {
                CODE_METHOD_NOT_FOUND
            }
            GatewayError::Malformed(_)
            | GatewayError::Internal(_)
            | GatewayError::ToolExecution(_) => CODE_INTERNAL_ERROR,
        }
    }
}

impl From<anyhow::Error> for GatewayError {
    fn from(e: anyhow::Error) -> Self {
        GatewayError::Internal(e.to_string())
    }
}
