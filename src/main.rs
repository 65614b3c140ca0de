use std::process::ExitCode;

use cortex_mcp_gateway::{cli, infra};

#[tokio::main]
async fn main() -> ExitCode {
    infra::logging::init();

    // With arguments we act as the admin CLI; bare invocation boots the gateway.
    if std::env::args().len() > 1 {
        return cli::run().await;
    }

    match infra::boot::run_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "gateway exited with error");
            ExitCode::FAILURE
        }
    }
}
