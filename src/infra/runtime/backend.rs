//! Scoped supervisor for the optional externally launched backend process.
//!
//! The child is acquired at startup and released at shutdown; request
//! handling never sees it except through the tool backends.

use tokio::process::{Child, Command};

use crate::infra::config::BackendSettings;

pub struct BackendProcess {
    child: Child,
}

impl BackendProcess {
    /// Spawn the configured backend command, if any. Returns `Ok(None)` when
    /// no command is configured; failure to launch is an error so the
    /// operator sees it at boot rather than on the first tool call.
    pub fn spawn_if_configured(settings: &BackendSettings) -> anyhow::Result<Option<Self>> {
        let Some(command) = settings.command.as_deref() else {
            return Ok(None);
        };
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("BACKEND_COMMAND is empty"))?;

        let mut cmd = Command::new(program);
        cmd.args(parts).args(settings.to_args()).kill_on_drop(true);
        tracing::info!(program = program, "starting backend process");

        let child = cmd
            .spawn()
            .map_err(|e| anyhow::anyhow!("failed to start backend process {program}: {e}"))?;
        Ok(Some(Self { child }))
    }

    /// Graceful release: ask the child to stop and reap it.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.child.start_kill() {
            tracing::warn!(error = %e, "backend process already gone");
            return;
        }
        match self.child.wait().await {
            Ok(status) => tracing::info!(status = %status, "backend process stopped"),
            Err(e) => tracing::warn!(error = %e, "failed to reap backend process"),
        }
    }
}
