use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cortex-mcp-gateway")]
#[command(about = "Cortex MCP Gateway - Admin CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Health check the service
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Show service status and tool availability
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,
    },
    /// Test Cortex backend connectivity
    TestSearch {
        /// Cortex backend URL
        #[arg(short, long)]
        url: Option<String>,
        /// Query to search for
        #[arg(short, long, default_value = "dental coverage")]
        query: String,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    match run_commands(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

pub async fn run_commands(command: Commands) -> Result<(), String> {
    match command {
        Commands::Health { url } => {
            health_check(&url)
                .await
                .map_err(|e| format!("health check failed: {}", e))?;
            println!("service is healthy");
        }
        Commands::Config { validate: _ } => {
            validate_config().map_err(|e| format!("configuration validation failed: {}", e))?;
            println!("configuration is valid");
        }
        Commands::Status { url } => {
            show_status(&url)
                .await
                .map_err(|e| format!("status check failed: {}", e))?;
        }
        Commands::TestSearch { url, query } => {
            test_search(url, &query)
                .await
                .map_err(|e| format!("backend search test failed: {}", e))?;
            println!("backend search test passed");
        }
    }
    Ok(())
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/", url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<(), Box<dyn std::error::Error>> {
    let _config = crate::infra::config::Config::from_env();

    let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
    if !matches!(mode.as_str(), "server" | "stdio") {
        return Err(format!("Invalid MODE: {}. Must be 'server' or 'stdio'", mode).into());
    }

    if mode == "server" {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8000);

        if port == 0 {
            return Err("PORT cannot be 0".into());
        }
    }

    Ok(())
}

async fn show_status(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let base = url.trim_end_matches('/');
    let client = reqwest::Client::new();

    let health_response = client
        .get(format!("{}/", base))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await?;

    println!(
        "health: {} (checked {})",
        if health_response.status().is_success() {
            "healthy"
        } else {
            "unhealthy"
        },
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    );

    let tools_response = client
        .post(format!("{}/", base))
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list",
            "params": {}
        }))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await;

    match tools_response {
        Ok(resp) if resp.status().is_success() => {
            let v: serde_json::Value = resp.json().await.unwrap_or_default();
            let count = v["result"]["tools"].as_array().map(|a| a.len()).unwrap_or(0);
            println!("tools: {} available", count);
        }
        Ok(resp) => {
            println!("tools: HTTP {}", resp.status());
        }
        Err(_) => {
            println!("tools: unavailable");
        }
    }

    println!("\nconfiguration:");
    println!(
        "  mode: {}",
        std::env::var("MODE").unwrap_or_else(|_| "server".into())
    );
    println!(
        "  port: {}",
        std::env::var("PORT").unwrap_or_else(|_| "8000".into())
    );
    println!(
        "  log level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );

    if let Ok(cortex_url) = std::env::var("CORTEX_BASE_URL") {
        println!("  cortex backend: {}", cortex_url);
    } else {
        println!("  cortex backend: simulated");
    }

    Ok(())
}

async fn test_search(url: Option<String>, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let base = url
        .or_else(|| std::env::var("CORTEX_BASE_URL").ok())
        .ok_or("No Cortex backend URL provided")?;

    let client = crate::clients::cortex::CortexRemote::new(base);
    let hits = client.search(query).await?;

    println!("search results for: \"{}\"", query);
    println!("found {} hits:", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        println!(
            "  {}. {} ({}) - {}",
            i + 1,
            hit.company,
            hit.industry,
            hit.content_excerpt
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[tokio::test]
    async fn health_check_fails_against_closed_port() {
        let result = health_check("http://localhost:9999").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn health_check_returns_ok_on_200() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).json_body(serde_json::json!({"status": "healthy"}));
        });
        let ok = health_check(&server.base_url()).await;
        assert!(ok.is_ok());
    }

    #[test]
    #[serial]
    fn validate_config_accepts_server_mode() {
        env::set_var("MODE", "server");
        env::set_var("PORT", "8000");

        let result = validate_config();
        assert!(result.is_ok());

        env::remove_var("MODE");
        env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn validate_config_rejects_unknown_mode() {
        env::set_var("MODE", "invalid");

        let result = validate_config();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid MODE"));

        env::remove_var("MODE");
    }

    #[test]
    #[serial]
    fn validate_config_accepts_stdio_mode() {
        env::set_var("MODE", "stdio");

        let result = validate_config();
        assert!(result.is_ok());

        env::remove_var("MODE");
    }

    #[test]
    #[serial]
    fn validate_config_rejects_port_zero() {
        env::set_var("MODE", "server");
        env::set_var("PORT", "0");

        let result = validate_config();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("PORT cannot be 0"));

        env::remove_var("MODE");
        env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn validate_config_defaults_non_numeric_port() {
        env::set_var("MODE", "server");
        env::set_var("PORT", "abc");

        let result = validate_config();
        assert!(result.is_ok());

        env::remove_var("MODE");
        env::remove_var("PORT");
    }

    #[tokio::test]
    async fn status_handles_non_200_health_and_tools() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(500).body("boom");
        });
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(500).body("boom");
        });

        let res = show_status(&server.base_url()).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn status_reports_tool_count() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).json_body(serde_json::json!({"status": "healthy"}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(200).json_body(serde_json::json!({
                "jsonrpc": "2.0", "id": 1,
                "result": {"tools": [{"name": "cortex_search"}]}
            }));
        });
        let res = show_status(&server.base_url()).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_search_requires_a_url() {
        env::remove_var("CORTEX_BASE_URL");

        let result = test_search(None, "test").await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No Cortex backend URL"));
    }

    #[tokio::test]
    async fn test_search_passes_against_mock_backend() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/search");
            then.status(200).json_body(serde_json::json!({
                "results": [{
                    "company": "Manufacturing Corp",
                    "industry": "Manufacturing",
                    "relevance_score": 0.9,
                    "content_excerpt": "Dental cover"
                }]
            }));
        });
        let result = test_search(Some(server.base_url()), "dental").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_config_success() {
        env::remove_var("MODE");
        env::remove_var("PORT");
        let res = run_commands(Commands::Config { validate: true }).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_config_failure() {
        env::set_var("MODE", "nope");
        let res = run_commands(Commands::Config { validate: true }).await;
        assert!(res.unwrap_err().contains("Invalid MODE"));
        env::remove_var("MODE");
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_health_and_status_fail_when_down() {
        let health = run_commands(Commands::Health { url: "http://localhost:9".into() }).await;
        assert!(health.unwrap_err().contains("health check failed"));

        let status = run_commands(Commands::Status { url: "http://localhost:9".into() }).await;
        assert!(status.unwrap_err().contains("status check failed"));
    }

    #[tokio::test]
    async fn run_commands_health_success() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).json_body(serde_json::json!({"status": "healthy"}));
        });
        let res = run_commands(Commands::Health { url: server.base_url() }).await;
        assert!(res.is_ok());
    }
}
