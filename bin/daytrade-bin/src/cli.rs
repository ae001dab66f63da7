use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Day-trade journal API", long_about = None)]
pub struct JournalCli {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Maximum number of pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "10")]
    pub database_max_connections: usize,

    /// API host
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub api_host: String,

    /// API port
    #[arg(long, env = "API_PORT", default_value = "8080")]
    pub api_port: u16,

    /// OTEL collector endpoint; traces and metrics are exported there
    #[arg(long, env = "OTEL_COLLECTOR_ENDPOINT")]
    pub otel_collector_endpoint: Option<String>,

    /// Directory where openapi.json is written at startup
    #[arg(long, env = "OPENAPI_OUTPUT_DIR")]
    pub openapi_output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = JournalCli::try_parse_from(["daytrade", "--database-url", "postgres://db/journal"])
            .unwrap();
        assert_eq!(cli.api_host, "0.0.0.0");
        assert_eq!(cli.api_port, 8080);
        assert_eq!(cli.database_max_connections, 10);
        assert!(cli.otel_collector_endpoint.is_none());
        assert!(cli.openapi_output_dir.is_none());
    }

    #[test]
    fn test_collector_endpoint() {
        let cli = JournalCli::try_parse_from([
            "daytrade",
            "--database-url",
            "postgres://db/journal",
            "--otel-collector-endpoint",
            "http://collector:4317",
        ])
        .unwrap();
        assert_eq!(
            cli.otel_collector_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(
            JournalCli::try_parse_from([
                "daytrade",
                "--database-url",
                "postgres://db/journal",
                "--api-port",
                "eighty",
            ])
            .is_err()
        );
    }
}
