//! Command execution

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use humantime::format_duration;
use pacebench_core::{Bound, OrchestratorBuilder, RunConfig, Termination};
use pacebench_probes::{HttpConfig, HttpProbe, RequestTemplate};
use pacebench_report::Report;

use super::{Cli, Commands, RunArgs};

/// Dispatch the parsed command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Validate { config } => validate(&config),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let config = args.run_config()?;

    let mut template = RequestTemplate::new(&args.method, &args.url)?
        .with_header_lines(&args.headers)?;
    if let Some(data) = args.data {
        template = template.with_body(data);
    }

    let http = HttpConfig::default()
        .with_request_timeout(args.timeout)
        .with_pool_max_idle(config.concurrency());
    let probe = Arc::new(HttpProbe::new(template, &http)?);
    let report = Arc::new(Report::new(probe, config.concurrency()));

    let mut orchestrator = OrchestratorBuilder::new()
        .config(config)
        .workload(report.clone())
        .build()?;

    if orchestrator.run_with_signal_handling().await == Termination::Interrupted {
        tracing::warn!("Run interrupted, reporting partial results");
    }

    let summary = report.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let config = RunConfig::from_json_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))?
        .resolved();

    println!("Configuration is valid: {}", path.display());
    println!("  bound:       {}", describe_bound(config.bound()));
    println!("  concurrency: {}", config.concurrent);
    match config.interval() {
        Some(interval) => println!(
            "  pacing:      {} req/s (one every {})",
            config.rate,
            format_duration(interval)
        ),
        None => println!("  pacing:      off"),
    }
    Ok(())
}

fn describe_bound(bound: Bound) -> String {
    match bound {
        Bound::Duration(duration) => format!("run for {}", format_duration(duration)),
        Bound::Count(0) => "no requests".to_string(),
        Bound::Count(n) => format!("{n} requests"),
        Bound::Unbounded => "until interrupted".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_describe_bound() {
        assert_eq!(
            describe_bound(Bound::Duration(Duration::from_secs(90))),
            "run for 1m 30s"
        );
        assert_eq!(describe_bound(Bound::Count(0)), "no requests");
        assert_eq!(describe_bound(Bound::Count(12)), "12 requests");
        assert_eq!(describe_bound(Bound::Unbounded), "until interrupted");
    }

    #[test]
    fn test_validate_rejects_bad_rate() {
        let path = std::env::temp_dir().join(format!("pacebench-rate-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "rate": 4000000000 }"#).unwrap();

        let result = validate(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
