// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use the_joinery::audit::SourceKey;
use the_joinery::backends::local::LocalUnitFactory;
use the_joinery::config::{load_and_validate_config, RuntimeBuilder, Strategy};
use the_joinery::engine::App;
use the_joinery::parser::Parser;
use the_joinery::schema::BuildReport;
use the_joinery::traits::Scheduler;
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.yaml|config.toml>", program);
    eprintln!("       {} -- <workflow tokens...>", program);
    eprintln!("Example: {} configs/simple-pipeline.yaml", program);
    eprintln!("Example: {} -- echo hello world --: upcase --: reverse", program);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("the-joinery");

    let (app, strategy, report) = match args.get(1).map(String::as_str) {
        Some("--") => build_from_tokens(&args[2..])?,
        Some(path) if !path.starts_with('-') => build_from_config(path)?,
        _ => {
            print_usage(program);
            std::process::exit(1);
        }
    };

    for leftover in &report.leftovers {
        eprintln!(
            "warning: node {} ignores leftover arguments {:?}",
            leftover.index, leftover.args
        );
    }
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }

    let summary = RuntimeBuilder::run(Arc::clone(&app), strategy)
        .await
        .context("workflow execution failed")?;

    for key in app.aggregator().keys() {
        for audit in app.aggregator().retrieve(&key) {
            println!("== {}", describe(&key));
            print!("{}", audit);
        }
    }
    println!(
        "\n{} round(s), {} task run(s), {} result(s) in {:?}",
        summary.rounds, summary.executed, summary.aggregated, summary.duration
    );
    Ok(())
}

fn build_from_config(path: &str) -> Result<(Arc<App>, Strategy, BuildReport)> {
    let config = load_and_validate_config(path).with_context(|| format!("failed to load {}", path))?;
    let (workflow, app, strategy) = RuntimeBuilder::from_config(&config)
        .with_context(|| format!("failed to build workflow from {}", path))?;
    Ok((app, strategy, workflow.report().clone()))
}

fn build_from_tokens(tokens: &[String]) -> Result<(Arc<App>, Strategy, BuildReport)> {
    let mut parser = Parser::new();
    let remainder = parser
        .parse(tokens.iter().cloned())
        .context("failed to parse workflow")?;
    if !remainder.is_empty() {
        eprintln!("warning: ignoring {} token(s) after the end flag", remainder.len());
    }

    let schema = parser.into_schema().compacted();
    let app = Arc::new(App::new());
    let workflow = schema
        .build(&mut LocalUnitFactory::new(), app.as_ref())
        .context("failed to build workflow")?;
    Ok((app, Strategy::Sequential, workflow.report().clone()))
}

fn describe(key: &SourceKey) -> String {
    match key {
        SourceKey::Nil => "(no source)".to_string(),
        SourceKey::Marker(marker) => marker.to_string(),
        SourceKey::Merge(children) => format!(
            "(merge of {})",
            children.iter().map(describe).collect::<Vec<_>>().join(", ")
        ),
        SourceKey::Split(name) => format!("(split {})", name),
        SourceKey::Expand(position) => format!("(element {})", position),
    }
}
