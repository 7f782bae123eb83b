//! Implementation of the `bootstrap` command.
//!
//! Scans the project, plans the build graph and either writes the build file
//! or prints the graph as JSON.

use anyhow::{Context, Result};
use tracing::debug;

use ninjagen_lib::config::BootstrapConfig;
use ninjagen_lib::generate::{GraphReport, generate, load};

use crate::output::{OutputFormat, plural, print_json, print_stat, print_success};

pub fn cmd_generate(config: &BootstrapConfig, format: OutputFormat) -> Result<()> {
  debug!(root = ?config.root, ?format, "generating");

  match format {
    OutputFormat::Ninja => write_build_file(config),
    OutputFormat::Json => print_graph(config),
  }
}

fn write_build_file(config: &BootstrapConfig) -> Result<()> {
  let report = generate(config)
    .with_context(|| format!("Failed to generate build file in {}", config.root.display()))?;

  print_success(&format!(
    "Wrote {} ({}, {})",
    report.output.display(),
    plural(report.rules, "rule"),
    plural(report.nodes, "build statement")
  ));
  print_stat("Library sources", &report.library_sources.to_string());
  print_stat("Test sources", &report.test_sources.to_string());
  print_stat("Examples", &report.examples.to_string());

  Ok(())
}

fn print_graph(config: &BootstrapConfig) -> Result<()> {
  let (sources, graph) =
    load(config).with_context(|| format!("Failed to plan build graph for {}", config.root.display()))?;

  print_json(&GraphReport::new(config, &sources, &graph))
}
