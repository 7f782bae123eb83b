mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ninjagen_lib::config::BootstrapConfig;
use ninjagen_lib::consts::BUILD_FILE;
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, print_error};

/// Generate a Ninja build file for the nonius source tree
#[derive(Parser, Debug)]
#[command(name = "bootstrap")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Compiler executable
  #[arg(long, default_value = "g++", value_name = "EXECUTABLE")]
  cxx: String,

  /// Debug build: -g instead of -O3, no link-time optimisation
  #[arg(long)]
  debug: bool,

  /// Disable link-time optimisation
  #[arg(long)]
  no_lto: bool,

  /// Extra library directory, included as deps/<DIR>/include
  #[arg(long, value_name = "DIR")]
  boost_dir: Option<PathBuf>,

  /// Preprocessor definition passed as -D<DEF> (repeatable)
  #[arg(short = 'D', long = "define", value_name = "DEF")]
  defines: Vec<String>,

  /// Library linked as -l<LIB> (repeatable)
  #[arg(short = 'l', long = "lib", value_name = "LIB")]
  libs: Vec<String>,

  /// Project root to scan and write into
  #[arg(long, default_value = ".")]
  root: PathBuf,

  /// Build file name, relative to the root
  #[arg(short = 'o', long, default_value = BUILD_FILE)]
  output: PathBuf,

  /// Write a build file, or print the planned graph as JSON
  #[arg(long, value_enum, default_value = "ninja")]
  format: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn into_config(self, generator: PathBuf) -> BootstrapConfig {
    BootstrapConfig {
      cxx: self.cxx,
      debug: self.debug,
      no_lto: self.no_lto,
      boost_dir: self.boost_dir,
      defines: self.defines,
      libs: self.libs,
      root: self.root,
      output: self.output,
      generator,
      ..Default::default()
    }
  }
}

fn init_logging(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let format = cli.format;
  let generator = std::env::current_exe().context("Failed to locate the bootstrap executable")?;
  let config = cli.into_config(generator);

  cmd::cmd_generate(&config, format)
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  if let Err(err) = run(cli) {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}
