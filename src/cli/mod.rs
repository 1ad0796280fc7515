pub mod pairs;
pub mod run;
pub mod schema;

use clap::{Parser, Subcommand};
use pairs::{coerce_flag, parse_pairs, Pairs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cypress-retries")]
#[command(
    author,
    version,
    about = "Runs Cypress tests from the CLI without the GUI, re-running failing specs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the suite, retrying failing specs
    Run(RunArgs),

    /// Print JSON Schema for the settings file
    Schema,
}

#[derive(Parser, Clone, Debug)]
pub struct RunArgs {
    /// Records the run. Sends test results, screenshots and videos to your Cypress Dashboard
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = coerce_flag)]
    pub record: Option<bool>,

    /// Displays the Electron browser instead of running headlessly
    #[arg(long)]
    pub headed: bool,

    /// Total number of suite runs allowed before giving up [default: 3]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,

    /// Your secret Record Key. Can be omitted if CYPRESS_RECORD_KEY is set
    #[arg(short, long, value_name = "RECORD_KEY")]
    pub key: Option<String>,

    /// Runs specific spec files (comma-separated). Defaults to "all"
    #[arg(short, long, value_delimiter = ',')]
    pub spec: Option<Vec<String>>,

    /// Runs a specific mocha reporter. Pass a path to use a custom reporter
    #[arg(long)]
    pub reporter: Option<String>,

    /// Options for the mocha reporter
    #[arg(short = 'o', long)]
    pub reporter_options: Option<String>,

    /// Runs Cypress on a specific port. Overrides any value in cypress.json
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Sets environment variables (key=value, comma-separated)
    #[arg(short, long, value_parser = parse_pairs)]
    pub env: Option<Pairs>,

    /// Sets configuration values (key=value, comma-separated)
    #[arg(short, long, value_parser = parse_pairs)]
    pub config: Option<Pairs>,

    /// Runs Cypress in the browser with the given name.
    /// Using an external browser will not record a video
    #[arg(short, long, value_name = "BROWSER_NAME")]
    pub browser: Option<String>,

    /// Path to the project
    #[arg(short = 'P', long, value_name = "PROJECT_PATH")]
    pub project: Option<PathBuf>,

    /// Enables concurrent runs and load balancing of specs across machines
    #[arg(long)]
    pub parallel: bool,

    /// A named group for recorded runs in the Cypress Dashboard
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// The unique identifier for a run on your CI provider
    #[arg(long, value_name = "ID")]
    pub ci_build_id: Option<String>,

    /// Keep the browser open after tests finish
    #[arg(long = "no-exit")]
    pub no_exit: bool,

    /// Runs Cypress in development and bypasses binary check
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = coerce_flag)]
    pub dev: Option<bool>,

    /// Settings file [default: cypress-retries.yaml, if present]
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Write a JSON summary of every attempt to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,
}
