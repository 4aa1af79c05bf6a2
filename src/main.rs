//! bom-bench: SBOM accuracy benchmarking for SCA tools
//!
//! Scores the SBOMs produced by software composition analysis tools against
//! ground-truth SBOMs, per scenario and aggregated per tool.

#![allow(
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value
)]

use anyhow::{Context, Result};
use bom_bench::{
    cli,
    config::{AppConfig, ConfigPreset, OutputConfig},
    pipeline::exit_codes,
    registry::AdapterRegistry,
    reports::ReportFormat,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  CycloneDX: 1.4, 1.5, 1.6 (JSON)",
        "\n\nOutput Formats:",
        "\n  summary, json, csv",
        "\n\nMetrics:",
        "\n  Precision, recall and F1 over normalized package URLs"
    )
}

#[derive(Parser)]
#[command(name = "bom-bench")]
#[command(version, long_version = build_long_version())]
#[command(about = "Benchmark SCA tools by scoring their SBOMs against ground truth", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  F1 below --min-f1, or scenarios that could not be evaluated
    3  Error occurred

EXAMPLES:
    # Score a single SBOM against its ground truth
    bom-bench compare expected.cdx.json actual.cdx.json --tool syft

    # Evaluate every tool over the whole scenario tree
    bom-bench benchmark --output-dir output

    # Only uv scenarios, CI gate on F1
    bom-bench benchmark --package-managers uv --min-f1 0.9 -o csv")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Settings preset used when no config file is found (default, strict, lenient)
    #[arg(long, global = true, value_parser = parse_preset)]
    preset: Option<ConfigPreset>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `compare` subcommand
#[derive(Parser)]
struct CompareArgs {
    /// Path to the expected (ground-truth) SBOM
    expected: PathBuf,

    /// Path to the SBOM produced by the tool
    actual: PathBuf,

    /// Tool that produced the actual SBOM
    #[arg(short, long, default_value = "syft")]
    tool: String,

    /// Package manager of the scenario (used as ecosystem hint)
    #[arg(short, long)]
    package_manager: Option<String>,

    /// Scenario label in the report (default: directory of the actual SBOM)
    #[arg(long)]
    scenario: Option<String>,

    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// List true positives, false positives and false negatives
    #[arg(long)]
    show_components: bool,

    /// Exit with code 1 if the F1 score is below this value
    #[arg(long)]
    min_f1: Option<f64>,
}

/// Arguments for the `benchmark` subcommand
#[derive(Parser)]
struct BenchmarkArgs {
    /// Directory holding `scenarios/<package-manager>/<scenario>/`
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory holding tool outputs (default: <output-dir>/benchmarks)
    #[arg(long)]
    benchmarks_dir: Option<PathBuf>,

    /// Tools to evaluate (comma separated)
    #[arg(long, value_delimiter = ',')]
    tools: Vec<String>,

    /// Package managers to evaluate (comma separated, or "all")
    #[arg(long, value_delimiter = ',')]
    package_managers: Vec<String>,

    /// Scenario names to evaluate (comma separated)
    #[arg(long, value_delimiter = ',')]
    scenarios: Vec<String>,

    /// Regex applied to scenario names
    #[arg(long)]
    filter: Option<String>,

    /// Worker threads (default: one per CPU)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Exit with code 1 if any tool's F1 score is below this value
    #[arg(long)]
    min_f1: Option<f64>,

    /// Do not fail when scenarios could not be evaluated
    #[arg(long)]
    no_fail_on_errors: bool,

    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Show per-scenario details in the report
    #[arg(long)]
    show_components: bool,

    /// Evaluate without writing result files
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one actual SBOM against one expected SBOM
    Compare(CompareArgs),

    /// Evaluate tools over the scenario tree and write results
    Benchmark(BenchmarkArgs),

    /// List registered tools and the ecosystems they support
    Tools,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .bom-bench.yaml in the current directory
    Init,
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Compare(args) => {
            let mut config = load_config(cli.config.as_ref(), cli.preset)?;
            apply_output_args(
                &mut config.output,
                args.output,
                args.output_file,
                args.show_components,
                cli.no_color,
            );
            config.ensure_valid()?;
            let registry = AdapterRegistry::from_config(&config.tools)?;

            let compare = cli::CompareConfig {
                expected: args.expected,
                actual: args.actual,
                tool: args.tool,
                package_manager: args.package_manager,
                scenario: args.scenario,
                min_f1: args.min_f1.or(config.benchmark.min_f1),
                normalization: config.normalization,
                output: config.output,
                quiet: cli.quiet,
            };
            cli::run_compare(&compare, &registry)
        }

        Commands::Benchmark(args) => {
            let mut config = load_config(cli.config.as_ref(), cli.preset)?;
            apply_benchmark_args(&mut config, &args);
            apply_output_args(
                &mut config.output,
                args.output,
                args.output_file,
                args.show_components,
                cli.no_color,
            );
            config.ensure_valid()?;
            let registry = AdapterRegistry::from_config(&config.tools)?;

            cli::run_benchmark(&config, &registry, args.dry_run, cli.quiet)
        }

        Commands::Tools => {
            let config = load_config(cli.config.as_ref(), cli.preset)?;
            let registry = AdapterRegistry::from_config(&config.tools)?;
            cli::run_tools(&registry);
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "bom-bench", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = bom_bench::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    bom_bench::config::load_or_default(cli.config.as_deref())?;
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("bom-bench").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in bom_bench::config::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match bom_bench::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(exit_codes::SUCCESS)
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(bom_bench::config::default_config_path());
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = bom_bench::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(exit_codes::SUCCESS)
            }
        },
    }
}

fn parse_preset(name: &str) -> Result<ConfigPreset, String> {
    ConfigPreset::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
        format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
    })
}

/// The config file when there is one, otherwise the preset (or the defaults)
fn load_config(explicit: Option<&PathBuf>, preset: Option<ConfigPreset>) -> Result<AppConfig> {
    let (config, loaded_from) =
        bom_bench::config::load_or_default(explicit.map(PathBuf::as_path))?;
    match (loaded_from, preset) {
        (Some(path), preset) => {
            if preset.is_some() {
                tracing::warn!("Ignoring --preset, settings come from {}", path.display());
            }
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        }
        (None, Some(preset)) => {
            tracing::debug!(preset = preset.name(), "Using config preset");
            Ok(AppConfig::from_preset(preset))
        }
        (None, None) => Ok(config),
    }
}

/// Command-line flags take precedence over the config file
fn apply_output_args(
    output: &mut OutputConfig,
    format: Option<ReportFormat>,
    file: Option<PathBuf>,
    show_components: bool,
    no_color: bool,
) {
    if let Some(format) = format {
        output.format = format;
    }
    if file.is_some() {
        output.file = file;
    }
    output.show_components |= show_components;
    output.no_color |= no_color;
}

fn apply_benchmark_args(config: &mut AppConfig, args: &BenchmarkArgs) {
    if let Some(dir) = &args.output_dir {
        config.paths.output_dir.clone_from(dir);
    }
    if args.benchmarks_dir.is_some() {
        config.paths.benchmarks_dir.clone_from(&args.benchmarks_dir);
    }

    let bench = &mut config.benchmark;
    if !args.tools.is_empty() {
        bench.tools.clone_from(&args.tools);
    }
    if !args.package_managers.is_empty() {
        bench.package_managers = if args.package_managers.iter().any(|pm| pm == "all") {
            Vec::new()
        } else {
            args.package_managers.clone()
        };
    }
    if !args.scenarios.is_empty() {
        bench.scenarios.clone_from(&args.scenarios);
    }
    if args.filter.is_some() {
        bench.filter.clone_from(&args.filter);
    }
    if args.jobs.is_some() {
        bench.jobs = args.jobs;
    }
    if args.min_f1.is_some() {
        bench.min_f1 = args.min_f1;
    }
    if args.no_fail_on_errors {
        bench.fail_on_errors = false;
    }
}
