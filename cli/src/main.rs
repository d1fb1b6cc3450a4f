use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use option_alias_core::{KeyValue, Options, OptionsConfig, Value};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "optalias")]
#[command(about = "Load option definitions and exercise alias resolution")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log registry and tokenizer decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an argument vector against the defined options.
    Parse(ParseArgs),
    /// Print help text for the defined options.
    Help(HelpArgs),
    /// Resolve names to the canonical option they denote.
    Resolve(ResolveArgs),
    /// List the aliases of an option.
    Aliases(AliasesArgs),
    /// Check that a definition file builds without errors.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ConfigArg {
    /// Option definition file (.yaml, .yml or .json).
    #[arg(long)]
    config: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    config: ConfigArg,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to parse (after `--`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    #[command(flatten)]
    config: ConfigArg,
    /// Only render these groups (repeatable).
    #[arg(long = "group")]
    groups: Vec<String>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    config: ConfigArg,
    /// Names to resolve.
    #[arg(required = true)]
    names: Vec<String>,
}

#[derive(Debug, Args)]
struct AliasesArgs {
    #[command(flatten)]
    config: ConfigArg,
    /// Option name or alias.
    name: String,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[command(flatten)]
    config: ConfigArg,
}

/// Serialized result of the `parse` subcommand.
#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    values: BTreeMap<&'a str, &'a Value>,
    arguments: &'a [KeyValue],
    unmatched: &'a [String],
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Aliases(args) => run_aliases(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(config: &ConfigArg) -> Result<Options, String> {
    let loaded = OptionsConfig::load(&config.config)
        .map_err(|err| format!("Failed to load '{}': {err}", config.config.display()))?;
    let options = loaded.build().map_err(|err| err.to_string())?;
    debug!(
        options = options.table().len(),
        aliases = options.alias_count(),
        "built options"
    );
    Ok(options)
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let options = load_options(&args.config)?;
    let argv = std::iter::once(options.program().to_string()).chain(args.args);
    let result = options.parse(argv).map_err(|err| err.to_string())?;

    let values = result
        .values()
        .map(|(spec, value)| (spec.display_name(), value))
        .collect();
    let output = ParseOutput {
        values,
        arguments: result.arguments(),
        unmatched: result.unmatched(),
    };

    let raw = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&output).map_err(|e| e.to_string())?,
    };
    println!("{raw}");
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let options = load_options(&args.config)?;
    let text = if args.groups.is_empty() {
        options.help()
    } else {
        let groups: Vec<&str> = args.groups.iter().map(String::as_str).collect();
        options.help_groups(&groups)
    };
    print!("{text}");
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let options = load_options(&args.config)?;
    for name in &args.names {
        let canonical = options.resolve_alias(name).map_err(|err| err.to_string())?;
        println!("{name} -> {canonical}");
    }
    Ok(())
}

fn run_aliases(args: AliasesArgs) -> Result<(), String> {
    let options = load_options(&args.config)?;
    let aliases = options
        .get_aliases(&args.name)
        .map_err(|err| err.to_string())?;
    for alias in aliases {
        println!("{alias}");
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let options = load_options(&args.config)?;
    println!(
        "Validated {} option(s) and {} alias(es).",
        options.table().len(),
        options.alias_count()
    );
    Ok(())
}
