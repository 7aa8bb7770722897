mod config;
mod output;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xrd_crd_core::{
    CompositeResourceDefinition, CustomResourceDefinition, CustomResourceDefinitionStatus,
    DefinitionVariant, generate, validate_claim_names, validate_versions,
};

use crate::config::RenderConfig;
use crate::output::{OutputFormat, format_crd, format_stream};

/// Exit code of `established` when the CRD is not yet established.
const EXIT_NOT_ESTABLISHED: i32 = 2;

/// CLI-specific variant enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliVariant {
    Composite,
    Claim,
}

impl From<CliVariant> for DefinitionVariant {
    fn from(variant: CliVariant) -> Self {
        match variant {
            CliVariant::Composite => Self::Composite,
            CliVariant::Claim => Self::Claim,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "xrd-crd")]
#[command(about = "Generate CustomResourceDefinitions from composite resource definitions")]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the composite and claim CRDs for a definition.
    Render(RenderArgs),
    /// Check a definition's names, versions and schemas without rendering.
    Validate(ValidateArgs),
    /// Report whether a CRD's status says it is established.
    Established(EstablishedArgs),
    /// Write a render configuration file holding the defaults.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Composite resource definition manifest (YAML or JSON).
    #[arg(long)]
    input: PathBuf,
    /// Render configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// CRD to render; repeat for several (default: from config, else both).
    #[arg(long = "variant")]
    variants: Vec<CliVariant>,
    /// Output format (default: from config, else yaml).
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Write one file per CRD into this directory instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Fail if the definition's versions do not validate.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Composite resource definition manifest (YAML or JSON).
    #[arg(long)]
    input: PathBuf,
}

#[derive(Debug, Args)]
struct EstablishedArgs {
    /// CustomResourceDefinition manifest, or a bare status object.
    #[arg(long)]
    input: PathBuf,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Path of the configuration file to create.
    #[arg(long)]
    output: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Render(args) => run_render(args).map(|()| 0),
        Command::Validate(args) => run_validate(args).map(|()| 0),
        Command::Established(args) => run_established(args),
        Command::InitConfig(args) => run_init_config(args).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
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

fn run_render(args: RenderArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => RenderConfig::default(),
    };
    let xrd = load_definition(&args.input)?;

    if args.strict || config.strict_versions {
        let issues = validate_versions(&xrd);
        if !issues.is_empty() {
            let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
            return Err(format!(
                "definition '{}' has invalid versions: {}",
                xrd.metadata.name,
                listed.join("; ")
            ));
        }
    }

    // Variants named on the command line are required; configured ones are
    // skipped when the definition cannot produce them.
    let format = args.format.unwrap_or(config.format);
    let explicit = !args.variants.is_empty();
    let variants: Vec<DefinitionVariant> = if explicit {
        args.variants.into_iter().map(Into::into).collect()
    } else {
        config.variants
    };

    let mut crds = Vec::new();
    for variant in variants {
        if variant == DefinitionVariant::Claim && !explicit && !xrd.offers_claim() {
            info!(definition = %xrd.metadata.name, "No claim names declared, skipping claim CRD");
            continue;
        }
        let crd = generate(&xrd, variant).map_err(|err| {
            format!(
                "cannot render {variant} CRD for '{}': {}",
                xrd.metadata.name,
                error_chain(&err)
            )
        })?;
        debug!(crd = %crd.metadata.name, %variant, "Rendered CRD");
        crds.push(crd);
    }

    match args.output {
        Some(dir) => write_crds(&dir, &crds, format),
        None => {
            print!("{}", format_stream(&crds, format)?);
            Ok(())
        }
    }
}

fn write_crds(
    dir: &Path,
    crds: &[CustomResourceDefinition],
    format: OutputFormat,
) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|err| {
        format!("Failed to create output directory '{}': {err}", dir.display())
    })?;

    for crd in crds {
        let path = dir.join(format!("{}.{}", crd.metadata.name, format.extension()));
        fs::write(&path, format_crd(crd, format)?)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let xrd = load_definition(&args.input)?;
    let mut problems: Vec<String> = validate_versions(&xrd)
        .iter()
        .map(ToString::to_string)
        .collect();

    if xrd.offers_claim() {
        if let Err(err) = validate_claim_names(&xrd) {
            problems.push(err.to_string());
        }
    }

    // Generation decodes every version schema; the composite variant is
    // enough to surface schema errors.
    if let Err(err) = generate(&xrd, DefinitionVariant::Composite) {
        problems.push(error_chain(&err));
    }

    if problems.is_empty() {
        println!("{}: ok", xrd.metadata.name);
        return Ok(());
    }

    for problem in &problems {
        println!("{}: {problem}", xrd.metadata.name);
    }
    Err(format!(
        "{} problem(s) found in '{}'",
        problems.len(),
        args.input.display()
    ))
}

fn run_established(args: EstablishedArgs) -> Result<i32, String> {
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    let document: serde_yaml::Value = serde_yaml::from_str(&raw)
        .map_err(|err| format!("Failed to parse '{}': {err}", args.input.display()))?;

    let status_value = match document.get("status") {
        Some(status) => status.clone(),
        None => document,
    };
    let status: CustomResourceDefinitionStatus = serde_yaml::from_value(status_value)
        .map_err(|err| format!("Invalid status in '{}': {err}", args.input.display()))?;

    if status.is_established() {
        println!("established");
        Ok(0)
    } else {
        println!("not established");
        Ok(EXIT_NOT_ESTABLISHED)
    }
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            args.output.display()
        ));
    }
    RenderConfig::default()
        .save(&args.output)
        .map_err(|err| format!("Failed to write config '{}': {err}", args.output.display()))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

/// Reads a composite resource definition; YAML parsing also accepts JSON.
fn load_definition(path: &Path) -> Result<CompositeResourceDefinition, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    serde_yaml::from_str(&raw)
        .map_err(|err| format!("Failed to parse definition '{}': {err}", path.display()))
}

/// Joins an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
