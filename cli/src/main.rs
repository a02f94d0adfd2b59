//! Agent Factory CLI
//!
//! Validates agent specs, compiles them into bot-definition templates and
//! scaffolds new specs.
//!
//! Usage:
//!   af validate specs/*.yaml
//!   af generate specs/help-desk.yaml -o templates/
//!   af init help-desk -c gcc
//!
//! Each spec file is processed independently. A failure is reported and the
//! remaining files still run; the exit status is non-zero if any file failed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use factory_contracts::{
    diagnostics::Severity,
    error::{ForgeError, ForgeResult},
    options::{CompileOptions, DEFAULT_CLOUD},
    spec::AgentSpec,
    validation::ValidationReport,
};
use factory_core::{
    config::options_from_file,
    scaffold::{starter_spec, DEFAULT_AGENT_SLUG},
    traits::SpecValidator,
    Compiler,
};
use factory_verify::SchemaSpecValidator;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Agent Factory: compile declarative agent specs into bot templates.
#[derive(Parser)]
#[command(
    name = "af",
    version,
    about = "Agent Factory spec-to-template compiler",
    long_about = "Validates declarative agent specs and compiles them into\n\
                  bot-definition templates ready for import."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate spec files against the agent spec schema.
    Validate {
        #[arg(required = true)]
        specs: Vec<PathBuf>,
        /// Custom JSON Schema file (JSON or YAML).
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
    /// Generate bot-definition templates from spec files.
    Generate {
        #[arg(required = true)]
        specs: Vec<PathBuf>,
        /// Output file, or a directory when it ends with '/'.
        #[arg(short, long, default_value = "templates/")]
        output: String,
        /// TOML file with compile options.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Publisher prefix, overriding the config file.
        #[arg(long)]
        prefix: Option<String>,
        /// Target environment id, overriding the config file.
        #[arg(long)]
        environment_id: Option<String>,
    },
    /// Write a starter spec for a new agent.
    Init {
        /// Agent slug, e.g. "help-desk".
        name: Option<String>,
        /// Sovereign cloud: commercial, gcc, gcch or dod.
        #[arg(short, long, default_value = DEFAULT_CLOUD)]
        cloud: String,
        /// Directory the spec is written to.
        #[arg(long, default_value = "specs")]
        dir: PathBuf,
        /// Overwrite an existing spec file.
        #[arg(long)]
        force: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Set RUST_LOG=debug for per-component output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate { specs, schema } => run_validate(&specs, schema.as_deref()),
        Command::Generate { specs, output, config, prefix, environment_id } => {
            load_options(config.as_deref(), prefix, environment_id)
                .and_then(|options| run_generate(&specs, &output, options))
        }
        Command::Init { name, cloud, dir, force } => run_init(name.as_deref(), &cloud, &dir, force),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("af: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────
//
// Each returns Ok(false) when some file failed but the command ran to the end,
// and Err only when it could not start at all.

fn run_validate(specs: &[PathBuf], schema: Option<&Path>) -> ForgeResult<bool> {
    let validator = match schema {
        Some(path) => SchemaSpecValidator::from_file(path)?,
        None => SchemaSpecValidator::new()?,
    };

    println!("Validating specs...");
    let mut all_ok = true;

    for path in specs {
        match read_yaml_value(path).and_then(|raw| validator.validate(&raw)) {
            Ok(ValidationReport { valid: true, .. }) => println!("  ok    {}", path.display()),
            Ok(report) => {
                println!("  FAIL  {}", path.display());
                for error in &report.errors {
                    println!("        - {}", error);
                }
                all_ok = false;
            }
            Err(e) => {
                println!("  FAIL  {}: {}", path.display(), e);
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}

fn run_generate(specs: &[PathBuf], output: &str, options: CompileOptions) -> ForgeResult<bool> {
    let compiler = Compiler::new(options);
    let validator = SchemaSpecValidator::new()?;

    println!("Generating templates...");
    let mut all_ok = true;

    for path in specs {
        let destination = output_path(path, output);
        match generate_one(&compiler, &validator, path, &destination) {
            Ok(()) => println!("  ok    {} -> {}", path.display(), destination.display()),
            Err(e) => {
                println!("  FAIL  {}: {}", path.display(), e);
                all_ok = false;
            }
        }
    }

    Ok(all_ok)
}

fn generate_one(
    compiler: &Compiler,
    validator: &dyn SpecValidator,
    path: &Path,
    destination: &Path,
) -> ForgeResult<()> {
    let raw = read_yaml_value(path)?;
    validator.ensure_valid(&raw)?;
    let spec: AgentSpec = serde_json::from_value(raw).map_err(|e| ForgeError::Serialization {
        reason: format!("failed to read spec '{}': {}", path.display(), e),
    })?;

    let compilation = compiler.compile(&spec)?;
    for diagnostic in compilation.diagnostics.iter() {
        let label = match diagnostic.severity {
            Severity::Info => "note",
            Severity::Warning => "warn",
        };
        println!(
            "        {label}: {} [{}]: {}",
            diagnostic.context, diagnostic.code, diagnostic.message
        );
    }

    let yaml = serde_yaml::to_string(&compilation.document)
        .map_err(|e| ForgeError::Serialization { reason: e.to_string() })?;
    write_file(destination, &yaml)?;

    debug!(
        spec = %path.display(),
        template = %destination.display(),
        cloud = %compilation.cloud.cloud_name,
        "template written"
    );
    Ok(())
}

fn run_init(name: Option<&str>, cloud: &str, dir: &Path, force: bool) -> ForgeResult<bool> {
    let slug = name.unwrap_or(DEFAULT_AGENT_SLUG);
    let path = dir.join(format!("{slug}.yaml"));
    if path.exists() && !force {
        return Err(ForgeError::Io {
            reason: format!("'{}' already exists; pass --force to overwrite", path.display()),
        });
    }

    let spec = starter_spec(Some(slug), cloud);
    let yaml = serde_yaml::to_string(&spec)
        .map_err(|e| ForgeError::Serialization { reason: e.to_string() })?;
    write_file(&path, &yaml)?;

    println!("Created {}", path.display());
    Ok(true)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Config file first, then flag overrides on top.
fn load_options(
    config: Option<&Path>,
    prefix: Option<String>,
    environment_id: Option<String>,
) -> ForgeResult<CompileOptions> {
    let mut options = match config {
        Some(path) => options_from_file(path)?,
        None => CompileOptions::default(),
    };
    if let Some(prefix) = prefix {
        options.prefix = prefix;
    }
    if let Some(environment_id) = environment_id {
        options.environment_id = environment_id;
    }
    Ok(options)
}

/// A trailing '/' makes `output` a directory holding `<stem>-template.yaml`.
fn output_path(spec: &Path, output: &str) -> PathBuf {
    if output.ends_with('/') {
        let stem = spec.file_stem().and_then(|s| s.to_str()).unwrap_or("agent");
        Path::new(output).join(format!("{stem}-template.yaml"))
    } else {
        PathBuf::from(output)
    }
}

fn read_file(path: &Path) -> ForgeResult<String> {
    std::fs::read_to_string(path).map_err(|e| ForgeError::Io {
        reason: format!("failed to read '{}': {}", path.display(), e),
    })
}

fn read_yaml_value(path: &Path) -> ForgeResult<serde_json::Value> {
    let contents = read_file(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ForgeError::Serialization {
        reason: format!("failed to parse '{}': {}", path.display(), e),
    })
}

fn write_file(path: &Path, contents: &str) -> ForgeResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ForgeError::Io {
            reason: format!("failed to create '{}': {}", parent.display(), e),
        })?;
    }
    std::fs::write(path, contents).map_err(|e| ForgeError::Io {
        reason: format!("failed to write '{}': {}", path.display(), e),
    })
}
