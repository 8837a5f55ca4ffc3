//! mockgen CLI binary.
//!
//! All JSON output goes to stdout, logs go to stderr. Errors are reported
//! as an error response on stdout with a non-zero exit code.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use mockgen::cli::{render_source, run_generate, run_resolve, AttributeMode};
use mockgen::config::{CliOverrides, GenConfig};
use mockgen::error::{MockGenError, MockGenResult, OutputErrorCode};
use mockgen::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Overload-safe mock stub generator.
///
/// Reads parsed method declarations as JSON and writes mock types with one
/// call counter and one settable handler per method.
#[derive(Parser, Debug)]
#[command(name = "mockgen", version, about = "Overload-safe mock stub generator")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for the generate command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum GenerateFormat {
    /// Full JSON response (default).
    #[default]
    Json,
    /// Generated mock source only.
    Swift,
}

/// Where attribute text comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum AttributeSource {
    /// Recorded attribute spans (default).
    #[default]
    Span,
    /// Scan the source lines above each declaration.
    Scan,
}

impl From<AttributeSource> for AttributeMode {
    fn from(source: AttributeSource) -> Self {
        match source {
            AttributeSource::Span => AttributeMode::Span,
            AttributeSource::Scan => AttributeMode::Scan,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate mocks for every type in a declaration file.
    Generate {
        /// Declaration file (JSON).
        #[arg(long)]
        input: PathBuf,
        /// Source file the declarations were parsed from.
        #[arg(long)]
        source: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: GenerateFormat,
        /// How attribute text is extracted.
        #[arg(long, value_enum, default_value = "span")]
        attributes: AttributeSource,
        /// Suffix of handler properties (default: Handler).
        #[arg(long)]
        handler_suffix: Option<String>,
        /// Suffix of call counter properties (default: CallCount).
        #[arg(long)]
        call_count_suffix: Option<String>,
        /// Suffix of generated mock type names (default: Mock).
        #[arg(long)]
        mock_suffix: Option<String>,
    },
    /// Report the identifier chosen for every method in a declaration file.
    Resolve {
        /// Declaration file (JSON).
        #[arg(long)]
        input: PathBuf,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::new(&err);

            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> MockGenResult<()> {
    match cli.command {
        Command::Generate {
            input,
            source,
            format,
            attributes,
            handler_suffix,
            call_count_suffix,
            mock_suffix,
        } => {
            let overrides = CliOverrides {
                handler_suffix,
                call_count_suffix,
                mock_suffix,
            };
            let config = GenConfig::resolve(&overrides)?;
            let response = run_generate(&input, source.as_deref(), &config, attributes.into())?;
            match format {
                GenerateFormat::Json => write_json(&response),
                GenerateFormat::Swift => {
                    let mut stdout = io::stdout();
                    writeln!(stdout, "{}", render_source(&response)).map_err(write_error)
                }
            }
        }
        Command::Resolve { input } => {
            let config = GenConfig::resolve(&CliOverrides::default())?;
            let response = run_resolve(&input, &config)?;
            write_json(&response)
        }
    }
}

fn write_json<T: serde::Serialize>(response: &T) -> MockGenResult<()> {
    emit_response(response, &mut io::stdout()).map_err(write_error)
}

fn write_error(e: io::Error) -> MockGenError {
    MockGenError::internal(format!("failed to write output: {}", e))
}
