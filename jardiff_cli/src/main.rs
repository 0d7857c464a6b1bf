use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use jardiff_common::{ColorMode, DiffConfig, Logger, OutputMode, SideTag, MAX_VERBOSITY};
use jardiff_core::output::formatter_for;
use jardiff_core::render::RendererKind;
use jardiff_core::{DiffSource, Differ};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jardiff")]
#[command(version = "0.1.0")]
#[command(about = "Compare two JAR archives or directories entry by entry", long_about = None)]
struct Cli {
    /// Left side: a .jar archive or a directory
    left: PathBuf,

    /// Right side: a .jar archive or a directory
    right: PathBuf,

    /// Include glob patterns; empty means include everything
    #[arg(short = 'i', long = "include", value_name = "GLOB", value_delimiter = ',')]
    includes: Vec<String>,

    /// Exclude glob patterns; an exclude always wins over an include
    #[arg(short = 'e', long = "exclude", value_name = "GLOB", value_delimiter = ',')]
    excludes: Vec<String>,

    /// Extra file extensions treated as class files for coalescing
    #[arg(short = 'c', long = "class-exts", value_name = "EXT", value_delimiter = ',')]
    class_extensions: Vec<String>,

    /// How class files are turned into comparable text
    #[arg(long = "class-text-producer", value_enum, default_value = "outline")]
    class_text_producer: RendererArg,

    /// Report style emitted on stdout
    #[arg(
        short = 'm',
        long = "output-mode",
        value_enum,
        default_value = "diff",
        conflicts_with_all = ["status", "stat"]
    )]
    output_mode: OutputModeArg,

    /// Shorthand for --output-mode status
    #[arg(long, conflicts_with = "stat")]
    status: bool,

    /// Shorthand for --output-mode stat
    #[arg(long)]
    stat: bool,

    /// Lines of context around each diff hunk
    #[arg(short = 'U', long = "context", value_name = "N", default_value_t = 4)]
    context_lines: usize,

    /// When to use ANSI colors
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorArg,

    /// Diagnostic verbosity, up to -vvv
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Exit with status 1 when the sides differ
    #[arg(long)]
    exit_code: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputModeArg {
    Status,
    Stat,
    Diff,
}

impl From<OutputModeArg> for OutputMode {
    fn from(arg: OutputModeArg) -> Self {
        match arg {
            OutputModeArg::Status => OutputMode::Status,
            OutputModeArg::Stat => OutputMode::Stat,
            OutputModeArg::Diff => OutputMode::Diff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Always,
    Auto,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Always => ColorMode::Always,
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RendererArg {
    /// ABI outline: declarations and signatures, no method bodies
    Outline,
    /// Class file major version mapped to a Java release label
    Version,
}

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Outline => RendererKind::ClassOutline,
            RendererArg::Version => RendererKind::ClassFileVersion,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Tracing goes to stderr so the report on stdout stays clean.
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if cli.verbose > MAX_VERBOSITY {
        eprintln!(
            "jardiff: at most -{} is supported",
            "v".repeat(MAX_VERBOSITY as usize)
        );
        return ExitCode::from(2);
    }

    match run(&cli) {
        Ok(changed) => {
            if cli.exit_code && changed {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("jardiff: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    for path in [&cli.left, &cli.right] {
        if !path.exists() {
            bail!("File or directory does not exist: {}", path.display());
        }
    }
    for pattern in cli.includes.iter().chain(cli.excludes.iter()) {
        glob::Pattern::new(pattern)
            .with_context(|| format!("invalid glob pattern '{pattern}'"))?;
    }

    let output_mode = if cli.status {
        OutputMode::Status
    } else if cli.stat {
        OutputMode::Stat
    } else {
        cli.output_mode.into()
    };
    let config = DiffConfig {
        includes: cli.includes.clone(),
        excludes: cli.excludes.clone(),
        class_extensions: cli.class_extensions.iter().cloned().collect(),
        output_mode,
        color_mode: cli.color.into(),
        context_lines: cli.context_lines,
    };

    info!("Comparing:");
    info!("  Left:  {}", cli.left.display());
    info!("  Right: {}", cli.right.display());

    let mut logger = Logger::new(
        Box::new(std::io::stdout()),
        Box::new(std::io::stderr()),
        cli.verbose,
        config.color_mode,
    );

    let left = DiffSource::open(SideTag::Left, &cli.left)?;
    let right = DiffSource::open(SideTag::Right, &cli.right)?;

    let renderer = RendererKind::from(cli.class_text_producer).create();
    let mut formatter = formatter_for(output_mode);
    let mut differ = Differ::new(left, right, config, renderer);

    let result = differ.diff(&mut logger, formatter.as_mut());
    differ.close(&mut logger);
    Ok(result?)
}
