use clap::{Parser, Subcommand};
use config::ValueKind;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use java_syntax::config::{Loader, Settings, LOCAL_CONFIG_FILE};
use java_syntax::mirror::{mirror_tree, MirrorOptions};
use java_syntax::report::{stdout_stream, write_check_report, Reporter, Verbosity};
use java_syntax::{parse, AppError, ParseResult, Summary};

const STDIN_LABEL: &str = "<stdin>";

/// Checks Java snippets and strips or re-indents their comments
#[derive(Parser)]
#[command(name = "java-syntax", version)]
struct Cli {
    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a Java file without comments (re-indented by default)
    Strip(StripArgs),
    /// Report whether a snippet is well formed, and its shape flags
    Check(CheckArgs),
    /// Write a comment-free copy of every .java file under a directory
    Mirror(MirrorArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Keep comments in the output
    #[arg(long)]
    keep_comments: bool,

    /// Keep the original layout instead of re-indenting
    #[arg(long)]
    no_tabify: bool,

    /// Spaces per nesting level when re-indenting
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    tab_width: Option<u16>,
}

#[derive(clap::Args)]
struct StripArgs {
    /// Path to Java source file (use "-" to read from stdin)
    input: Option<PathBuf>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit successfully even if the source has a syntax error
    #[arg(long)]
    allow_invalid: bool,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Path to Java source file (use "-" to read from stdin)
    input: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct MirrorArgs {
    /// Directory to mirror
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Mirror directory, relative to the root
    #[arg(long)]
    dest: Option<String>,

    /// Print a dot per directory and file
    #[arg(long, conflicts_with = "quiet")]
    succinct: bool,

    /// Only print diagnostics
    #[arg(long)]
    quiet: bool,

    /// Abort at the first file with a syntax error
    #[arg(long)]
    stop_on_error: bool,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    input: &'a str,
    #[serde(flatten)]
    summary: Summary,
    error: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            Reporter::stdio(Verbosity::Quiet).error(&err.to_string());
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let mut overrides: Vec<(&str, ValueKind)> = Vec::new();
    match &cli.command {
        Command::Strip(args) => render_overrides(&args.render, &mut overrides),
        Command::Check(_) => {}
        Command::Mirror(args) => {
            render_overrides(&args.render, &mut overrides);
            if let Some(dest) = &args.dest {
                overrides.push(("mirror.destination", ValueKind::from(dest.as_str())));
            }
            if args.succinct {
                overrides.push(("mirror.verbosity", ValueKind::from("succinct")));
            }
            if args.quiet {
                overrides.push(("mirror.verbosity", ValueKind::from("quiet")));
            }
            if args.stop_on_error {
                overrides.push(("mirror.continue_on_error", ValueKind::from(false)));
            }
        }
    }
    let settings = load_settings(cli.config.as_deref(), overrides)?;

    match cli.command {
        Command::Strip(args) => strip(&args, &settings),
        Command::Check(args) => check(&args),
        Command::Mirror(args) => mirror(&args, &settings),
    }
}

fn render_overrides(args: &RenderArgs, overrides: &mut Vec<(&'static str, ValueKind)>) {
    if args.keep_comments {
        overrides.push(("render.keep_comments", ValueKind::from(true)));
    }
    if args.no_tabify {
        overrides.push(("render.tabify", ValueKind::from(false)));
    }
    if let Some(width) = args.tab_width {
        overrides.push(("render.tab_width", ValueKind::from(i64::from(width))));
    }
}

fn load_settings(
    config: Option<&Path>,
    overrides: Vec<(&str, ValueKind)>,
) -> Result<Settings, AppError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = config {
        loader = loader.with_file(path);
    }
    for (key, value) in overrides {
        loader = loader.set_override(key, value)?;
    }
    Ok(loader.build()?)
}

fn read_input(input: Option<&Path>) -> Result<(String, String), AppError> {
    let (mut reader, label): (Box<dyn Read>, String) = match input {
        Some(path) if path != Path::new("-") => {
            let file = fs::File::open(path).map_err(|e| AppError::io(path, e))?;
            (Box::new(file), path.display().to_string())
        }
        _ => (Box::new(io::stdin()), STDIN_LABEL.to_string()),
    };
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| AppError::io(&label, e))?;
    Ok((text, label))
}

fn invalid(label: &str, result: &ParseResult) -> Option<AppError> {
    result.error().map(|&diagnostic| AppError::Invalid {
        path: PathBuf::from(label),
        diagnostic,
    })
}

fn strip(args: &StripArgs, settings: &Settings) -> Result<ExitCode, AppError> {
    let (text, label) = read_input(args.input.as_deref())?;
    let result = parse(&text);
    let rendered = result.render(&settings.render.options());

    match &args.output {
        Some(path) => fs::write(path, rendered).map_err(|e| AppError::io(path, e))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| AppError::io("<stdout>", e))?;
        }
    }

    match invalid(&label, &result) {
        Some(err) if args.allow_invalid => {
            Reporter::stdio(Verbosity::Quiet).warning(&err.to_string());
            Ok(ExitCode::SUCCESS)
        }
        Some(err) => Err(err),
        None => Ok(ExitCode::SUCCESS),
    }
}

fn check(args: &CheckArgs) -> Result<ExitCode, AppError> {
    let (text, label) = read_input(args.input.as_deref())?;
    let result = parse(&text);

    if args.json {
        let report = CheckReport {
            input: &label,
            summary: *result.summary(),
            error: result.error().map(|d| d.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mut stdout = stdout_stream();
        write_check_report(&mut stdout, &label, &result)
            .map_err(|e| AppError::io("<stdout>", e))?;
    }

    Ok(if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn mirror(args: &MirrorArgs, settings: &Settings) -> Result<ExitCode, AppError> {
    let options = MirrorOptions::from_settings(&settings.mirror, settings.render.options());
    let mut reporter = Reporter::stdio(settings.mirror.verbosity);
    let stats = mirror_tree(&args.root, &options, &mut reporter)?;
    if stats.failed.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(AppError::Failed {
            failures: stats.failed.len(),
        })
    }
}
