mod evaluator;
mod interpreter;
mod parser;
mod render;
mod source;
mod tokenizer;

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::interpreter::LineReport;
use crate::source::SourceLine;

fn main() -> anyhow::Result<()> {
    initialize_logging()?;

    let leafcode = Leafcode::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match leafcode.subcmd {
        LeafcodeSubcommand::Run(opts) => run(&opts, &mut out)?,
        LeafcodeSubcommand::Eval(opts) => eval(&opts, &mut out)?,
        LeafcodeSubcommand::Tokens(opts) => print_tokens(&opts, &mut out)?,
    }

    Ok(())
}

fn run(opts: &RunOpts, out: &mut impl Write) -> anyhow::Result<()> {
    let source = source::read_file(&opts.source)?;
    trace!(source_len = source.len(), "Read input file");

    let mut reports = Vec::new();
    let mut invalid_line = None;
    for line in source::lines(&source) {
        match line {
            Ok(line) => {
                let report = interpreter::process_line(&line);
                if opts.tree {
                    write_tree(&report, out)?;
                }
                writeln!(out, "stdout: {}", report.result)?;
                reports.push(report);
            }
            Err(err) => {
                invalid_line = Some(err);
                break;
            }
        }
    }

    if let Some(emit_dir) = &opts.emit_dir {
        emit_reports(emit_dir, &reports)?;
    }

    match invalid_line {
        Some(err) => Err(anyhow::Error::new(err)
            .context(format!("invalid source file {}", opts.source.display()))),
        None => Ok(()),
    }
}

fn eval(opts: &EvalOpts, out: &mut impl Write) -> anyhow::Result<()> {
    let text = opts.expression.trim();
    let line = SourceLine {
        number: 1,
        text: text.strip_suffix(';').unwrap_or(text).to_string(),
    };

    let report = interpreter::process_line(&line);
    if opts.tree {
        write_tree(&report, out)?;
    }
    writeln!(out, "{}", report.result)?;
    Ok(())
}

fn print_tokens(opts: &TokensOpts, out: &mut impl Write) -> anyhow::Result<()> {
    for token in tokenizer::tokenize(&opts.text).words() {
        writeln!(
            out,
            "Lexeme: {}, TokenType: {}, TokenValue: {}",
            token.text,
            token.kind,
            token.kind.index()
        )?;
    }
    Ok(())
}

fn write_tree(report: &LineReport, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{}", render::inline(&report.tree))?;
    writeln!(out, "{}", render::indented(&report.tree))?;
    Ok(())
}

fn emit_reports(emit_dir: &Path, reports: &[LineReport]) -> anyhow::Result<()> {
    std::fs::create_dir_all(emit_dir)
        .with_context(|| format!("couldn't create {}", emit_dir.display()))?;

    let reports_path = emit_dir.join("reports.json");
    std::fs::write(&reports_path, serde_json::to_string_pretty(reports)?)?;
    info!(reports_path = %reports_path.display(), lines = reports.len(), "Line reports written");
    Ok(())
}

fn initialize_logging() -> anyhow::Result<()> {
    let env_filter = env::var("RUST_LOG").unwrap_or_default();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::ERROR.into())
        .parse(&env_filter)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .init();
    Ok(())
}

/// Leafcode: a tiny garden-themed expression language.
#[derive(clap::Parser)]
#[clap(name = "leafcode", version)]
struct Leafcode {
    #[clap(subcommand)]
    subcmd: LeafcodeSubcommand,
}

#[derive(clap::Subcommand)]
enum LeafcodeSubcommand {
    /// Run every line of a source file.
    Run(RunOpts),
    /// Evaluate a single line given on the command line.
    Eval(EvalOpts),
    /// Show how the tokenizer classifies each word.
    Tokens(TokensOpts),
}

#[derive(clap::Parser, Debug)]
struct RunOpts {
    /// Source file; every line must end with ';'
    source: PathBuf,

    /// Print each line's tree before its result
    #[clap(short, long)]
    tree: bool,

    /// Directory to write `reports.json` into
    #[clap(short, long)]
    emit_dir: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct EvalOpts {
    /// The line to evaluate; the trailing ';' is optional
    expression: String,

    #[clap(short, long)]
    tree: bool,
}

#[derive(clap::Parser, Debug)]
struct TokensOpts {
    text: String,
}
