mod report;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use deadsignal_game::{Catalog, TerminalSession};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write, stdin, stdout};
use std::path::{Path, PathBuf};

use report::{RunReport, write_entries};
use script::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Human-readable summary
    Console,
    /// Machine-readable summary
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "deadsignal-terminal", version)]
#[command(about = "Dead Signal survival terminal - interactive play and scripted replays")]
struct Args {
    /// Seed for the command and tick random streams
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Replay commands from a script instead of reading stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Clock ticks to run after every command
    #[arg(long, default_value_t = 0)]
    ticks_per_command: u32,

    /// Summary format written when the run ends
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Write the transcript and summary to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Echo every history line, including tick output
    #[arg(short, long)]
    verbose: bool,

    /// Load a JSON content catalog instead of the embedded one
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.output.is_some() {
        colored::control::set_override(false);
    }

    let custom;
    let catalog: &Catalog = if let Some(path) = &args.catalog {
        custom = load_catalog(path)?;
        &custom
    } else {
        Catalog::builtin()
    };

    let mut session = TerminalSession::with_catalog(catalog, args.seed);
    let mut out = OutputTarget::new(args.output.clone())?;
    let quiet_summary = args.report == ReportFormat::Json;

    if !quiet_summary {
        let boot: Vec<_> = session.state().history.iter().cloned().collect();
        write_entries(out.writer(), &boot)?;
    }

    let commands = if let Some(path) = &args.script {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        let steps = script::parse(&body)
            .with_context(|| format!("failed to parse script {}", path.display()))?;
        run_steps(&args, &mut session, steps, &mut out, quiet_summary)?
    } else {
        run_interactive(&args, &mut session, &mut out)?
    };

    let summary = RunReport::from_session(&session, commands);
    match args.report {
        ReportFormat::Json => summary.write_json(out.writer())?,
        ReportFormat::Console => summary.write_console(out.writer())?,
    }
    out.flush_inner()?;
    Ok(())
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    Catalog::from_json(&body).with_context(|| format!("invalid catalog {}", path.display()))
}

/// Feed one step into the session and print what it produced.
fn run_step(
    args: &Args,
    session: &mut TerminalSession<'_>,
    step: &Step,
    out: &mut OutputTarget,
    silent: bool,
) -> Result<bool> {
    let mut printed = Vec::new();
    let is_command = match step {
        Step::Command(line) => {
            printed.extend(session.submit(line));
            let ticked = session.tick_n(args.ticks_per_command);
            if args.verbose {
                printed.extend(ticked);
            }
            true
        }
        Step::Tick(count) => {
            let ticked = session.tick_n(*count);
            if args.verbose {
                printed.extend(ticked);
            }
            false
        }
    };
    log::debug!("step {step:?} produced {} lines", printed.len());
    if !silent {
        write_entries(out.writer(), &printed)?;
    }
    Ok(is_command)
}

fn run_steps(
    args: &Args,
    session: &mut TerminalSession<'_>,
    steps: Vec<Step>,
    out: &mut OutputTarget,
    silent: bool,
) -> Result<usize> {
    let mut commands = 0;
    for step in &steps {
        if run_step(args, session, step, out, silent)? {
            commands += 1;
        }
    }
    Ok(commands)
}

fn run_interactive(
    args: &Args,
    session: &mut TerminalSession<'_>,
    out: &mut OutputTarget,
) -> Result<usize> {
    let mut commands = 0;
    let input = stdin();
    for line in input.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let trimmed = line.trim();
        if matches!(trimmed, "quit" | "exit") {
            break;
        }
        let step = match script::parse_directive(trimmed) {
            Ok(Some(step)) => step,
            Ok(None) => Step::Command(line.clone()),
            Err(err) => {
                eprintln!("{} {err:#}", "!".red().bold());
                continue;
            }
        };
        if run_step(args, session, &step, out, false)? {
            commands += 1;
        }
        out.flush_inner()?;
    }
    Ok(commands)
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            seed: 7,
            script: None,
            ticks_per_command: 2,
            report: ReportFormat::Json,
            output: None,
            verbose: false,
            catalog: None,
        }
    }

    #[test]
    fn steps_count_only_commands() {
        let args = args();
        let mut session = TerminalSession::new(args.seed);
        let mut out = OutputTarget::new(None).expect("stdout");
        let steps = script::parse("status\ntick 10\nintel\n").expect("script");
        let commands = run_steps(&args, &mut session, steps, &mut out, true).expect("run");
        assert_eq!(commands, 2);
        assert_eq!(session.state().time, 14);
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).expect_err("missing");
        assert!(format!("{err:#}").contains("failed to read catalog"));
    }
}
