use std::path::PathBuf;
use std::process;
use std::time::Duration;

use brushscript::prelude::{Interpreter, Limits};
use brushscript::BrushScript;
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Run a brushscript file")]
struct Args {
    /// Script to run
    script: PathBuf,
    /// Stop after this many executed instructions
    #[arg(long)]
    max_steps: Option<u64>,
    /// Stop after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Maximum nesting of script function calls
    #[arg(long)]
    max_call_depth: Option<usize>,
    /// Seed for the random range literals
    #[arg(long)]
    seed: Option<u64>,
    /// Trace parsing and execution on stderr
    #[arg(short, long)]
    verbose: bool,
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:5} - {} - {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> Result<(), anyhow::Error> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(64);
        }
        Err(e) => e.exit(),
    };

    log::set_logger(&LOGGER)?;
    log::set_max_level(if args.verbose { log::LevelFilter::Trace } else { log::LevelFilter::Off });

    let mut limits = Limits::default();
    if let Some(max_steps) = args.max_steps {
        limits = limits.with_max_steps(max_steps);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        limits = limits.with_timeout(Duration::from_millis(timeout_ms));
    }
    if let Some(max_call_depth) = args.max_call_depth {
        limits = limits.with_max_call_depth(max_call_depth);
    }

    let mut interpreter = Interpreter::new().with_limits(limits);
    if let Some(seed) = args.seed {
        interpreter = interpreter.with_seed(seed);
    }

    let mut brushscript = BrushScript::with_interpreter(interpreter);
    let result = brushscript.run_file(&args.script);

    // Script failures are already reported on stderr, only the exit code is left.
    let reporter = brushscript.error_reporter();
    log::debug!("{} warning(s), {} error(s) reported", reporter.warnings, reporter.errors);
    if reporter.had_error {
        process::exit(65);
    }
    if reporter.had_runtime_error {
        process::exit(70);
    }

    result.map(|_| ())
}
