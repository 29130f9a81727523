mod driver;
mod nfa;
mod thompson;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{info, Level};

/// Builds Thompson NFAs from postfix regular expressions, one per line.
#[derive(Debug, StructOpt)]
struct Opts {
    /// File with one postfix expression per line
    #[structopt(parse(from_os_str), default_value = "regex_postfix.txt")]
    file: PathBuf,
    /// More log output on stderr (repeatable)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
    /// Only log errors
    #[structopt(short, long)]
    quiet: bool,
}

impl Opts {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let opts = Opts::from_args();
    tracing_subscriber::fmt()
        .with_max_level(opts.log_level())
        .with_writer(io::stderr)
        .init();

    info!(file = %opts.file.display(), "reading expressions");
    let file = File::open(&opts.file)
        .with_context(|| format!("failed to open {}", opts.file.display()))?;

    let stdout = io::stdout();
    let summary = driver::process(BufReader::new(file), stdout.lock())
        .with_context(|| format!("failed to process {}", opts.file.display()))?;
    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "done"
    );
    Ok(())
}
