use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "check-unittest-super")]
#[command(about = "Check that unittest fixture methods call super() as the last statement", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Python files to check
    pub paths: Vec<PathBuf>,

    /// Rewrite files instead of just reporting violations
    #[arg(long)]
    pub fix: bool,

    /// Print per-file and total elapsed time to stderr
    #[arg(long)]
    pub profile: bool,
}
