use anyhow::Result;
use check_unittest_super::cli::Cli;
use check_unittest_super::{check_file, fix_file};
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    let total_start = Instant::now();
    let mut failed = false;
    for path in &cli.paths {
        let file_start = Instant::now();
        if cli.fix {
            let (diagnostics, modified) = fix_file(path)?;
            for diagnostic in &diagnostics {
                eprintln!("{diagnostic}");
            }
            failed |= modified || !diagnostics.is_empty();
        } else {
            let diagnostics = check_file(path)?;
            for diagnostic in &diagnostics {
                eprintln!("{diagnostic}");
            }
            failed |= !diagnostics.is_empty();
        }
        if cli.profile {
            eprintln!(
                "{}: {:.1}ms",
                path.display(),
                file_start.elapsed().as_secs_f64() * 1000.0
            );
        }
    }
    if cli.profile {
        eprintln!("total: {:.1}ms", total_start.elapsed().as_secs_f64() * 1000.0);
    }

    Ok(if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
