use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for megacd-cdc")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Format check, clippy with warnings denied, then the full test suite
    Ci,
    /// Run tests, optionally limited to one module
    Test {
        #[arg(long, value_enum)]
        module: Option<Module>,
        /// Include tests that need a real disc image
        #[arg(long)]
        ignored: bool,
    },
    /// Run the criterion benchmarks
    Bench,
    /// Print the sector headers of a disc image with cdc-dump
    Dump {
        /// Disc image (.cue, .bin or .iso)
        disc: String,
        #[arg(short = 's', long, default_value_t = 0)]
        start: u32,
        #[arg(short = 'n', long, default_value_t = 16)]
        count: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Module {
    Cdc,
    Disc,
    Config,
    SaveState,
    Session,
}

impl Module {
    fn filter(self) -> &'static str {
        match self {
            Module::Cdc => "core::cdc",
            Module::Disc => "core::disc",
            Module::Config => "core::config",
            Module::SaveState => "core::save_state",
            Module::Session => "core::session",
        }
    }
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Task::Ci => ci(),
        Task::Test { module, ignored } => test(module, ignored),
        Task::Bench => cargo(&["bench"]),
        Task::Dump { disc, start, count } => {
            let (start, count) = (start.to_string(), count.to_string());
            cargo(&[
                "run", "--bin", "cdc-dump", "--", &disc, "-s", &start, "-n", &count,
            ])
        }
    }
}

fn ci() -> Result<()> {
    let started = Instant::now();

    let steps: [(&str, &[&str]); 3] = [
        ("fmt", &["fmt", "--all", "--", "--check"]),
        ("clippy", &["clippy", "--all-targets", "--", "-D", "warnings"]),
        ("test", &["test", "--workspace"]),
    ];

    for (name, args) in steps {
        println!("{} {}", "==>".blue().bold(), name.bold());
        cargo(args)?;
    }

    println!(
        "{} ci finished in {:.1}s",
        "ok".green().bold(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn test(module: Option<Module>, ignored: bool) -> Result<()> {
    let mut args = vec!["test"];

    if let Some(module) = module {
        args.extend(["--lib", module.filter()]);
    }
    if ignored {
        args.extend(["--", "--include-ignored"]);
    }

    cargo(&args)
}

fn cargo(args: &[&str]) -> Result<()> {
    let status = Command::new("cargo").args(args).status()?;

    if !status.success() {
        bail!("cargo {} failed ({})", args.join(" "), status);
    }
    Ok(())
}
