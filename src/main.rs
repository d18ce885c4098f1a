use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use anyhow::Result;
use clap::Parser;

use fontscale::config::load_config;
use fontscale::error_codes::{error_code, find_coded_error};
use fontscale::report::compare_fonts;
use fontscale::RawFontBlob;

#[derive(Debug, Parser)]
#[command(name = "fontscale")]
#[command(about = "Estimate the relative size of two headerless bitmap fonts")]
#[command(version = version_string())]
struct Cli {
    /// Reference font blob
    font1: PathBuf,
    /// Font blob compared against the reference
    font2: PathBuf,
}

const fn version_string() -> &'static str {
    match option_env!("FONTSCALE_GIT_HASH") {
        Some(hash) => hash,
        None => env!("CARGO_PKG_VERSION"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // coded errors already lead with their code
            match error_code(&error) {
                Some(code) if find_coded_error(&error).is_none() => {
                    eprintln!("error: {code}: {error:#}")
                }
                _ => eprintln!("error: {error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config()?;
    if config.workers.is_none() {
        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        config = config.with_workers(workers);
    }

    let source = RawFontBlob::read(&cli.font1)?;
    let target = RawFontBlob::read(&cli.font2)?;
    let report = compare_fonts(&source, &target, &config)?;

    for analysis in [&report.source, &report.target] {
        eprintln!(
            "detected {}x{} ({} glyphs, score {:.3}) in {}",
            analysis.width,
            analysis.height,
            analysis.glyph_count,
            analysis.score.fraction(),
            analysis.name
        );
    }

    print!("{}", report.render_text());
    Ok(())
}
