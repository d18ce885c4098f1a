use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const DEFAULT_GLYPHS: usize = 256;
const FIXTURE_DIR: &str = "target/xtask/fixtures";

fn main() {
    if let Err(error) = run() {
        eprintln!("xtask: {error}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "synth" => {
            let mut width = None;
            let mut height = None;
            let mut glyphs = DEFAULT_GLYPHS;
            let mut output = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--width" => width = Some(parse_number(&arg, args.next())?),
                    "--height" => height = Some(parse_number(&arg, args.next())?),
                    "--glyphs" => glyphs = parse_number(&arg, args.next())?,
                    "-o" | "--output" => {
                        output = Some(PathBuf::from(
                            args.next().ok_or("missing value for '--output'")?,
                        ))
                    }
                    "--help" | "-h" => {
                        print_synth_help();
                        return Ok(());
                    }
                    other => {
                        return Err(format!(
                            "unknown argument '{other}' for 'synth' (try: cargo xtask synth --help)"
                        ));
                    }
                }
            }
            let width = width.ok_or("'synth' requires --width")?;
            let height = height.ok_or("'synth' requires --height")?;
            synth(width, height, glyphs, output)
        }
        "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(format!(
            "unknown xtask command '{other}' (try: cargo xtask --help)"
        )),
    }
}

fn parse_number(flag: &str, value: Option<String>) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("missing value for '{flag}'"))?;
    value
        .parse::<usize>()
        .map_err(|error| format!("invalid value '{value}' for '{flag}': {error}"))
}

/// Writes a blob whose glyph `n` carries an `n`-dependent stroke pattern and
/// glyph 0 stays blank, mimicking a console font with an empty NUL cell.
fn synth(
    width: usize,
    height: usize,
    glyphs: usize,
    output: Option<PathBuf>,
) -> Result<(), String> {
    if width == 0 || height == 0 || glyphs == 0 {
        return Err("width, height and glyph count must be non-zero".to_owned());
    }

    let output = match output {
        Some(path) => path,
        None => repo_root()?
            .join(FIXTURE_DIR)
            .join(format!("synth_{width}x{height}x{glyphs}.bin")),
    };
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!("failed to create directory {}: {error}", parent.display())
        })?;
    }

    let glyph_size = width * height;
    let mut data = vec![0u8; glyph_size * glyphs];
    for glyph in 1..glyphs {
        let cell = &mut data[glyph * glyph_size..(glyph + 1) * glyph_size];
        let col = glyph % width;
        for row in 1..height.saturating_sub(1).max(1) {
            cell[row * width + col] = 0xFF;
            cell[row * width + (col + row) % width] = 0xFF;
        }
    }

    fs::write(&output, &data)
        .map_err(|error| format!("failed to write {}: {error}", output.display()))?;
    println!(
        "Wrote {} ({glyphs} glyphs of {width}x{height}, {} bytes)",
        output.display(),
        data.len()
    );
    Ok(())
}

fn repo_root() -> Result<PathBuf, String> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().map(Path::to_path_buf).ok_or_else(|| {
        format!(
            "failed to resolve repository root from {}",
            manifest_dir.display()
        )
    })
}

fn print_usage() {
    println!("Usage:");
    println!("  cargo xtask synth --width <W> --height <H> [--glyphs <N>] [-o <PATH>]");
}

fn print_synth_help() {
    println!("Write a synthetic headerless bitmap font blob for manual fontscale runs.");
    println!();
    print_usage();
    println!();
    println!("Options:");
    println!("  --glyphs   Glyph count (default {DEFAULT_GLYPHS})");
    println!("  --output   Destination file (default {FIXTURE_DIR}/synth_<W>x<H>x<N>.bin)");
}
