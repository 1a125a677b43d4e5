//! Command-line front end for markform.
//!
//! `convert` lays a form document out into a placement-plan JSON file;
//! `export` turns filled-form value files into spreadsheets.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use markform::error::{MarkformError, Result};
use markform::export::{export_combined, export_single, read_values, ValueSet};

#[derive(Parser)]
#[command(name = "markform", version, about = "Flow layout engine for plain-text form documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lay out a form document into a placement-plan JSON file
    Convert {
        /// Source document with inline field placeholders
        input: PathBuf,
        /// Output path; defaults to <input stem>_form.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export filled-form value files to a spreadsheet
    Export {
        /// One or more JSON value files (field name to value)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output spreadsheet path
        #[arg(short, long)]
        output: PathBuf,
        /// Sheet shape; auto picks single for one input, combined otherwise
        #[arg(long, value_enum, default_value_t = Mode::Auto)]
        mode: Mode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Auto,
    Single,
    Combined,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert { input, output } => convert(&input, output),
        Command::Export { inputs, output, mode } => export(&inputs, &output, mode),
    }
}

fn convert(input: &Path, output: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        return Err(MarkformError::MissingInput { path: input.to_path_buf() });
    }
    let text = fs::read_to_string(input).map_err(|source| MarkformError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let plan = markform::compose(&text);
    let json = serde_json::to_string_pretty(&plan)?;

    let out = output.unwrap_or_else(|| default_output(input));
    fs::write(&out, json).map_err(|source| MarkformError::Io {
        path: out.clone(),
        source,
    })?;
    println!("created {} ({} pages, {} ops)", out.display(), plan.page_count, plan.ops.len());
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().map_or_else(|| "form".to_string(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_form.json"))
}

fn export(inputs: &[PathBuf], output: &Path, mode: Mode) -> Result<()> {
    let mut sources: Vec<(String, ValueSet)> = Vec::with_capacity(inputs.len());
    for input in inputs {
        if !input.exists() {
            return Err(MarkformError::MissingInput { path: input.clone() });
        }
        let name = input
            .file_name()
            .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
        sources.push((name, read_values(input)?));
    }

    let written = match mode {
        Mode::Single if sources.len() > 1 => {
            log::warn!("--mode single with {} inputs; exporting only the first", sources.len());
            export_single(&sources[0].1, output)?
        }
        Mode::Single => export_single(&sources[0].1, output)?,
        Mode::Auto if sources.len() == 1 => export_single(&sources[0].1, output)?,
        Mode::Auto | Mode::Combined => export_combined(&sources, output)?,
    };

    if written {
        println!("created {}", output.display());
    }
    Ok(())
}
