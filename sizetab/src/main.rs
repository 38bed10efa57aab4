//! # sizetab
//!
//! A CLI tool for rendering binary-size reports as bordered tables.
//!
//! ## Overview
//!
//! sizetab is built on top of sizetablib and turns a JSON size report —
//! an ordered sequence of labels with names, byte sizes, and ancestor
//! paths — into a human-readable table. Given a second report it renders
//! a diff instead: `++`/`--` markers, signed size deltas, and `(SAME)`
//! rows for unchanged top-level groups.
//!
//! ## Usage
//!
//! ```bash
//! # Render a size report
//! sizetab report.json
//!
//! # Diff against a base report (report.json is the new side)
//! sizetab report.json --diff base.json
//!
//! # Unicode box-drawing borders, tighter name columns
//! sizetab report.json --charset line --max-width 40
//!
//! # reStructuredText-compatible output, written to a file
//! sizetab report.json --rst -o report.rst
//! ```
//!
//! ## Report format
//!
//! ```json
//! {
//!   "data_sources": ["segment", "symbol"],
//!   "labels": [
//!     {"name": "main", "size": 1024, "parents": [".code"]}
//!   ]
//! }
//! ```

use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use serde::Deserialize;
use sizetablib::{
    diff_maps, Charset, DataSourceMap, Label, RenderOptions, SourceMap, TableBuilder,
};

/// On-disk size report: data-source names plus the ordered leaf labels.
#[derive(Debug, Deserialize)]
struct ReportFile {
    data_sources: Vec<String>,
    labels: Vec<Label>,
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("sizetab")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Renders binary size reports as bordered tables")
        .arg(
            Arg::new("report")
                .help("Size report JSON file")
                .required(true),
        )
        .arg(
            Arg::new("diff")
                .short('d')
                .long("diff")
                .value_name("BASE")
                .help("Base report to diff against; the positional report is the new side"),
        )
        .arg(
            Arg::new("max-width")
                .long("max-width")
                .value_name("N")
                .default_value("80")
                .help("Cap on a name column's width before wrapping"),
        )
        .arg(
            Arg::new("charset")
                .long("charset")
                .value_parser(["ascii", "line"])
                .default_value("ascii")
                .help("Border glyph set"),
        )
        .arg(
            Arg::new("rst")
                .long("rst")
                .action(ArgAction::SetTrue)
                .help("Emit reStructuredText-compatible output"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the table to a file instead of stdout"),
        )
}

/// Read and validate one report file into a hierarchy.
fn load_report(path: &str) -> anyhow::Result<DataSourceMap> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read report '{path}'"))?;
    let report: ReportFile =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse report '{path}'"))?;
    DataSourceMap::from_labels(report.data_sources, report.labels)
        .with_context(|| format!("invalid hierarchy in report '{path}'"))
}

fn run() -> anyhow::Result<()> {
    let matches = build_command().get_matches();

    let report_path = matches
        .get_one::<String>("report")
        .expect("report is required");
    let new_map = load_report(report_path)?;

    let source = match matches.get_one::<String>("diff") {
        Some(base_path) => {
            let old_map = load_report(base_path)?;
            SourceMap::Diff(diff_maps(&old_map, &new_map)?)
        }
        None => SourceMap::Plain(new_map),
    };

    let col_max_width: usize = matches
        .get_one::<String>("max-width")
        .expect("defaulted")
        .parse()
        .context("--max-width must be a positive integer")?;
    let charset = match matches.get_one::<String>("charset").map(String::as_str) {
        Some("line") => Charset::LINE,
        _ => Charset::ASCII,
    };
    let options = RenderOptions::new()
        .with_col_max_width(col_max_width)
        .with_charset(charset)
        .with_rst_output(matches.get_flag("rst"));

    let mut table = TableBuilder::new(&source, options).build();
    if !table.ends_with('\n') {
        table.push('\n');
    }

    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, &table).with_context(|| format!("failed to write '{path}'"))?
        }
        None => print!("{table}"),
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sizetab: {err:#}");
            ExitCode::FAILURE
        }
    }
}
