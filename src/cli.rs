//! Command line of the `validate-nerc-data` binary.
//!
//! The binary loads rates and/or outages files, validates them and discards
//! the result. CI runs it to keep malformed data out of the main branch.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use nerc_rates::error::{DataError, DataResult};
use nerc_rates::loader::{
    DEFAULT_OUTAGES_FILE, DEFAULT_RATES_FILE, Document, load_from_file,
};
use nerc_rates::outages::OutageDataset;
use nerc_rates::rates::RateDataset;
use serde::Serialize;
use tracing::error;

/// Validate NERC outages or rates files.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Emit GitHub workflow annotations on failure.
    #[arg(short = 'g', long)]
    pub github: bool,

    /// Print a JSON report instead of plain text.
    #[arg(long)]
    pub json: bool,

    /// Type of file to validate.
    #[arg(short = 't', long = "type", value_enum)]
    pub target: Target,

    /// Path to the file to validate. Defaults to `--rates-file` or
    /// `--outages-file` depending on the type. Not used with `--type all`.
    #[arg(env = "NERC_DATA_FILE")]
    pub file: Option<PathBuf>,

    /// Rates file checked by `--type all`, and by `--type rates` when no
    /// FILE is given.
    #[arg(long, alias = "rates_file", env = "NERC_RATES_FILE", default_value = DEFAULT_RATES_FILE)]
    pub rates_file: PathBuf,

    /// Outages file checked by `--type all`, and by `--type outages` when
    /// no FILE is given.
    #[arg(long, alias = "outages_file", env = "NERC_OUTAGES_FILE", default_value = DEFAULT_OUTAGES_FILE)]
    pub outages_file: PathBuf,
}

/// What the `--type` flag selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Rates,
    Outages,
    /// The rates file, then the outages file.
    All,
}

/// The kind of document being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Rates,
    Outages,
}

impl DataKind {
    fn title(self) -> &'static str {
        match self {
            Self::Rates => "Rates",
            Self::Outages => "Outages",
        }
    }
}

/// Machine-readable outcome, printed with `--json`.
#[derive(Debug, Serialize)]
struct Report<'a> {
    #[serde(rename = "type")]
    target: Target,
    valid: bool,
    files: &'a [FileReport],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct FileReport {
    #[serde(rename = "type")]
    kind: DataKind,
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<usize>,
}

/// A file that failed validation.
struct Failure {
    kind: DataKind,
    file: PathBuf,
    error: DataError,
}

/// Runs the validation and maps the outcome to an exit code.
pub fn run(args: &Args) -> ExitCode {
    let files = match files_to_check(args) {
        Ok(files) => files,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    let mut checked = Vec::with_capacity(files.len());
    let mut failure = None;
    for (kind, file) in files {
        let outcome = validate(kind, &file);
        checked.push(FileReport {
            kind,
            file: file.display().to_string(),
            entries: outcome.as_ref().ok().copied(),
        });
        if let Err(error) = outcome {
            failure = Some(Failure { kind, file, error });
            break;
        }
    }

    if args.json {
        let message = failure.as_ref().map(|failure| failure.error.to_string());
        let report = Report {
            target: args.target,
            valid: failure.is_none(),
            files: &checked,
            error: message.as_deref(),
        };
        match serde_json::to_string(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => error!(error = %err, "failed to serialize report"),
        }
    }

    match failure {
        None => {
            if !args.json {
                println!("{}", success_line(args.target, &checked));
            }
            ExitCode::SUCCESS
        }
        Some(failure) => {
            if args.github {
                println!("{}", github_annotation(&failure));
            } else if !args.json {
                eprintln!("{}", failure_line(&failure));
            }
            ExitCode::FAILURE
        }
    }
}

/// Resolves the files to check, in order.
fn files_to_check(args: &Args) -> Result<Vec<(DataKind, PathBuf)>, &'static str> {
    let single = |fallback: &PathBuf| args.file.clone().unwrap_or_else(|| fallback.clone());
    match args.target {
        Target::Rates => Ok(vec![(DataKind::Rates, single(&args.rates_file))]),
        Target::Outages => Ok(vec![(DataKind::Outages, single(&args.outages_file))]),
        Target::All if args.file.is_some() => {
            Err("FILE cannot be used with --type all; use --rates-file and --outages-file")
        }
        Target::All => Ok(vec![
            (DataKind::Rates, args.rates_file.clone()),
            (DataKind::Outages, args.outages_file.clone()),
        ]),
    }
}

/// Loads the file as the given kind and returns its entry count.
pub fn validate(kind: DataKind, file: &Path) -> DataResult<usize> {
    match kind {
        DataKind::Rates => count_entries::<RateDataset>(file),
        DataKind::Outages => count_entries::<OutageDataset>(file),
    }
}

fn count_entries<D: Document>(file: &Path) -> DataResult<usize> {
    load_from_file::<D, _>(file).map(|dataset| dataset.entry_count())
}

fn success_line(target: Target, checked: &[FileReport]) -> String {
    let entries = |kind: DataKind| -> usize {
        checked
            .iter()
            .filter(|report| report.kind == kind)
            .filter_map(|report| report.entries)
            .sum()
    };
    match target {
        Target::Rates => format!("RATES VALIDATION OK [{} entries]", entries(DataKind::Rates)),
        Target::Outages => format!(
            "OUTAGES VALIDATION OK [{} entries]",
            entries(DataKind::Outages)
        ),
        Target::All => format!(
            "OK [{} rate entries, {} outage entries]",
            entries(DataKind::Rates),
            entries(DataKind::Outages)
        ),
    }
}

fn failure_line(failure: &Failure) -> String {
    let stage = match failure.error {
        DataError::YamlSyntax { .. } => "YAML parsing",
        _ => "validation",
    };
    format!("{} {stage} error: {}", failure.kind.title(), failure.error)
}

/// Formats a GitHub workflow `::error` annotation.
fn github_annotation(failure: &Failure) -> String {
    let (line, title) = match failure.error {
        DataError::YamlSyntax { line, .. } => (line, "parser error"),
        _ => (None, "validation error"),
    };
    let line = line.map(|n| format!(",line={n}")).unwrap_or_default();
    format!(
        "::error file={}{line},title={} {title}::{}",
        failure.file.display(),
        failure.kind.title(),
        escape_annotation(&failure.error.to_string())
    )
}

fn escape_annotation(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
