//! sheet-lens CLI - profile delimited tables

use clap::Parser;
use rayon::prelude::*;
use sheet_lens::{
    Analyzer, ColumnKind, DatePreference, LensError, SheetReport, Table, delimiter_for_path,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Descriptive statistics and data-quality signals for CSV/TSV files.
///
/// Profiles each column, reports missingness, duplicates, candidate keys,
/// outliers, correlations and value distributions.
#[derive(Parser, Debug)]
#[command(name = "sheet-lens")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Field delimiter (single character; default from the file extension)
    #[arg(short = 'd', long)]
    delimiter: Option<char>,

    /// Number of histogram bins
    #[arg(short = 'b', long, default_value = "20")]
    bins: usize,

    /// Number of top categories per text column
    #[arg(short = 't', long, default_value = "10")]
    top: usize,

    /// Z-score above which a value counts as an outlier
    #[arg(short = 'z', long, default_value = "3.0")]
    z_threshold: f64,

    /// Use day-month-year date format preference (default: month-day-year)
    #[arg(long)]
    dmy: bool,

    /// Output format: text (default) or json
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut analyzer = Analyzer::new();
    analyzer
        .bin_count(args.bins)
        .top_n(args.top)
        .z_threshold(args.z_threshold);
    if args.dmy {
        analyzer.date_preference(DatePreference::DmyFormat);
    }
    if let Err(e) = analyzer.validate() {
        error!("{e}");
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    // Analyze in parallel, print in input order.
    let results: Vec<_> = args
        .files
        .par_iter()
        .map(|file| analyze_file(file, &args, &analyzer))
        .collect();

    let mut exit_code = ExitCode::SUCCESS;
    for (file, result) in args.files.iter().zip(results) {
        match result {
            Ok(report) => match args.format {
                OutputFormat::Text => print_text_output(&report),
                OutputFormat::Json => {
                    if let Err(e) = print_json_output(&report) {
                        eprintln!("Error writing {}: {}", file.display(), e);
                        exit_code = ExitCode::FAILURE;
                    }
                }
            },
            Err(e) => {
                eprintln!("Error processing {}: {}", file.display(), e);
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    exit_code
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze_file(
    path: &Path,
    args: &Args,
    analyzer: &Analyzer,
) -> sheet_lens::Result<SheetReport> {
    let delimiter = match args.delimiter {
        Some(c) if c.is_ascii() => c as u8,
        Some(c) => {
            return Err(LensError::InvalidConfig(format!(
                "delimiter must be ASCII, got {c:?}"
            )));
        }
        None => delimiter_for_path(path),
    };
    debug!(file = %path.display(), delimiter = %(delimiter as char), "loading");

    let table = Table::from_path_with_delimiter(path, delimiter)?;
    analyzer.analyze_named(&path.display().to_string(), &table)
}

/// Format a float, showing sentinels as an em dash.
fn fmt_num(x: f64) -> String {
    if x.is_finite() {
        let s = format!("{x:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        "—".to_string()
    }
}

fn fmt_pct(x: f64) -> String {
    format!("{:.1}%", 100.0 * x)
}

fn print_text_output(report: &SheetReport) {
    let o = &report.overview;
    println!("File: {}", report.name.as_deref().unwrap_or("-"));
    println!("  Rows: {}", o.row_count);
    println!("  Columns: {}", o.column_count);
    println!(
        "  Non-null: {}",
        o.non_null_rate.map_or_else(|| "—".to_string(), fmt_pct)
    );
    println!(
        "  Uniformity: {} (avg row length {:.1}, σ {:.1})",
        fmt_pct(report.quality.uniformity),
        report.quality.avg_row_len,
        report.quality.stdev_row_len
    );
    println!("  Missing: {}", fmt_pct(report.missingness.overall));
    println!(
        "  Duplicate rows: {} of {}",
        report.duplicates.dup_row_count, report.duplicates.total
    );
    let keys: Vec<&str> = report
        .duplicates
        .candidates
        .iter()
        .map(|k| k.name.as_str())
        .collect();
    println!(
        "  Candidate keys: {}",
        if keys.is_empty() { "none".to_string() } else { keys.join(", ") }
    );

    println!("  Columns:");
    for (p, out) in report.profiles.iter().zip(&report.outliers) {
        print!(
            "    {} [{}] non-null {}, empty {}, uniques {}",
            p.name,
            p.kind,
            p.non_null_count,
            fmt_pct(p.empty_rate),
            p.unique_count
        );
        if let Some(s) = &p.stats {
            print!(
                ", mean {}, std {}, min {}, median {}, max {}",
                fmt_num(s.mean),
                fmt_num(s.std),
                fmt_num(s.min),
                fmt_num(s.p50),
                fmt_num(s.max)
            );
        }
        if p.kind == ColumnKind::Number && out.numeric {
            print!(", outliers IQR {} / Z {}", out.count_iqr, out.count_z);
        }
        println!();
    }

    if !report.outlier_samples.is_empty() {
        println!("  Outlier examples:");
        for s in &report.outlier_samples {
            // +1 for the header row, +1 for 1-based numbering
            println!("    row {} {}: {}", s.row_index + 2, s.column, fmt_num(s.value));
        }
    }

    let corr = &report.correlation;
    if corr.len() > 1 {
        println!("  Correlation:");
        for (i, a) in corr.names.iter().enumerate() {
            for (j, b) in corr.names.iter().enumerate().skip(i + 1) {
                println!("    {a} ~ {b}: {}", fmt_num(corr.matrix[i][j]));
            }
        }
    }

    for c in &report.categories {
        let items: Vec<String> = c
            .top
            .items
            .iter()
            .map(|it| format!("{} ({})", it.value, it.count))
            .collect();
        println!(
            "  Top {} (showing {} of {}): {}",
            c.name,
            items.len(),
            c.top.unique_count,
            items.join(", ")
        );
    }

    println!();
}

fn print_json_output(report: &SheetReport) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string(report)?);
    Ok(())
}
