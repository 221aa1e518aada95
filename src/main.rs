use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;

use sample_match::algorithm::cohort;
use sample_match::algorithm::matching::{
    Matcher, MatchingConfig, apply_matches, parse_condition_lines,
};
use sample_match::filter::parse_query_lines;
use sample_match::metadata::{load_metadata, save_metadata};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

/// Match case samples to unique controls in a tabular metadata file
#[derive(Parser)]
#[command(
    name = "sample-match",
    version,
    about = "One-to-one case-control sample matching on tabular study metadata"
)]
struct Cli {
    /// Metadata TSV file; the first column holds sample ids
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Output TSV file for the annotated metadata
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// File of inclusion predicates, one `column op value` per line
    #[arg(short, long, value_name = "FILE")]
    keep: Option<PathBuf>,

    /// File of predicates selecting case samples
    #[arg(long, value_name = "FILE", requires = "control")]
    case: Option<PathBuf>,

    /// File of predicates selecting control samples
    #[arg(long, value_name = "FILE", requires = "case")]
    control: Option<PathBuf>,

    /// File of cell values treated as missing, one per line
    #[arg(short, long, value_name = "FILE")]
    null_values: Option<PathBuf>,

    /// File of match conditions: `exact<TAB>column<TAB>=` or `range<TAB>column<TAB>tolerance`
    #[arg(short = 'm', long, value_name = "FILE")]
    match_file: Option<PathBuf>,

    /// Write a JSON summary of the matching run
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Evaluate compatibility on a single thread
    #[arg(long)]
    sequential: bool,

    /// Suppress progress bars
    #[arg(long)]
    no_progress: bool,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    let stage = Instant::now();
    let mut table = load_metadata(&cli.input)
        .with_context(|| format!("failed to load metadata from {}", cli.input.display()))?;
    info!("Time to load input files: {:.2?}", stage.elapsed());

    // Inclusion filtering
    if let Some(path) = &cli.keep {
        let stage = Instant::now();
        let keep = parse_query_lines(read_lines(path)?)?;
        table = cohort::apply_keep(&table, &keep)?;
        info!("Time to filter out unwanted samples: {:.2?}", stage.elapsed());
    }

    // Without case/control queries there is nothing to label or match
    let (Some(case_path), Some(control_path)) = (&cli.case, &cli.control) else {
        save_metadata(&cli.output, &table)?;
        info!(
            "No case/control queries given; wrote filtered metadata to {}",
            cli.output.display()
        );
        return Ok(());
    };

    let stage = Instant::now();
    let case = parse_query_lines(read_lines(case_path)?)?;
    let control = parse_query_lines(read_lines(control_path)?)?;
    let mut roles = cohort::label_roles(&table, &case, &control)?;
    info!(
        "Time to determine case and control samples: {:.2?}",
        stage.elapsed()
    );

    let Some(match_path) = &cli.match_file else {
        cohort::apply_roles(&mut table, &roles)?;
        save_metadata(&cli.output, &table)?;
        info!(
            "No match conditions given; wrote labeled metadata to {}",
            cli.output.display()
        );
        return Ok(());
    };

    let conditions_text = fs::read_to_string(match_path)
        .with_context(|| format!("failed to read {}", match_path.display()))?;
    let conditions = parse_condition_lines(&conditions_text)?;
    if conditions.is_empty() {
        bail!(
            "match condition file '{}' holds no conditions",
            match_path.display()
        );
    }

    // Null-value filtering on the match columns
    if let Some(path) = &cli.null_values {
        let stage = Instant::now();
        let null_values = read_lines(path)?;
        let columns: Vec<String> = conditions
            .iter()
            .map(|condition| condition.column.clone())
            .collect();
        (table, roles) = cohort::drop_missing(&table, &roles, &columns, &null_values)?;
        info!(
            "Time to drop samples with missing values: {:.2?}",
            stage.elapsed()
        );
    }

    let config = MatchingConfig::builder()
        .conditions(conditions)
        .use_parallel(!cli.sequential)
        .show_progress(!cli.no_progress)
        .build();
    let matcher = Matcher::new(config);
    let result = matcher.match_cohort(&table, &roles)?;

    cohort::apply_roles(&mut table, &roles)?;
    apply_matches(&mut table, &result)?;
    save_metadata(&cli.output, &table)?;

    if let Some(path) = &cli.report {
        fs::write(path, serde_json::to_string_pretty(&result)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote matching report to {}", path.display());
    }

    info!("Time to do everything: {:.2?}", total_start.elapsed());
    Ok(())
}

/// Read a file of lines, trimming whitespace and skipping blanks
fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}
