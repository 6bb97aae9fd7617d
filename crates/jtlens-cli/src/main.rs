use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use jtlens_core::config::read_config;
use jtlens_core::ingest::{read_jtl, IngestOptions};
use jtlens_core::results::export::{export_csv, export_json, export_text};
use jtlens_core::{analyze, AnalysisConfig, JtlensError};
use regex::Regex;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "jtlens")]
#[command(about = "Summarise a JMeter CSV result log (.jtl)")]
struct Args {
    /// Result log to analyse.
    file: PathBuf,

    /// JSON file with analysis settings; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the report here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Only analyse requests whose label matches this regex.
    #[arg(long)]
    label: Option<String>,

    /// CSV field delimiter.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Target maximum number of points per time series.
    #[arg(long)]
    max_points: Option<usize>,

    /// Accept records whose connect/latency/elapsed timings are inconsistent.
    #[arg(long)]
    lenient: bool,

    /// Leave distribution ranges without any request out of the report.
    #[arg(long)]
    hide_empty_buckets: bool,
}

impl Args {
    /// Apply command-line overrides on top of `base`.
    fn analysis_config(&self, base: AnalysisConfig) -> Result<AnalysisConfig, JtlensError> {
        let mut config = base;
        if let Some(max_points) = self.max_points {
            config.max_data_points = max_points;
        }
        if self.lenient {
            config.strict_timings = false;
        }
        if self.hide_empty_buckets {
            config.include_empty_buckets = false;
        }
        config.validate()?;
        Ok(config)
    }

    fn ingest_options(&self) -> Result<IngestOptions, JtlensError> {
        if !self.delimiter.is_ascii() {
            return Err(JtlensError::Validation(format!(
                "delimiter must be a single ASCII character (got '{}')",
                self.delimiter
            )));
        }
        let label_filter = self.label.as_deref().map(Regex::new).transpose()?;
        Ok(IngestOptions {
            delimiter: self.delimiter as u8,
            label_filter,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the report, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => read_config(path).await?,
        None => AnalysisConfig::default(),
    };
    let config = args.analysis_config(base)?;
    let options = args.ingest_options()?;

    let records = read_jtl(&args.file, &options).await?;
    info!(file = %args.file.display(), records = records.len(), "loaded result log");

    let report = tokio::task::spawn_blocking(move || analyze(&records, &config)).await??;

    let rendered = match args.format {
        OutputFormat::Text => export_text(&report),
        OutputFormat::Json => export_json(&report)?,
        OutputFormat::Csv => export_csv(&report),
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, rendered).await?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn defaults() {
        let args = parse(&["jtlens", "results.jtl"]);
        assert_eq!(args.file, PathBuf::from("results.jtl"));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.delimiter, ',');
        assert!(!args.lenient);

        let config = args
            .analysis_config(AnalysisConfig::default())
            .expect("config should be valid");
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn flags_override_base_config() {
        let args = parse(&[
            "jtlens",
            "r.jtl",
            "--max-points",
            "50",
            "--lenient",
            "--hide-empty-buckets",
            "--format",
            "json",
        ]);
        let base = AnalysisConfig {
            outlier_sigma: 3.0,
            ..AnalysisConfig::default()
        };
        let config = args.analysis_config(base).expect("config should be valid");
        assert_eq!(config.max_data_points, 50);
        assert!(!config.strict_timings);
        assert!(!config.include_empty_buckets);
        assert_eq!(config.outlier_sigma, 3.0);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn zero_max_points_is_rejected() {
        let args = parse(&["jtlens", "r.jtl", "--max-points", "0"]);
        assert!(args.analysis_config(AnalysisConfig::default()).is_err());
    }

    #[test]
    fn ingest_options_from_flags() {
        let args = parse(&["jtlens", "r.jtl", "--delimiter", ";", "--label", "^api/"]);
        let options = args.ingest_options().expect("options should be valid");
        assert_eq!(options.delimiter, b';');
        let filter = options.label_filter.expect("filter should be set");
        assert!(filter.is_match("api/users"));
        assert!(!filter.is_match("static/app.js"));
    }

    #[test]
    fn bad_label_regex_is_reported() {
        let args = parse(&["jtlens", "r.jtl", "--label", "(unclosed"]);
        assert!(matches!(args.ingest_options(), Err(JtlensError::Regex(_))));
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let args = parse(&["jtlens", "r.jtl", "--delimiter", "§"]);
        assert!(matches!(args.ingest_options(), Err(JtlensError::Validation(_))));
    }

    #[test]
    fn missing_file_argument_fails() {
        assert!(Args::try_parse_from(["jtlens"]).is_err());
    }
}
