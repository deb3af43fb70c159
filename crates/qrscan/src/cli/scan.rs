//! The `qrscan scan` command: run the scan pipeline over files on disk.

use clap::{Args, ValueEnum};
use qrscan_core::{
    Config, FileDiscovery, OutputFormat as CoreOutputFormat, OutputWriter, ScanOutcome,
    ScanProcessor,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image file or directory to scan
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to `output.format`)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Execute the scan command.
pub async fn execute(args: ScanArgs, config: &Config) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    let files = FileDiscovery::new(config.scan.clone()).discover(&args.input);
    if files.is_empty() {
        tracing::warn!(
            "No images with a supported extension found in {:?}",
            args.input
        );
    }

    let format = resolve_format(args.format, config);
    let pretty = args.pretty || config.output.pretty;
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer: OutputWriter<_, ScanOutcome> = OutputWriter::new(sink, format, pretty);

    let processor = ScanProcessor::new(config);
    let progress = create_progress_bar(files.len() as u64);
    let start_time = Instant::now();
    let mut failed: u64 = 0;
    let mut symbols_found: usize = 0;

    for path in &files {
        match processor.scan_file(path).await {
            Ok(outcome) => {
                symbols_found += outcome.symbols.len();
                writer.push(outcome)?;
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Failed: {:?} - {}", path, e);
            }
        }
        progress.inc(1);
    }

    let written = writer.finish()?;
    progress.finish_and_clear();

    tracing::info!(
        "Scanned {} image(s) in {:.1}s: {} symbol(s) found, {} failed",
        written,
        start_time.elapsed().as_secs_f64(),
        symbols_found,
        failed
    );
    if let Some(output_path) = &args.output {
        tracing::info!("Output written to {:?}", output_path);
    }

    if !files.is_empty() && written == 0 {
        anyhow::bail!("None of the {} image(s) could be scanned", files.len());
    }
    Ok(())
}

/// CLI flag first, then `output.format`, then JSON.
fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> CoreOutputFormat {
    flag.map(CoreOutputFormat::from)
        .or_else(|| CoreOutputFormat::parse(&config.output.format))
        .unwrap_or(CoreOutputFormat::Json)
}

/// Progress bar on stderr; hidden for single-file scans.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    if total <= 1 {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb
}
