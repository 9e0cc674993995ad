//! Background removal CLI tool
//!
//! Command-line interface that runs every input through the unified processor.

use super::config::CliConfigBuilder;
use crate::{
    config::OutputFormat,
    processor::BackgroundRemovalProcessor,
    services::{
        create_cli_progress_reporter, BatchProgress, ImageIOService, OutputFormatHandler,
        ProcessingStage,
    },
    tracing_config::{events, init_cli_tracing, spans},
    types::RemovalResult,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info as trace_info, Instrument};

/// File extensions picked up when scanning directories
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif"];

/// Model-free background removal CLI tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgremove-heuristic")]
pub struct Cli {
    /// Input image files or directories (use "-" for stdin)
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<String>,

    /// Output file (single input) or directory (batch processing). Use "-" for stdout.
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Output format [default: png, or the value from --config]
    #[arg(short, long, value_enum)]
    pub format: Option<CliOutputFormat>,

    /// JPEG quality (0-100) [default: 90, or the value from --config]
    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// Background color used to flatten JPEG output (#RRGGBB or #RGB)
    #[arg(long, value_name = "HEX")]
    pub background_color: Option<String>,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Pattern for batch processing (e.g., "*.jpg")
    #[arg(long)]
    pub pattern: Option<String>,

    /// Also save the background mask as a grayscale PNG (file for one input, directory for many)
    #[arg(long, value_name = "PATH|DIR")]
    pub mask: Option<String>,

    /// Load a JSON configuration file; command line flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log the estimated background color and threshold of each input
    #[arg(long)]
    pub print_estimate: bool,

    /// Show detailed per-stage and per-file progress
    #[arg(long)]
    pub progress: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Jpeg,
    Webp,
    Tiff,
    Rgba8,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Png => OutputFormat::Png,
            CliOutputFormat::Jpeg => OutputFormat::Jpeg,
            CliOutputFormat::Webp => OutputFormat::WebP,
            CliOutputFormat::Tiff => OutputFormat::Tiff,
            CliOutputFormat::Rgba8 => OutputFormat::Rgba8,
        }
    }
}

/// Main entry point for the CLI
pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The guard flushes file writers on drop, keep it for the whole run
    let _tracing_guard = init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    info!("Starting background removal CLI");
    info!("Input(s): {}", cli.input.join(", "));
    debug!(
        format = OutputFormatHandler::format_name(config.output_format),
        jpeg_quality = config.jpeg_quality,
        "Resolved configuration"
    );

    let mut processor = BackgroundRemovalProcessor::new(config)
        .context("Failed to create background removal processor")?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let session_span = spans::session(&session_id, cli.input.len());

    let start_time = Instant::now();
    let processed_count = process_inputs(&cli, &mut processor)
        .instrument(session_span)
        .await?;

    let total_time = start_time.elapsed();
    events::performance_metric("session", total_time.as_millis() as u64);
    info!(
        "Processed {} image(s) in {:.2}s",
        processed_count,
        total_time.as_secs_f64()
    );

    Ok(())
}

/// Resolve every input to image files and process them in order
async fn process_inputs(cli: &Cli, processor: &mut BackgroundRemovalProcessor) -> Result<usize> {
    if cli.input.len() == 1 && cli.input.first().is_some_and(|s| s == "-") {
        return process_stdin(cli, processor);
    }

    let mut all_files = collect_input_files(cli)?;
    if all_files.is_empty() {
        warn!("No supported image files found in the provided inputs");
        return Ok(0);
    }

    // Alphanumeric order keeps batch output deterministic
    all_files.sort();

    let file_count = all_files.len();
    info!("Found {} image file(s) to process", file_count);

    let progress_reporter = create_cli_progress_reporter(cli.progress, cli.verbose > 0, file_count);
    if cli.progress {
        processor.set_progress_reporter(Some(create_cli_progress_reporter(
            true,
            cli.verbose > 0,
            1,
        )));
    }

    let indicatif_progress = if !cli.progress && file_count > 1 {
        let pb = ProgressBar::new(file_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let output_dir = prepare_output_dir(cli.output.as_deref(), file_count)?;
    if file_count > 1 {
        if let Some(mask_dir) = cli.mask.as_deref() {
            ensure_directory(Path::new(mask_dir))?;
        }
    }

    let batch_span = spans::batch_processing(file_count);

    let mut processed_count = 0;
    let mut failed_count = 0;
    let batch_start_time = Instant::now();

    for input_file in &all_files {
        if let Some(ref pb) = indicatif_progress {
            pb.set_message(format!("Processing {}", input_file.display()));
        }

        if cli.progress && file_count > 1 {
            progress_reporter.report_batch_progress(&batch_update(
                input_file,
                processed_count,
                failed_count,
                file_count,
                batch_start_time,
            ));
        }

        let output_path = if file_count == 1 {
            cli.output.clone()
        } else {
            output_dir.as_ref().map(|dir| {
                generate_output_path_with_dir(input_file, dir, processor.config().output_format)
            })
        };

        let input_format = input_file
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("unknown");
        let file_span = batch_span.in_scope(|| spans::file_processing(input_file, input_format));

        match process_single_file(cli, processor, input_file, output_path.as_deref())
            .instrument(file_span)
            .await
        {
            Ok(()) => {
                processed_count += 1;
                debug!(file = %input_file.display(), "Processed");
            },
            Err(e) => {
                error!("❌ Failed to process {}: {:#}", input_file.display(), e);
                failed_count += 1;

                progress_reporter.report_error(
                    ProcessingStage::BatchItemProcessing,
                    &format!("Failed to process {}: {}", input_file.display(), e),
                );
            },
        }

        if let Some(ref pb) = indicatif_progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = indicatif_progress {
        pb.finish_with_message(format!(
            "Completed! Processed: {processed_count}, Failed: {failed_count}"
        ));
    }

    if failed_count > 0 {
        warn!("Some files failed to process. Processed: {processed_count}, Failed: {failed_count}");
    }

    if file_count > 1 {
        let batch_total_time = batch_start_time.elapsed();
        info!("📊 Batch processing summary:");
        info!("  ├─ Files processed: {}", processed_count);
        info!("  ├─ Files failed: {}", failed_count);
        info!("  ├─ Total time: {:.2}s", batch_total_time.as_secs_f64());
        info!(
            "  └─ Average per file: {:.2}s",
            if processed_count > 0 {
                batch_total_time.as_secs_f64() / (processed_count as f64)
            } else {
                0.0
            }
        );
    }

    Ok(processed_count)
}

/// Expand files and directories from the command line into image paths
fn collect_input_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    let mut all_files = Vec::new();

    for input in &cli.input {
        let path = PathBuf::from(input);

        if path.is_file() {
            if is_image_file(&path) {
                all_files.push(path);
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            all_files.extend(find_image_files(&path, cli.recursive, cli.pattern.as_deref())?);
        } else {
            anyhow::bail!(
                "Input path does not exist or is not accessible: {}",
                path.display()
            );
        }
    }

    Ok(all_files)
}

fn batch_update(
    input_file: &Path,
    processed_count: usize,
    failed_count: usize,
    file_count: usize,
    batch_start_time: Instant,
) -> BatchProgress {
    BatchProgress {
        current: input_file.to_path_buf(),
        completed: processed_count,
        failed: failed_count,
        total: file_count,
        elapsed_ms: batch_start_time.elapsed().as_millis() as u64,
    }
}

/// Validate the batch output target and create the directory on demand
fn prepare_output_dir(output: Option<&str>, file_count: usize) -> Result<Option<PathBuf>> {
    if file_count <= 1 {
        return Ok(None);
    }

    match output {
        Some("-") => {
            anyhow::bail!("Cannot use stdout (-) as output when processing multiple files")
        },
        Some(output) => {
            let output_path = PathBuf::from(output);
            ensure_directory(&output_path)?;
            Ok(Some(output_path))
        },
        None => Ok(None),
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create output directory: {}", path.display()))?;
    } else if path.is_file() {
        anyhow::bail!(
            "Output path exists and is a file, not a directory: {}",
            path.display()
        );
    }
    Ok(())
}

/// Process an encoded image read from stdin
fn process_stdin(cli: &Cli, processor: &mut BackgroundRemovalProcessor) -> Result<usize> {
    info!("Reading image from stdin");

    let image_data = read_stdin()?;
    let detected_format = ImageIOService::detect_format_name(&image_data);
    if detected_format == "unknown" {
        warn!("Could not detect image format from stdin data");
    } else {
        info!("Detected image format: {}", detected_format.to_uppercase());
    }

    let start_time = Instant::now();
    let result = processor.process_bytes(&image_data).with_context(|| {
        if detected_format == "unknown" {
            "Failed to remove background. The image format could not be detected from stdin data. Supported formats: PNG, JPEG, WebP, TIFF, BMP"
        } else {
            "Failed to remove background"
        }
    })?;
    info!(
        "Processed stdin image in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    report_estimate(cli, "stdin", &result);
    save_mask(cli.mask.as_deref(), Path::new("stdin"), false, &result)?;

    let config = processor.config();
    match cli.output.as_deref() {
        Some(target) if target != "-" => {
            let output_path = PathBuf::from(target);
            let format_name = OutputFormatHandler::format_name(config.output_format);
            let _span = spans::output_saving(target, format_name).entered();
            result
                .save(&output_path, config.output_format, config.jpeg_quality)
                .context("Failed to save result")?;
            info!("Image saved to: {}", output_path.display());
        },
        // Stdin input defaults to stdout output
        _ => {
            let output_data = result.to_bytes(config.output_format, config.jpeg_quality)?;
            write_stdout(&output_data)?;
            info!("Image written to stdout");
        },
    }

    Ok(1)
}

/// Process a single image file and write its outputs
async fn process_single_file(
    cli: &Cli,
    processor: &mut BackgroundRemovalProcessor,
    input_path: &Path,
    output_path: Option<&str>,
) -> Result<()> {
    let mut result = processor
        .process_file(input_path)
        .await
        .context("Failed to remove background")?;

    log_breakdown(input_path, &result);
    report_estimate(cli, &input_path.display().to_string(), &result);
    save_mask(cli.mask.as_deref(), input_path, cli.input_is_batch(), &result)?;

    let output_format = processor.config().output_format;
    let quality = processor.config().jpeg_quality;
    let format_name = OutputFormatHandler::format_name(output_format);

    match output_path {
        Some("-") => {
            let output_data = result.to_bytes(output_format, quality)?;
            write_stdout(&output_data)?;
            info!(
                "  └─ Total: {}ms ({:.2}s) - output to stdout",
                result.timings().total_ms,
                result.timings().total_ms as f64 / 1000.0
            );
            return Ok(());
        },
        Some(target) => {
            let _span = spans::output_saving(target, format_name).entered();
            result
                .save_timed(target, output_format, quality)
                .context("Failed to save result")?;
        },
        None => {
            let default_path = generate_output_path(input_path, output_format);
            let _span = spans::output_saving(&default_path.display().to_string(), format_name)
                .entered();
            result
                .save_timed(&default_path, output_format, quality)
                .context("Failed to save result")?;
        },
    }

    if let Some(encode_ms) = result.timings().image_encode_ms {
        let encode_breakdown = result.timings().breakdown_percentages();
        info!(
            "  ├─ Image Encode: {}ms ({:.1}%)",
            encode_ms, encode_breakdown.encode_pct
        );
    }
    info!(
        "  └─ Total: {}ms ({:.2}s)",
        result.timings().total_ms,
        result.timings().total_ms as f64 / 1000.0
    );

    Ok(())
}

impl Cli {
    /// Whether the inputs can resolve to more than one file
    fn input_is_batch(&self) -> bool {
        self.input.len() > 1 || self.input.iter().any(|input| Path::new(input).is_dir())
    }
}

fn log_breakdown(input_path: &Path, result: &RemovalResult) {
    let timings = result.timings();
    let breakdown = timings.breakdown_percentages();
    let stages = &timings.stages;

    info!("📊 Processing breakdown for {}:", input_path.display());
    info!(
        "  ├─ Image Decode: {}ms ({:.1}%)",
        timings.image_decode_ms, breakdown.decode_pct
    );
    info!(
        "  ├─ Segmentation: {}ms ({:.1}%)",
        stages.total_ms() - stages.compositing_ms,
        breakdown.segmentation_pct
    );
    debug!(
        sampling_ms = stages.sampling_ms,
        edge_mapping_ms = stages.edge_mapping_ms,
        classification_ms = stages.classification_ms,
        expansion_ms = stages.expansion_ms,
        cleanup_ms = stages.cleanup_ms,
        "Segmentation stages"
    );
    info!(
        "  ├─ Compositing: {}ms ({:.1}%)",
        stages.compositing_ms, breakdown.compositing_pct
    );
}

fn report_estimate(cli: &Cli, input: &str, result: &RemovalResult) {
    let estimate = &result.metadata.background;
    if cli.print_estimate {
        events::background_estimate(
            input,
            [estimate.r, estimate.g, estimate.b],
            estimate.threshold,
        );
    } else {
        trace_info!(
            input = %input,
            threshold = estimate.threshold,
            "Background estimate computed"
        );
    }
}

/// Save the binary mask when `--mask` was given
fn save_mask(
    mask_target: Option<&str>,
    input_path: &Path,
    batch: bool,
    result: &RemovalResult,
) -> Result<()> {
    let Some(target) = mask_target else {
        return Ok(());
    };

    let mask_path = mask_output_path(target, input_path, batch);
    if let Some(parent) = mask_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create mask directory: {}", parent.display()))?;
    }
    result
        .mask
        .save_png(&mask_path)
        .with_context(|| format!("Failed to save mask: {}", mask_path.display()))?;
    info!("Mask saved to: {}", mask_path.display());
    Ok(())
}

/// Resolve the mask destination: a directory gets `<stem>_mask.png`, otherwise the path is used as-is
fn mask_output_path(target: &str, input_path: &Path, batch: bool) -> PathBuf {
    let target = PathBuf::from(target);
    if batch || target.is_dir() {
        let stem = input_path.file_stem().unwrap_or_default();
        target.join(format!("{}_mask.png", stem.to_string_lossy()))
    } else {
        target
    }
}

/// Read image data from stdin
fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read image data from stdin")?;

    if buffer.is_empty() {
        anyhow::bail!("No data received from stdin");
    }

    Ok(buffer)
}

/// Write image data to stdout
fn write_stdout(data: &[u8]) -> Result<()> {
    io::stdout()
        .write_all(data)
        .context("Failed to write image data to stdout")?;
    io::stdout().flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Find image files in a directory
fn find_image_files(dir: &Path, recursive: bool, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if recursive {
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry?;
            if entry.file_type().is_file() {
                let path = entry.path();
                if is_image_file(path) && matches_pattern(path, pattern) {
                    files.push(path.to_path_buf());
                }
            }
        }
    } else {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let path = entry.path();
                if is_image_file(&path) && matches_pattern(&path, pattern) {
                    files.push(path);
                }
            }
        }
    }

    Ok(files)
}

/// Check if a file is an image based on its extension
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Check if a file name matches the glob pattern
fn matches_pattern(path: &Path, pattern: Option<&str>) -> bool {
    match pattern {
        Some(pat) => path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|filename| {
                glob::Pattern::new(pat)
                    .map(|p| p.matches(filename))
                    .unwrap_or(false)
            }),
        None => true,
    }
}

/// `<stem>_bg_removed.<ext>` next to the input
fn generate_output_path(input_path: &Path, format: OutputFormat) -> PathBuf {
    let dir = input_path.parent().unwrap_or(Path::new("."));
    dir.join(output_file_name(input_path, format))
}

/// `<stem>_bg_removed.<ext>` inside the batch output directory
fn generate_output_path_with_dir(input_path: &Path, output_dir: &Path, format: OutputFormat) -> String {
    output_dir
        .join(output_file_name(input_path, format))
        .to_string_lossy()
        .to_string()
}

fn output_file_name(input_path: &Path, format: OutputFormat) -> String {
    let stem = input_path.file_stem().unwrap_or_default();
    format!(
        "{}_bg_removed.{}",
        stem.to_string_lossy(),
        OutputFormatHandler::get_extension(format)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "bgremove-heuristic",
            "a.png",
            "b.jpg",
            "-o",
            "out",
            "-f",
            "jpeg",
            "--jpeg-quality",
            "75",
            "--background-color",
            "#000",
            "-vv",
            "-r",
            "--pattern",
            "*.png",
            "--mask",
            "masks",
            "--print-estimate",
            "--progress",
        ])
        .unwrap();

        assert_eq!(cli.input, vec!["a.png", "b.jpg"]);
        assert_eq!(cli.output.as_deref(), Some("out"));
        assert_eq!(cli.format, Some(CliOutputFormat::Jpeg));
        assert_eq!(cli.jpeg_quality, Some(75));
        assert_eq!(cli.background_color.as_deref(), Some("#000"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.recursive);
        assert_eq!(cli.pattern.as_deref(), Some("*.png"));
        assert_eq!(cli.mask.as_deref(), Some("masks"));
        assert!(cli.print_estimate);
        assert!(cli.progress);
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["bgremove-heuristic"]).is_err());
        assert!(Cli::try_parse_from(["bgremove-heuristic", "-f", "gif", "a.png"]).is_err());
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(OutputFormat::from(CliOutputFormat::Png), OutputFormat::Png);
        assert_eq!(OutputFormat::from(CliOutputFormat::Webp), OutputFormat::WebP);
        assert_eq!(OutputFormat::from(CliOutputFormat::Rgba8), OutputFormat::Rgba8);
    }

    #[test]
    fn test_generate_output_path() {
        let path = generate_output_path(Path::new("/photos/cat.jpeg"), OutputFormat::Png);
        assert_eq!(path, PathBuf::from("/photos/cat_bg_removed.png"));

        let path = generate_output_path(Path::new("dog.png"), OutputFormat::Jpeg);
        assert_eq!(path.file_name().unwrap(), "dog_bg_removed.jpg");
    }

    #[test]
    fn test_generate_output_path_with_dir() {
        let path = generate_output_path_with_dir(
            Path::new("/in/deep/bird.tif"),
            Path::new("/out"),
            OutputFormat::WebP,
        );
        assert_eq!(PathBuf::from(path), PathBuf::from("/out/bird_bg_removed.webp"));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.PNG")));
        assert!(is_image_file(Path::new("a.jpeg")));
        assert!(is_image_file(Path::new("dir/a.tif")));
        assert!(!is_image_file(Path::new("a.txt")));
        assert!(!is_image_file(Path::new("noext")));
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern(Path::new("dir/photo.jpg"), Some("*.jpg")));
        assert!(!matches_pattern(Path::new("dir/photo.png"), Some("*.jpg")));
        assert!(matches_pattern(Path::new("anything"), None));
        assert!(!matches_pattern(Path::new("photo.jpg"), Some("[")));
    }

    #[test]
    fn test_find_image_files_recursive() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("b.txt"), b"x").unwrap();
        fs::write(nested.join("c.jpg"), b"x").unwrap();

        let flat = find_image_files(dir.path(), false, None).unwrap();
        assert_eq!(flat.len(), 1);

        let mut deep = find_image_files(dir.path(), true, None).unwrap();
        deep.sort();
        assert_eq!(deep.len(), 2);

        let filtered = find_image_files(dir.path(), true, Some("*.jpg")).unwrap();
        assert_eq!(filtered, vec![nested.join("c.jpg")]);
    }

    #[test]
    fn test_prepare_output_dir() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("batch_out");
        let target_str = target.to_string_lossy().to_string();

        assert!(prepare_output_dir(Some(target_str.as_str()), 1).unwrap().is_none());
        assert_eq!(
            prepare_output_dir(Some(target_str.as_str()), 3).unwrap(),
            Some(target.clone())
        );
        assert!(target.is_dir());

        assert!(prepare_output_dir(Some("-"), 2).is_err());

        let file = dir.path().join("file.png");
        fs::write(&file, b"x").unwrap();
        let file_str = file.to_string_lossy().to_string();
        assert!(prepare_output_dir(Some(file_str.as_str()), 2).is_err());
    }

    #[test]
    fn test_mask_output_path() {
        let dir = tempdir().unwrap();
        let dir_str = dir.path().to_string_lossy().to_string();

        assert_eq!(
            mask_output_path(&dir_str, Path::new("x/cat.jpg"), false),
            dir.path().join("cat_mask.png")
        );
        assert_eq!(
            mask_output_path("masks", Path::new("cat.jpg"), true),
            PathBuf::from("masks/cat_mask.png")
        );
        assert_eq!(
            mask_output_path("single.png", Path::new("cat.jpg"), false),
            PathBuf::from("single.png")
        );
    }

    #[test]
    fn test_batch_update_snapshot() {
        let start = Instant::now();
        let update = batch_update(Path::new("a.png"), 1, 2, 4, start);
        assert_eq!(update.current, PathBuf::from("a.png"));
        assert_eq!(update.total, 4);
        assert_eq!(update.finished(), 3);
        assert_eq!(update.percentage(), 75);
    }
}
