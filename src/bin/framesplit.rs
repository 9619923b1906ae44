use std::{error::Error, io, path::PathBuf, process, sync::Arc};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use framesplit::{
    BatchReport, Coordinator, ExtractOptions, FfmpegCodec, FfmpegLogLevel,
    OutputFormat, ProgressCallback, ProgressInfo, TargetFrameRate, discover_videos,
    host_parallelism,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framesplit --input clips/ --output-dir frames --fps 2 --threaded\n  framesplit --input talk.mp4 --ext png --overwrite --progress\n  framesplit --completions zsh > _framesplit";

#[derive(Debug, Parser)]
#[command(
    name = "framesplit",
    version,
    about = "Extract numbered still frames from videos",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video, or a directory of videos.
    #[arg(long, value_name = "PATH", default_value = "./samples")]
    input: PathBuf,

    /// Output directory; each video gets a subdirectory named after its file.
    #[arg(long, value_name = "DIR", default_value = "./output")]
    output_dir: PathBuf,

    /// Frames per second to keep (-1 for all frames).
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    fps: i64,

    /// Split each video into chunks and extract them in parallel.
    #[arg(long)]
    threaded: bool,

    /// Rewrite frames that already exist instead of skipping them.
    #[arg(long)]
    overwrite: bool,

    /// Frames per chunk in threaded mode.
    #[arg(long, default_value_t = 1000)]
    chunk_size: u64,

    /// Worker threads in threaded mode (defaults to one per CPU).
    #[arg(long)]
    workers: Option<usize>,

    /// Output image extension (jpg, png, bmp, tiff).
    #[arg(long, default_value = "jpg")]
    ext: String,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Show debug logging.
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors.
    #[arg(long)]
    quiet: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long)]
    log_level: Option<String>,

    /// Print the batch summary as JSON.
    #[arg(long)]
    json: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    fn level_filter(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    fn extract_options(&self) -> Result<ExtractOptions, Box<dyn Error>> {
        let output_format: OutputFormat = self.ext.parse()?;
        Ok(ExtractOptions::new()
            .with_target_fps(TargetFrameRate::from_cli(self.fps)?)
            .with_parallel(self.threaded)
            .with_overwrite(self.overwrite)
            .with_chunk_size(self.chunk_size)
            .with_max_workers(self.workers.unwrap_or_else(host_parallelism))
            .with_output_format(output_format))
    }
}

/// Stderr logger. While `bar` is drawn, lines are printed through it so
/// they do not tear the bar.
fn log_dispatch(level: LevelFilter, bar: Option<ProgressBar>) -> fern::Dispatch {
    let output = match bar {
        Some(bar) => fern::Output::call(move |record| {
            bar.suspend(|| eprintln!("{}", record.args()));
        }),
        None => io::stderr().into(),
    };

    fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            let tag = match record.level() {
                Level::Error => "error".red().bold(),
                Level::Warn => "warn".yellow().bold(),
                Level::Info => "info".green(),
                Level::Debug => "debug".cyan(),
                Level::Trace => "trace".dimmed(),
            };
            out.finish(format_args!("{tag} {message}"))
        })
        .chain(output)
}

fn init_logger(level: LevelFilter, bar: Option<ProgressBar>) -> Result<(), Box<dyn Error>> {
    log_dispatch(level, bar).apply()?;
    Ok(())
}

/// Renders chunk completion of the current video on a progress bar.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let name = info
            .video
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_length(info.chunks_total);
        self.bar.set_position(info.chunks_completed);
        self.bar
            .set_message(format!("{name} ({} frames)", info.frames_saved));
    }
}

fn print_report(report: &BatchReport, as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        let payload = json!({
            "frames_saved": report.frames_saved(),
            "cancelled": report.cancelled,
            "videos": report.outputs.iter().map(|output| json!({
                "video": output.video.display().to_string(),
                "directory": output.directory.display().to_string(),
                "total_frames": output.total_frames,
                "native_fps": output.native_fps,
                "stride": output.stride,
                "chunks": output.chunks,
                "frames_saved": output.frames_saved,
            })).collect::<Vec<_>>(),
            "failures": report.failures.iter().map(|(video, error)| json!({
                "video": video.display().to_string(),
                "error": error.to_string(),
                "range": error.failed_range().map(|range| json!([range.start, range.end])),
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for output in &report.outputs {
        println!(
            "{} {} -> {} ({} frame(s), stride {})",
            "done".green().bold(),
            output.video.display(),
            output.directory.display(),
            output.frames_saved,
            output.stride
        );
    }

    if report.is_success() {
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "Extracted {} frame(s) from {} video(s)",
                report.frames_saved(),
                report.outputs.len()
            )
            .green()
        );
        return Ok(());
    }

    if !report.failures.is_empty() {
        eprintln!(
            "{} {} of {} video(s) failed:",
            "failed:".red().bold(),
            report.failures.len(),
            report.failures.len() + report.outputs.len()
        );
        for (video, error) in &report.failures {
            eprintln!("  {} {error}", format!("{}:", video.display()).red());
        }
    }
    if report.cancelled {
        eprintln!("{} batch was cancelled", "warning:".yellow().bold());
    }

    Ok(())
}

fn run() -> Result<bool, Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "framesplit", &mut io::stdout());
        return Ok(true);
    }

    let terminal_progress = if cli.progress {
        Some(Arc::new(TerminalProgress::new()?))
    } else {
        None
    };
    init_logger(
        cli.level_filter(),
        terminal_progress.as_ref().map(|progress| progress.bar.clone()),
    )?;

    if let Some(level) = &cli.log_level {
        framesplit::set_ffmpeg_log_level(level.parse::<FfmpegLogLevel>()?);
    }

    let mut options = cli.extract_options()?;
    if let Some(progress) = &terminal_progress {
        options = options.with_progress(progress.clone());
    }

    let videos = discover_videos(&cli.input)?;
    if videos.is_empty() {
        log::warn!("No videos found in {}", cli.input.display());
    }

    let coordinator = Coordinator::new(FfmpegCodec::new(), options)?;
    let report = coordinator.process_batch(&videos, &cli.output_dir);

    if let Some(progress) = terminal_progress {
        progress.bar.finish_with_message("done");
    }

    print_report(&report, cli.json)?;
    Ok(report.is_success())
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            process::exit(1);
        }
    }
}
