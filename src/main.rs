use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dir2cast::metadata::DEFAULT_FFPROBE;
use dir2cast::{
    FailurePolicy, GenerateOptions, GenerateResult, NoopReporter, ProgressEvent,
    ProgressReporter, SharedProgressReporter, SystemMetadataSource, format_duration,
    generate_feed,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Turn a directory of audio files into a podcast RSS feed
#[derive(Parser, Debug)]
#[command(name = "dir2cast")]
#[command(about = "Turn a directory of audio files into a podcast RSS feed")]
#[command(version)]
struct Args {
    /// Directory containing the audio files
    directory: PathBuf,

    /// Public URL the directory's parent is hosted under
    #[arg(long)]
    base_url: String,

    /// ffprobe binary used to determine durations
    #[arg(long, env = "DIR2CAST_FFPROBE", default_value = DEFAULT_FFPROBE)]
    ffprobe: PathBuf,

    /// Leave out files whose metadata cannot be read instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { bar }
    }

    /// Remove the spinner or bar from the terminal
    fn clear(&self) {
        self.bar.finish_and_clear();
    }

    fn switch_to_bar(&self, total: usize) {
        let style = ProgressStyle::default_bar()
            .template(&format!(
                "  {HEADPHONES}[{{bar:30.cyan/blue}}] {{pos}}/{{len}} {{wide_msg}}"
            ))
            .unwrap()
            .progress_chars("█▓░");

        self.bar.set_style(style);
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::ScanStarted { directory } => {
                self.bar.set_message(format!(
                    "{SEARCH}Scanning {}",
                    directory.display().to_string().cyan()
                ));
            }

            ProgressEvent::DirectoryScanned {
                audio_files,
                cover_art,
            } => {
                let cover = match cover_art {
                    Some(name) => format!("cover art {}", name.cyan()),
                    None => "no cover art".dimmed().to_string(),
                };
                self.bar.println(format!(
                    "{HEADPHONES}{} audio files, {}",
                    audio_files.to_string().cyan(),
                    cover
                ));
                self.switch_to_bar(audio_files);
            }

            ProgressEvent::EpisodeStarting { filename, .. } => {
                self.bar.set_message(truncate_title(&filename, 40));
            }

            ProgressEvent::EpisodeProcessed {
                episode_number,
                title,
                duration,
            } => {
                self.bar.inc(1);
                self.bar.println(format!(
                    "  {SUCCESS}{:>3} {} {}",
                    episode_number.to_string().cyan(),
                    truncate_title(&title, 50).green(),
                    format_duration(duration).dimmed()
                ));
            }

            ProgressEvent::EpisodeSkipped { filename, error } => {
                self.bar.inc(1);
                self.bar.println(format!(
                    "  {FAILURE}{} - {}",
                    truncate_title(&filename, 40).red(),
                    error.red()
                ));
            }

            ProgressEvent::FeedWritten { .. } => {
                self.bar.finish_and_clear();
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let truncated: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "dir2cast=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(args: &Args, reporter: SharedProgressReporter) -> Result<GenerateResult> {
    let source = SystemMetadataSource::with_ffprobe(&args.ffprobe);

    let options = GenerateOptions {
        failure_policy: if args.skip_invalid {
            FailurePolicy::SkipInvalid
        } else {
            FailurePolicy::FailFast
        },
        ..GenerateOptions::new(args.base_url.clone())
    };

    let result = generate_feed(&source, &args.directory, &options, reporter)?;
    Ok(result)
}

fn main() -> ExitCode {
    // clap exits with 2 on usage errors; every failure of this tool exits with 1
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.verbose);

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "dir2cast".bold().magenta(),
            "- Directory to Podcast".dimmed()
        );
    }

    let progress = (!args.quiet).then(|| Arc::new(IndicatifReporter::new()));
    let reporter: SharedProgressReporter = match &progress {
        Some(progress) => progress.clone() as SharedProgressReporter,
        None => NoopReporter::shared(),
    };

    match run(&args, reporter) {
        Ok(result) => {
            if !result.skipped_files.is_empty() {
                println!("\n{}", "Skipped files:".red().bold());
                for (filename, error) in &result.skipped_files {
                    println!("  {}{} - {}", CROSS, filename.yellow(), error.dimmed());
                }
                println!();
            }

            println!(
                "{PARTY}Generated RSS feed: {}",
                result.feed_path.display().to_string().cyan()
            );
            println!("Found {} episodes", result.episode_count.to_string().green());
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(progress) = &progress {
                progress.clear();
            }
            eprintln!("{FAILURE}{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
