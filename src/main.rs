use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use upright::config::{self, ResizeOptions};
use upright::imaging::{RustBackend, inspect_image};
use upright::output::{self, InspectReport};
use upright::process;

#[derive(Parser)]
#[command(name = "upright")]
#[command(about = "Resize photos into a bounding box, applying EXIF orientation")]
#[command(long_about = "\
Resize photos into a bounding box, applying EXIF orientation

Camera JPEGs often store pixels sideways and record the intended rotation in
an EXIF orientation tag. upright reads that tag, scales each image so its
dominant edge fits the bounding box, and re-encodes it upright. Non-image
files are copied through unchanged.

Configuration (first match wins):
  Command-line flags  (--max-width, --max-height, --quality, --parallel)
  --config FILE       (or upright.toml in the working directory)
  Stock defaults      (4000x4000, quality 92, sequential)

Run 'upright gen-config' to generate a documented upright.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./upright.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Bounding box overrides shared by commands that plan resizes.
#[derive(clap::Args, Clone)]
struct BoundsArgs {
    /// Maximum width for landscape images
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum height for portrait and square images
    #[arg(long)]
    max_height: Option<u32>,
}

#[derive(clap::Args)]
struct ResizeArgs {
    /// Files or directories to resize
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Directory the resized files are written to
    #[arg(long, default_value = "resized")]
    out_dir: PathBuf,

    #[command(flatten)]
    bounds: BoundsArgs,

    /// Lossy encoding quality (1-100)
    #[arg(long)]
    quality: Option<u32>,

    /// Resize files in parallel (output order is kept)
    #[arg(long)]
    parallel: bool,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Files or directories to inspect
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    #[command(flatten)]
    bounds: BoundsArgs,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resize images into the bounding box and write them to --out-dir
    Resize(ResizeArgs),
    /// Show each image's orientation tag and planned canvas
    Inspect(InspectArgs),
    /// Print a stock upright.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Resize(args) => {
            let mut options = load_options(cli.config.as_deref())?;
            apply_bounds(&mut options, &args.bounds);
            if let Some(quality) = args.quality {
                options.quality = quality;
            }
            if args.parallel {
                options.processing.parallel = true;
            }
            options.validate()?;
            init_thread_pool(&options.processing);

            let files = process::load_entries(&args.paths)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                let (mut resized, mut skipped) = (0, 0);
                for event in rx {
                    match event {
                        process::ProcessEvent::Resized { .. } => resized += 1,
                        process::ProcessEvent::Skipped { .. } => skipped += 1,
                        process::ProcessEvent::Unavailable { .. } => {}
                    }
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
                (resized, skipped)
            });
            let result = process::process_files(files, &options.process_options(), Some(tx));
            let (resized, skipped) = printer.join().unwrap_or_default();
            let files = result?;

            let written = process::write_entries(&args.out_dir, &files)?;
            println!();
            println!("{}", output::format_resize_summary(resized, skipped));
            println!("Wrote {} files to {}", written.len(), args.out_dir.display());
        }
        Command::Inspect(args) => {
            let mut options = load_options(cli.config.as_deref())?;
            apply_bounds(&mut options, &args.bounds);
            options.validate()?;

            let backend = RustBackend::new();
            let bounds = options.bounds();
            let mut reports = Vec::new();
            for file in process::load_entries(&args.paths)? {
                if !file.is_image() {
                    log::info!("skipping {} ({})", file.name, file.mime_type);
                    continue;
                }
                let inspection = inspect_image(&backend, &file.bytes, bounds).map_err(|source| {
                    process::ProcessError::Imaging {
                        name: file.name.clone(),
                        source,
                    }
                })?;
                reports.push(InspectReport::new(file.name, &inspection));
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                output::print_inspect_output(&reports);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the env_logger backend.
///
/// Defaults to `warn`; each `-v` raises one level. `RUST_LOG` wins when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Load `--config` (which must exist), or `upright.toml` in the working
/// directory when present, or defaults.
fn load_options(path: Option<&Path>) -> Result<ResizeOptions, config::ConfigError> {
    match path {
        Some(path) => config::load_config_required(path),
        None => config::load_config(Path::new(config::CONFIG_FILE_NAME)),
    }
}

fn apply_bounds(options: &mut ResizeOptions, args: &BoundsArgs) {
    if let Some(max_width) = args.max_width {
        options.max_width = max_width;
    }
    if let Some(max_height) = args.max_height {
        options.max_height = max_height;
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
