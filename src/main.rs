//! chainviz - Entry Point

use chainviz::config::CliOverrides;
use chainviz::model::AppError;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// chainviz - live terminal view of a beacon chain diff stream
#[derive(Parser, Debug)]
#[command(name = "chainviz")]
#[command(version)]
#[command(about = "Terminal visualizer for beacon chain world-state diff streams")]
pub struct Args {
    /// Path to a recorded JSONL diff stream (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Hide validators and their vote edges on startup
    #[arg(long)]
    pub no_validators: bool,

    /// Horizontal distance between slots, in terminal cells
    #[arg(long, value_parser = parse_positive_width)]
    pub slot_width: Option<f64>,

    /// Event loop tick in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: Option<u64>,

    /// Replay the stream without a terminal and print a summary
    #[arg(long)]
    pub headless: bool,
}

impl Args {
    /// CLI values that override config file and environment.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            slot_width: self.slot_width,
            tick_ms: self.tick_ms,
            show_validators: self.no_validators.then_some(false),
        }
    }
}

fn parse_positive_width(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(width) if width.is_finite() && width > 0.0 => Ok(width),
        Ok(_) => Err("slot width must be a positive number".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = chainviz::config::load_config_with_precedence(args.config.clone())?;
        let merged = chainviz::config::merge_config(config_file);
        let with_env = chainviz::config::apply_env_overrides(merged);
        chainviz::config::apply_cli_overrides(with_env, args.overrides())
    };

    chainviz::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        headless = args.headless,
        "Configuration loaded and resolved"
    );

    let input_source = chainviz::source::detect_input_source(args.file.clone())?;

    if args.headless {
        let session = chainviz::integration::replay(input_source, &config)?;
        println!("{}", chainviz::integration::summarize(&session));
        return Ok(());
    }

    let colors = chainviz::view::ColorConfig::from_env_and_args(args.no_color);
    chainviz::view::run_with_source(input_source, &config, colors)?;

    Ok(())
}
