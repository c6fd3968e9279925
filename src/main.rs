//! stl_ascii - render an STL mesh as a spinning ASCII animation
//!
//! Usage:
//!   stl_ascii frames model.stl --width 80 --height 40
//!   stl_ascii gif model.stl -o model.gif
//!   stl_ascii play model.stl
//!   stl_ascii --config render.yaml check-config

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use stl_ascii::{AppConfig, Axis, Frame};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "stl_ascii")]
#[command(version)]
#[command(about = "Render an STL mesh as a rotating ASCII-art animation")]
struct Cli {
    /// Path to a YAML config file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the render section of the config
#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Grid width in characters
    #[arg(long)]
    width: Option<usize>,
    /// Grid height in characters
    #[arg(long)]
    height: Option<usize>,
    /// Frames per full rotation
    #[arg(long)]
    steps: Option<usize>,
    /// Axis to spin about
    #[arg(long)]
    axis: Option<Axis>,
    /// Draw mesh-space +y at the top row
    #[arg(long)]
    flip_vertical: bool,
    /// Render frames in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ASCII frames of one full rotation
    Frames {
        mesh: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write the rotation as an animated GIF
    Gif {
        mesh: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
        /// Pixels per character cell
        #[arg(long)]
        scale: Option<u32>,
    },

    /// Play the rotation in the terminal
    Play {
        mesh: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Validate and print the effective configuration
    CheckConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())
        .with_context(|| format!("loading configuration {:?}", cli.config))?;

    match cli.command {
        Commands::Frames { mesh, render, format } => {
            apply_render_args(&mut config, &render);
            config.validate()?;
            let frames = stl_ascii::render_ascii_frames_with_config(&mesh, &config.render)
                .with_context(|| format!("rendering {}", mesh.display()))?;
            print_frames(&frames, format)?;
        }
        Commands::Gif {
            mesh,
            output,
            render,
            scale,
        } => {
            apply_render_args(&mut config, &render);
            if let Some(scale) = scale {
                config.gif.scale = scale;
            }
            config.validate_gif()?;
            let bytes =
                stl_ascii::render_animated_image_with_config(&mesh, &config.render, &config.gif)
                    .with_context(|| format!("rendering {}", mesh.display()))?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(path = %output.display(), bytes = bytes.len(), "Wrote GIF");
        }
        Commands::Play { mesh, render } => {
            apply_render_args(&mut config, &render);
            config.validate()?;
            let frames = stl_ascii::render_ascii_frames_with_config(&mesh, &config.render)
                .with_context(|| format!("rendering {}", mesh.display()))?;
            let delay = Duration::from_millis(config.gif.delay_ms as u64);
            stl_ascii::terminal::play(&frames, delay).context("terminal playback")?;
        }
        Commands::CheckConfig => {
            check_config(&config);
        }
    }

    Ok(())
}

fn apply_render_args(config: &mut AppConfig, args: &RenderArgs) {
    let render = &mut config.render;
    if let Some(width) = args.width {
        render.width = width;
    }
    if let Some(height) = args.height {
        render.height = height;
    }
    if let Some(steps) = args.steps {
        render.steps = steps;
    }
    if let Some(axis) = args.axis {
        render.axis = axis;
    }
    render.flip_vertical |= args.flip_vertical;
    render.parallel |= args.parallel;
}

fn print_frames(frames: &[Frame], format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            for frame in frames {
                writeln!(out, "{}\n", frame)?;
            }
        }
        OutputFormat::Json => {
            let texts: Vec<String> = frames.iter().map(Frame::to_text).collect();
            serde_json::to_writer(&mut out, &texts)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn check_config(config: &AppConfig) {
    match config.validate() {
        Ok(()) => {
            println!("✓ Configuration is valid\n");
            println!("Render:");
            println!("  Grid: {}x{}", config.render.width, config.render.height);
            println!("  Steps: {}", config.render.steps);
            println!("  Axis: {:?}", config.render.axis);
            println!("  Ramp: {:?}", config.render.ramp);
            println!("  Flip vertical: {}", config.render.flip_vertical);
            println!("  Parallel: {}", config.render.parallel);
            println!("\nGIF:");
            println!(
                "  Size: {}x{} px",
                config.render.width as u64 * config.gif.scale as u64,
                config.render.height as u64 * config.gif.scale as u64
            );
            if let Err(e) = config.validate_gif() {
                println!("  Unavailable: {}", e);
            }
            println!("  Delay: {}ms", config.gif.delay_ms);
            println!("  Speed: {}", config.gif.speed);
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_frames() {
        let cli = Cli::try_parse_from([
            "stl_ascii", "frames", "model.stl", "--width", "40", "--axis", "x", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Frames { mesh, render, format } => {
                assert_eq!(mesh, PathBuf::from("model.stl"));
                assert_eq!(render.width, Some(40));
                assert_eq!(render.axis, Some(Axis::X));
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected frames command"),
        }
    }

    #[test]
    fn test_cli_gif_requires_output() {
        assert!(Cli::try_parse_from(["stl_ascii", "gif", "model.stl"]).is_err());
    }

    #[test]
    fn test_apply_render_args() {
        let mut config = AppConfig::default();
        let args = RenderArgs {
            width: Some(32),
            steps: Some(12),
            parallel: true,
            ..RenderArgs::default()
        };
        apply_render_args(&mut config, &args);
        assert_eq!(config.render.width, 32);
        assert_eq!(config.render.height, 60);
        assert_eq!(config.render.steps, 12);
        assert!(config.render.parallel);
        assert!(!config.render.flip_vertical);
    }
}
