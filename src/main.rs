// driftmap - terminal map player for refugee movement simulations
// Plays back pre-computed simulation output on a world map

mod app;
mod data;
mod render;
mod scaling;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::{event::handle_key_event, AppState, PlaybackConfig};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use render::{HeatmapView, ThresholdMode};
use scaling::{is_valid_deviation, ScalingKind, DEFAULT_MIDPOINT_DEVIATION};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play back refugee simulation output on a terminal map", long_about = None)]
struct Cli {
    /// Directory of simulation JSON files, or a single simulation file
    #[arg(default_value = "data")]
    data: PathBuf,

    /// Simulation to load first (file name from the listing)
    #[arg(long, short)]
    simulation: Option<String>,

    /// Scaling method for magnitudes
    #[arg(long, value_enum, default_value_t = ScalingKind::Log)]
    scaling: ScalingKind,

    /// Population the color thresholds are computed over
    #[arg(long, value_enum, default_value_t = ThresholdMode::Global)]
    thresholds: ThresholdMode,

    /// Show the heatmap layer from the start
    #[arg(long, value_enum)]
    heatmap: Option<HeatmapView>,

    /// Playback speed multiplier (0.25 - 8)
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Radius in pixels of the largest location circle
    #[arg(long, default_value_t = app::config::DEFAULT_MAX_RADIUS_PX)]
    max_radius: f64,

    /// Divisor for the logistic growth midpoint fit (must be > 0)
    #[arg(long, default_value_t = DEFAULT_MIDPOINT_DEVIATION, value_parser = parse_deviation)]
    midpoint_deviation: f64,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_deviation(value: &str) -> Result<f64, String> {
    let deviation: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if is_valid_deviation(deviation) {
        Ok(deviation)
    } else {
        Err(format!("midpoint deviation must be a positive number, got {}", value))
    }
}

impl Cli {
    fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            scaling: self.scaling,
            threshold_mode: self.thresholds,
            speed: self.speed,
            max_radius_px: self.max_radius,
            mid_point_deviation: self.midpoint_deviation,
            ..Default::default()
        }
    }
}

/// Install the file logger; the terminal itself belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    // Open the data before touching the terminal so errors print normally
    let mut app = AppState::open(&cli.data, cli.playback_config())
        .with_context(|| format!("cannot open simulation data at {}", cli.data.display()))?;
    app.layers.heatmap = cli.heatmap;

    let loaded = match &cli.simulation {
        Some(name) => app.load_simulation_named(name),
        None => app.load_simulation(0),
    };
    info!(loaded, simulations = app.simulations.len(), "Startup complete");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()> {
    let poll_interval = app.config.ui_interval();
    loop {
        app.on_tick(Instant::now());
        terminal.draw(|f| ui::draw(f, app))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(app, key.code);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_deviation_must_be_positive() {
        assert_eq!(parse_deviation("6"), Ok(6.0));
        assert!(parse_deviation("0").is_err());
        assert!(parse_deviation("-2").is_err());
        assert!(parse_deviation("inf").is_err());
        assert!(parse_deviation("twelve").is_err());
    }

    #[test]
    fn test_cli_rejects_zero_deviation() {
        assert!(Cli::try_parse_from(["driftmap", "--midpoint-deviation", "0"]).is_err());
        let cli = Cli::try_parse_from(["driftmap", "--midpoint-deviation", "4"]).unwrap();
        assert_eq!(cli.playback_config().mid_point_deviation, 4.0);
    }
}
