mod app;
mod clock;
mod config;
mod error;
mod input;
mod navigation;
mod planning;
mod render;
mod session;
mod signal;
mod terrain;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{run_headless, App};
use clock::FRAME_DURATION;
use config::SimConfig;
use error::{NavError, Result};
use session::SimulationSession;
use signal::{
    DetectionResult, FrameDirectory, LinearPredictor, Predictor, SignalSource, StaticSignal,
    StrobePattern, SEQUENCE_LEN,
};
use terrain::TerrainGrid;

/// Side length in pixels of generated strobe frames
const FRAME_SIZE: u32 = 32;

/// DroneNav: grid drone navigation with SOS strobe detection
///
/// A drone plans an A* route across random terrain, flies it one cell per
/// step, and classifies the strobe it finds at the goal.
#[derive(Parser, Debug)]
#[command(name = "dronenav")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long, value_name = "N")]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long, value_name = "N")]
    height: Option<usize>,

    /// Obstacle probability per cell
    #[arg(long, value_name = "P")]
    obstacles: Option<f64>,

    /// RNG seed for terrain and goal placement
    #[arg(long, value_name = "S")]
    seed: Option<u64>,

    /// Grayscale map image to fly over instead of random terrain
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// Fixed goal cell
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    goal: Option<Vec<usize>>,

    /// Milliseconds between drone steps
    #[arg(long, value_name = "MS")]
    move_delay_ms: Option<u64>,

    /// Predictor artifact (JSON)
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Decision threshold overriding the one stored in the model
    #[arg(long, value_name = "T")]
    threshold: Option<f32>,

    /// Directory of strobe frames
    #[arg(long, value_name = "DIR")]
    frames: Option<PathBuf>,

    /// Feed the detector the canonical SOS strobe instead of frames on disk
    #[arg(long)]
    simulate_strobe: bool,

    /// Classify the frames in DIR, print the JSON result and exit
    #[arg(long, value_name = "DIR")]
    classify: Option<PathBuf>,

    /// Run without the terminal view and print a JSON mission report
    #[arg(long)]
    headless: bool,

    /// Write the headless report here instead of stdout
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Log file for the terminal view
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Write the canonical SOS strobe frames and exit
    #[arg(long, value_name = "DIR")]
    write_frames: Option<PathBuf>,

    /// Write the matched-filter predictor artifact and exit
    #[arg(long, value_name = "FILE")]
    write_model: Option<PathBuf>,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(p) = self.obstacles {
            config.grid.obstacle_probability = p;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(map) = &self.map {
            config.grid.map = Some(map.clone());
        }
        if let Some(goal) = &self.goal {
            config.goal = Some([goal[0], goal[1]]);
        }
        if let Some(ms) = self.move_delay_ms {
            config.navigation.move_delay_ms = ms;
        }
        if let Some(model) = &self.model {
            config.signal.model_path = model.clone();
        }
        if let Some(frames) = &self.frames {
            config.signal.frames_dir = frames.clone();
        }
        if let Some(threshold) = self.threshold {
            config.signal.threshold = Some(threshold);
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dronenav=info"))
}

/// Headless runs log to stderr; the terminal view logs to a file or not at all
fn init_logging(cli: &Cli) -> Result<()> {
    let tui = !cli.headless
        && cli.classify.is_none()
        && cli.write_frames.is_none()
        && cli.write_model.is_none();

    if !tui {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

fn write_model(path: &Path) -> Result<()> {
    let template = StrobePattern::default().brightness();
    LinearPredictor::matched_filter(&template)?.save(path)?;
    info!("Wrote predictor to {}", path.display());
    Ok(())
}

fn write_frames(dir: &Path) -> Result<()> {
    signal::write_frames(dir, &StrobePattern::default(), (FRAME_SIZE, FRAME_SIZE))?;
    Ok(())
}

/// Load the predictor artifact, applying the configured threshold override
fn load_predictor(config: &SimConfig) -> Result<LinearPredictor> {
    let predictor = LinearPredictor::load(&config.signal.model_path)?;
    Ok(match config.signal.threshold {
        Some(threshold) => predictor.with_threshold(threshold),
        None => predictor,
    })
}

fn classify_frames(config: &SimConfig, dir: &Path) -> Result<DetectionResult> {
    let predictor = load_predictor(config)?;
    let sequence = signal::load_brightness_sequence(dir, SEQUENCE_LEN);
    let result = signal::classify(&sequence, &predictor);
    info!(
        "Classified {} frames from {}: found={} confidence={:.2}",
        sequence.len(),
        dir.display(),
        result.found,
        result.confidence
    );
    Ok(result)
}

fn build_session(config: SimConfig, simulate_strobe: bool) -> Result<SimulationSession> {
    let predictor = load_predictor(&config).map(|p| Box::new(p) as Box<dyn Predictor>);
    let signal: Box<dyn SignalSource> = if simulate_strobe {
        Box::new(StaticSignal(StrobePattern::default().brightness()))
    } else {
        Box::new(FrameDirectory::new(config.signal.frames_dir.clone()))
    };

    let Some(map) = config.grid.map.clone() else {
        return SimulationSession::new(config, predictor, signal);
    };

    let grid = TerrainGrid::load_map(&map)?;
    let start = config.start_cell();
    let goal = match config.goal_cell() {
        Some(goal) => goal,
        None => {
            let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_default());
            grid.random_free_cell(&mut rng, 0, 0, Some(start))
                .ok_or_else(|| NavError::Config(format!("{} has no free cell for a goal", map.display())))?
        }
    };
    SimulationSession::with_terrain(config, grid, start, goal, predictor, signal)
}

async fn run(cli: Cli) -> Result<()> {
    init_logging(&cli)?;

    if let Some(path) = &cli.write_model {
        write_model(path)?;
    }
    if let Some(dir) = &cli.write_frames {
        write_frames(dir)?;
    }
    if cli.write_model.is_some() || cli.write_frames.is_some() {
        return Ok(());
    }

    let config = cli.sim_config()?;

    if let Some(dir) = &cli.classify {
        let result = classify_frames(&config, dir)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if cli.headless {
        // Enough frames to fly every cell of the grid at the configured cadence
        let frames_per_step = (config.move_delay().as_millis() / FRAME_DURATION.as_millis()) as usize + 2;

        let mut session = build_session(config, cli.simulate_strobe)?;
        let cells = session.grid().width() * session.grid().height();
        let max_frames = (cells + 1) * frames_per_step;
        let report = run_headless(&mut session, FRAME_DURATION, max_frames);
        let json = serde_json::to_string_pretty(&report)?;
        match &cli.report {
            Some(path) => {
                std::fs::write(path, json)?;
                info!("Wrote report to {}", path.display());
            }
            None => println!("{}", json),
        }
        return Ok(());
    }

    let mut app = App::new(build_session(config, cli.simulate_strobe)?);
    app.run().await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
