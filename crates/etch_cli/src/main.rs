use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use etch_grid::{
    CellIndex, ControlChange, EtchConfig, ResizeRequest, SketchEvent, SketchSession, Viewport,
    DEFAULT_EXPORT_NAME,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

/// `{msg}` carries the summary line set when the replay finishes.
const PROGRESS_TEMPLATE: &str =
    "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} events {msg}";

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay Etch-a-Sketch input and export the grid as an image")]
struct Cli {
    /// TOML file with session settings
    #[arg(long, global = true, env = "ETCH_CONFIG")]
    config: Option<PathBuf>,
    #[command(flatten)]
    viewport: ViewportArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON-lines event script, then export the grid
    Replay(ReplayArgs),
    /// Export a freshly built grid
    Blank(BlankArgs),
    /// Print the cell under a pointer position
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Event script, one JSON object per line
    script: PathBuf,
    /// Output image path (.ppm is written as P3 text, other extensions via `image`)
    #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
    output: PathBuf,
    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Parser, Debug)]
struct BlankArgs {
    /// Cells per side; defaults to the configured default dimension
    #[arg(long)]
    dimension: Option<String>,
    /// Output image path
    #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Viewport-relative pointer x
    #[arg(allow_negative_numbers = true)]
    x: f32,
    /// Viewport-relative pointer y
    #[arg(allow_negative_numbers = true)]
    y: f32,
    /// Cells per side
    #[arg(long)]
    dimension: Option<String>,
}

#[derive(Parser, Debug, Clone)]
struct ViewportArgs {
    /// Viewport width in pixels
    #[arg(long, global = true, default_value_t = 800.0)]
    width: f32,
    /// Viewport height in pixels
    #[arg(long, global = true, default_value_t = 900.0)]
    height: f32,
    /// Height of a widget stacked above the grid (repeatable)
    #[arg(long = "header-height", global = true, default_values_t = [100.0])]
    header_heights: Vec<f32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let viewport = cli.viewport.to_viewport();
    match cli.command {
        Commands::Replay(args) => replay(args, &config, viewport),
        Commands::Blank(args) => blank(args, &config, viewport),
        Commands::Resolve(args) => resolve(args, &config, viewport),
    }
}

fn load_config(path: Option<&Path>) -> Result<EtchConfig> {
    let Some(path) = path else {
        return Ok(EtchConfig::default());
    };

    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read config {:?}", path))?;
    let config: EtchConfig =
        toml::from_str(&text).with_context(|| format!("failed to parse config {:?}", path))?;
    debug!("loaded config from {:?}: {config:?}", path);
    Ok(config)
}

fn replay(args: ReplayArgs, config: &EtchConfig, viewport: Viewport) -> Result<()> {
    let mut session =
        SketchSession::new(config, viewport).context("failed to lay out the initial grid")?;
    let events = load_script(&args.script)?;

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(events.len() as u64)
    };
    progress.set_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .context("invalid progress template")?
            .progress_chars("=> "),
    );

    for (line, event) in events {
        session.handle(event).with_context(|| format!("event on line {} failed", line))?;
        progress.inc(1);
    }

    let image = session.export().context("failed to export the grid")?;
    image.save(&args.output).with_context(|| format!("failed to write {:?}", args.output))?;
    progress.finish_with_message(format!(
        "{}x{} image written to {:?}",
        image.width(),
        image.height(),
        args.output
    ));
    info!("replayed {:?} into {:?}", args.script, args.output);
    Ok(())
}

fn blank(args: BlankArgs, config: &EtchConfig, viewport: Viewport) -> Result<()> {
    let session = session_with_dimension(config, viewport, args.dimension)?;
    let image = session.export().context("failed to export the grid")?;
    image.save(&args.output).with_context(|| format!("failed to write {:?}", args.output))?;
    println!("{}x{} image written to {:?}", image.width(), image.height(), args.output);
    Ok(())
}

fn resolve(args: ResolveArgs, config: &EtchConfig, viewport: Viewport) -> Result<()> {
    let session = session_with_dimension(config, viewport, args.dimension)?;
    println!("{}", describe_cell(&session, args.x, args.y));
    Ok(())
}

/// `"index (x, y)"` for the cell under the pointer, or `"none"`.
fn describe_cell(session: &SketchSession, x: f32, y: f32) -> String {
    match session.geometry().resolve(x, y) {
        Some(cell @ CellIndex(index)) => {
            let (x, y) = cell.coords(session.dimension());
            format!("{index} ({x}, {y})")
        },
        None => String::from("none"),
    }
}

fn session_with_dimension(
    config: &EtchConfig,
    viewport: Viewport,
    dimension: Option<String>,
) -> Result<SketchSession> {
    let mut session =
        SketchSession::new(config, viewport).context("failed to lay out the initial grid")?;
    if let Some(dimension) = dimension {
        let resize = ControlChange::Resize { dimension: ResizeRequest::Text(dimension) };
        session.handle(SketchEvent::Control(resize)).context("failed to resize the grid")?;
    }
    Ok(session)
}

/// Parse a script into events tagged with their 1-based line numbers. Blank
/// lines and `#` comments are skipped.
fn load_script(path: &Path) -> Result<Vec<(usize, SketchEvent)>> {
    let file =
        fs::File::open(path).with_context(|| format!("failed to open script {:?}", path))?;
    parse_script(BufReader::new(file)).with_context(|| format!("failed to parse {:?}", path))
}

fn parse_script<R: BufRead>(reader: R) -> Result<Vec<(usize, SketchEvent)>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line)
            .with_context(|| format!("line {} is not a valid event", index + 1))?;
        events.push((index + 1, event));
    }
    Ok(events)
}

impl ViewportArgs {
    fn to_viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.header_heights.clone())
    }
}
