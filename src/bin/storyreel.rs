use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use storyreel::{
    CompilerConfig, FfmpegRenderer, Fps, Resolution, Scenario, StoryreelError, TransitionPolicy,
};

#[derive(Parser, Debug)]
#[command(
    name = "storyreel",
    version,
    about = "Assemble a shot list into a Ken Burns slideshow video (requires `ffmpeg` on PATH)."
)]
struct Cli {
    /// Scenario JSON (a list of shot records).
    scenario: PathBuf,

    /// Use at most this many shots; 0 means no limit.
    #[arg(long, default_value_t = 12)]
    limit: usize,

    /// Output video path, relative to the scenario directory.
    #[arg(long, default_value = "output_video.mp4")]
    output: PathBuf,

    /// Frame rate, e.g. `24` or `30000/1001`.
    #[arg(long)]
    fps: Option<Fps>,

    /// Output resolution as WxH.
    #[arg(long)]
    resolution: Option<Resolution>,

    /// Narration track to mux; the video length wins.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Print the ffmpeg command instead of rendering.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// With --dry-run, also print the compiled graph as JSON.
    #[arg(long, default_value_t = false, requires = "dry_run")]
    describe: bool,

    /// Seed for effect and transition choices.
    #[arg(long)]
    seed: Option<u64>,

    /// Transition policy: `blur`, `random`, or a style list like `fade,wipeleft`.
    #[arg(long)]
    transitions: Option<TransitionPolicy>,

    /// JSON file overriding compiler defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<CompilerConfig> {
    let mut cfg = match &cli.config {
        Some(path) => CompilerConfig::from_json_path(path)?,
        None => CompilerConfig::default(),
    };
    if let Some(fps) = cli.fps {
        cfg.fps = fps;
    }
    if let Some(resolution) = cli.resolution {
        cfg.resolution = resolution;
    }
    if let Some(policy) = &cli.transitions {
        cfg.transitions = policy.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = load_config(&cli)?;
    let scenario = Scenario::from_path(&cli.scenario)?;
    let output = scenario.root.join(&cli.output);

    let mut rng = storyreel::rng_from_seed(cli.seed);
    let compiled = storyreel::compile(
        &scenario,
        (cli.limit > 0).then_some(cli.limit),
        cli.audio.as_deref(),
        &cfg,
        &mut rng,
    )?;

    if cli.dry_run {
        println!("{}", compiled.command(&cfg, &output).to_shell());
        if cli.describe {
            let json = serde_json::to_string_pretty(&compiled.describe())
                .context("serialize graph description")?;
            println!("{json}");
        }
        return Ok(());
    }

    storyreel::render(&compiled, &cfg, &mut FfmpegRenderer, &output)?;
    eprintln!("wrote {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<StoryreelError>()
                .map_or(1, StoryreelError::exit_code);
            ExitCode::from(u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1))
        }
    }
}
