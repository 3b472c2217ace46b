use std::{
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codefall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate frames at a fixed rate and write PNGs.
    Render(RenderArgs),
    /// Print encoded profiles with key positions marked.
    Profiles(ProfilesArgs),
}

#[derive(Args, Debug)]
struct Overrides {
    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Encoding style.
    #[arg(long, value_enum)]
    encoding: Option<StyleChoice>,

    /// Deterministic seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory of `<id>.json` datasets; selects the external data source.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Dataset identifier (repeatable).
    #[arg(long = "dataset")]
    datasets: Vec<String>,

    /// Borough filter for external data.
    #[arg(long)]
    area_group: Option<String>,

    /// Neighborhood-area code filter for external data.
    #[arg(long)]
    area_code: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: Overrides,

    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 640.0)]
    width: f32,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 360.0)]
    height: f32,

    /// Device pixel ratio (capped at 2).
    #[arg(long, default_value_t = 1.0)]
    dpr: f32,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 90)]
    frames: u64,

    /// Simulation frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output PNG for the final frame.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write every frame into this directory instead.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Rendering mode.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Color theme.
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Density scale (0.2-2.0).
    #[arg(long)]
    density: Option<f32>,

    /// Speed scale (0.5-3.0).
    #[arg(long)]
    speed: Option<f32>,

    /// Glow intensity (0-1).
    #[arg(long)]
    glow: Option<f32>,

    /// Font file for glyphs and panels.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Background worker threads (0 = inline).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct ProfilesArgs {
    #[command(flatten)]
    common: Overrides,

    /// Number of profiles to print.
    #[arg(long, default_value_t = 5)]
    count: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleChoice {
    Json,
    Kv,
    Code,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Columns,
    Panels,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    Green,
    Cyan,
    Magenta,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Profiles(args) => cmd_profiles(args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(o: &Overrides) -> anyhow::Result<codefall::Config> {
    let mut cfg = match &o.config {
        Some(p) => codefall::Config::load(p)?,
        None => codefall::Config::default(),
    };
    if let Some(style) = o.encoding {
        cfg.set_encoding(match style {
            StyleChoice::Json => codefall::EncodingStyle::Json,
            StyleChoice::Kv => codefall::EncodingStyle::Kv,
            StyleChoice::Code => codefall::EncodingStyle::Code,
        });
    }
    if o.seed.is_some() {
        cfg.seed = o.seed;
    }
    if let Some(dir) = &o.data_dir {
        cfg.data_dir = Some(dir.clone());
        cfg.set_data_source(codefall::DataSourceKind::External);
    }
    if !o.datasets.is_empty() {
        cfg.dataset_ids = o.datasets.clone();
    }
    if o.area_group.is_some() || o.area_code.is_some() {
        cfg.set_area_filter(o.area_group.clone(), o.area_code.clone());
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be >= 1");
    }
    let mut cfg = load_config(&args.common)?;
    if let Some(mode) = args.mode {
        cfg.set_mode(match mode {
            ModeChoice::Columns => codefall::RenderMode::Columns,
            ModeChoice::Panels => codefall::RenderMode::Panels,
        });
    }
    if let Some(theme) = args.theme {
        cfg.set_theme(match theme {
            ThemeChoice::Green => codefall::Theme::Green,
            ThemeChoice::Cyan => codefall::Theme::Cyan,
            ThemeChoice::Magenta => codefall::Theme::Magenta,
        });
    }
    if let Some(v) = args.density {
        cfg.set_density(v);
    }
    if let Some(v) = args.speed {
        cfg.set_speed(v);
    }
    if let Some(v) = args.glow {
        cfg.set_glow(v);
    }
    if args.font.is_some() {
        cfg.font_path = args.font.clone();
    }
    if let Some(n) = args.threads {
        cfg.worker_threads = n;
    }

    let size = codefall::SurfaceSize::for_viewport(args.width, args.height, args.dpr);
    let mut scheduler = codefall::Scheduler::from_config(cfg, size)?;
    scheduler.settle(Duration::from_secs(10));

    let step = Duration::from_secs(1) / args.fps;
    let mut now = Duration::ZERO;
    for i in 0..args.frames {
        let stats = scheduler.tick(now);
        tracing::debug!(frame = i, ?stats, "tick");
        if let Some(dir) = &args.frames_dir {
            codefall::export::write_png(scheduler.surface(), &codefall::export::frame_path(dir, i))?;
        }
        // Workers may lag a real-time loop; keep frames reproducible for offline output.
        scheduler.settle(Duration::from_secs(10));
        now += step;
    }

    let out = match (&args.out, &args.frames_dir) {
        (Some(p), _) => Some(p.clone()),
        (None, None) => Some(PathBuf::from("codefall.png")),
        (None, Some(_)) => None,
    };
    if let Some(path) = out {
        codefall::export::write_png(scheduler.surface(), &path)?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(dir) = &args.frames_dir {
        eprintln!("wrote {} frames to {}", args.frames, dir.display());
    }
    Ok(())
}

fn cmd_profiles(args: ProfilesArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let mut rng: Box<dyn codefall::RandomSource> = match cfg.seed {
        Some(seed) => Box::new(codefall::StdRandom::seeded(seed)),
        None => Box::new(codefall::StdRandom::from_entropy()),
    };
    let profiles = fetch_profiles(&cfg, args.count, rng.as_mut())?;
    for p in &profiles {
        let encoded = codefall::EncodedStream::new(p, cfg.encoding);
        println!("{}", encoded.text);
        println!("{}", key_marker(&encoded));
    }
    Ok(())
}

fn fetch_profiles(
    cfg: &codefall::Config,
    count: usize,
    rng: &mut dyn codefall::RandomSource,
) -> anyhow::Result<Vec<Arc<codefall::Profile>>> {
    let clock: Arc<dyn codefall::Clock> = Arc::new(codefall::SystemClock);
    let mut source =
        codefall::ProfileSource::synthetic(clock.clone(), codefall::TaskQueue::inline());
    if cfg.data_source == codefall::DataSourceKind::External {
        let supplier = codefall::scheduler::external_supplier(cfg, clock)
            .context("external data source requires --data-dir")?;
        source = source.with_supplier(supplier);
        source.request_refresh(codefall::ProfileFilter {
            area_group: cfg.area_group.clone(),
            area_code: cfg.area_code.clone(),
            limit: cfg.fetch_limit,
        });
        source.drain();
    }
    Ok(source.get_profiles(count, rng))
}

fn key_marker(encoded: &codefall::EncodedStream) -> String {
    (0..encoded.char_len())
        .map(|i| if encoded.keys.contains(&i) { '^' } else { ' ' })
        .collect::<String>()
        .trim_end()
        .to_string()
}
