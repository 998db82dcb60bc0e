use std::io;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use routereel::{
    FrameIndex, HttpTileSource, PipelineOpts, RenderThreading, RouteVideo, RouteVideoRequest,
    TextRasterizer, TileSourceConfig,
};

#[derive(Parser, Debug)]
#[command(name = "routereel", version)]
struct Cli {
    /// Log more (repeat for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the zoom, basemap and phase plan as JSON without rendering.
    Plan(PlanArgs),
}

#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// Input request JSON (geojson, dist_mi, speed_mph, options).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Force tile imagery on, overriding the request's `map_tiles`.
    #[arg(long, default_value_t = false)]
    tiles: bool,

    /// MapTiler API key; without it the OSM HOT tile server is used.
    #[arg(long, env = "MAPTILER_KEY", hide_env_values = true)]
    maptiler_key: Option<String>,

    /// Tile request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    tile_timeout_ms: u64,

    /// Extra directory of `.ttf`/`.otf` fonts for the HUD.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory.
    #[arg(long, default_value = "videos")]
    out_dir: PathBuf,

    /// Output file name (defaults to `<route_name|route_hash>.mp4`).
    #[arg(long)]
    out_name: Option<String>,

    /// Fail instead of replacing an existing file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Seconds to wait for ffmpeg after the last frame.
    #[arg(long, default_value_t = 300)]
    encoder_timeout_secs: u64,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Render identical hold frames once per chunk.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Frame index (0-based); FINAL_HOLD frames are allowed.
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    source: SourceArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn prepare(source: &SourceArgs) -> anyhow::Result<(RouteVideoRequest, RouteVideo)> {
    let mut req = RouteVideoRequest::from_path(&source.in_path)?;
    if source.tiles {
        req.config.map_tiles = true;
    }

    let tile_cfg = match source.maptiler_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => TileSourceConfig::maptiler(key),
        _ => TileSourceConfig::default(),
    };
    let tiles = HttpTileSource::new(
        &tile_cfg.url_template,
        std::time::Duration::from_millis(source.tile_timeout_ms),
        &tile_cfg.user_agent,
    )?;

    let text = match &source.font_dir {
        Some(dir) => TextRasterizer::with_font_dirs(&[dir.as_path()]),
        None => TextRasterizer::with_system_fonts(),
    };
    if text.face_count() == 0 {
        tracing::warn!("no fonts found; HUD text will be blank");
    }

    let video = RouteVideo::from_request(&req, &tiles, text)?;
    Ok((req, video))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (req, video) = prepare(&args.source)?;

    let opts = PipelineOpts {
        out_dir: args.out_dir,
        file_name: args.out_name,
        overwrite: !args.no_overwrite,
        encoder_timeout: std::time::Duration::from_secs(args.encoder_timeout_secs),
        threading: RenderThreading {
            parallel: args.parallel,
            chunk_size: args.chunk_size,
            threads: args.threads,
            static_frame_elision: args.static_frame_elision,
        },
    };
    let stem = req.output_stem(video.route());
    let (path, stats) = video.render_to_dir(&stem, &opts)?;

    eprintln!(
        "wrote {} ({} frames, {} rendered)",
        path.display(),
        stats.frames_total,
        stats.frames_rendered
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (_, video) = prepare(&args.source)?;
    let frame = video.render_frame(FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (_, video) = prepare(&args.source)?;
    let plan = video.plan();
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize plan")?
    );
    Ok(())
}
