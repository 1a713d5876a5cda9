use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "facestudio", version)]
struct Cli {
    /// JSON config file. Defaults plus environment overrides when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bake every frame of a project into an RGB565 LVGL `.c`/`.h` pair.
    Bake(BakeArgs),
    /// Emit the native LVGL object/animation state machine.
    Native(NativeArgs),
    /// Render the animation at a point in time as a PNG.
    Frame(FrameArgs),
    /// Print the `save_anim` bridge payload for a project.
    Payload(PayloadArgs),
}

#[derive(Parser, Debug)]
struct BakeArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Artifact name; sanitized into a C identifier.
    #[arg(long, default_value = facestudio::DEFAULT_ARTIFACT_NAME)]
    name: String,

    /// Directory receiving `<name>.c` and `<name>.h`.
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct NativeArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value = facestudio::DEFAULT_ARTIFACT_NAME)]
    name: String,

    /// Directory receiving `<name>_native.c`.
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// State to play. Defaults to the project's active state.
    #[arg(long)]
    state: Option<String>,

    /// Playback time in milliseconds.
    #[arg(long = "time-ms", default_value_t = 0.0)]
    time_ms: f64,

    /// `once`, `loop` or `pingpong`.
    #[arg(long = "loop-mode", default_value = "loop")]
    loop_mode: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PayloadArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value = facestudio::DEFAULT_ARTIFACT_NAME)]
    name: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => facestudio::StudioConfig::from_path(path)?,
        None => facestudio::StudioConfig::from_env(),
    };
    match cli.cmd {
        Command::Bake(args) => cmd_bake(args, &config),
        Command::Native(args) => cmd_native(args, &config),
        Command::Frame(args) => cmd_frame(args, &config),
        Command::Payload(args) => cmd_payload(args, &config),
    }
}

fn read_project(
    path: &Path,
    config: &facestudio::StudioConfig,
) -> anyhow::Result<facestudio::Project> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open project '{}'", path.display()))?;
    let mut project = facestudio::import_project(&json, &config.style)
        .with_context(|| format!("parse project '{}'", path.display()))?;
    project.clamp_durations(config.min_frame_duration_ms);
    Ok(project)
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_bake(args: BakeArgs, config: &facestudio::StudioConfig) -> anyhow::Result<()> {
    let project = read_project(&args.in_path, config)?;
    let mut surface = facestudio::CpuSurface::new(project.canvas())?;
    let artifacts = facestudio::bake_project(&project, &args.name, &config.bake, &mut surface)?;

    write_text(
        &args.out_dir.join(format!("{}.c", artifacts.name)),
        &artifacts.source,
    )?;
    write_text(
        &args.out_dir.join(format!("{}.h", artifacts.name)),
        &artifacts.header,
    )?;
    eprintln!("baked {} frames", artifacts.frame_count);
    Ok(())
}

fn cmd_native(args: NativeArgs, config: &facestudio::StudioConfig) -> anyhow::Result<()> {
    let project = read_project(&args.in_path, config)?;
    let artifact = facestudio::emit_native(&project, &args.name)?;
    write_text(&args.out_dir.join(artifact.file_name()), &artifact.source)
}

fn cmd_frame(args: FrameArgs, config: &facestudio::StudioConfig) -> anyhow::Result<()> {
    let project = read_project(&args.in_path, config)?;
    let state = match &args.state {
        Some(id) => project
            .state(id)
            .with_context(|| format!("unknown state '{id}'"))?,
        None => project.active_state(),
    };
    let loop_mode = facestudio::LoopMode::from_name(&args.loop_mode)
        .with_context(|| format!("unknown loop mode '{}'", args.loop_mode))?;

    let tick = facestudio::evaluate_at(
        &state.durations_ms(),
        args.time_ms,
        loop_mode,
        project.easing,
        config.pixels_per_second,
    )
    .context("state has no frames")?;
    tracing::debug!(frame = tick.frame_index, t = tick.eased_t, "evaluated");

    let frames = state.frames();
    let frame = frames
        .get(tick.frame_index)
        .context("evaluated frame out of range (bug)")?;
    let tween = if tick.finished {
        None
    } else {
        frames.get(tick.next_index).map(|next| (next, tick.eased_t))
    };

    let canvas = project.canvas();
    let mut surface = facestudio::CpuSurface::new(canvas)?;
    facestudio::render_frame(&mut surface, frame, tween, config.bake.background)?;
    let rgba = facestudio::Surface::read_rgba(&surface);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &rgba,
        canvas.width,
        canvas.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_payload(args: PayloadArgs, config: &facestudio::StudioConfig) -> anyhow::Result<()> {
    let project = read_project(&args.in_path, config)?;
    let payload = facestudio::SaveAnimPayload::from_project(&project, &args.name);
    let json = serde_json::to_string_pretty(&payload).context("serialize payload")?;
    println!("{json}");
    Ok(())
}
