use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use splashgif::{
    GifSink, Pipeline, PipelineConfig, ReqwestTransport, Resolution, SourceMode, assemble,
    collect_folder_frames,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "splashgif", version, about)]
struct Cli {
    #[command(flatten)]
    opts: CommonArgs,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate releases through the tags API (default).
    Tags,
    /// Enumerate releases by scraping the branch listing.
    Branches,
    /// Build a GIF from the images already in a folder (sorted by file name).
    Folder(FolderArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// JSON configuration file; flags below override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output GIF path.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Directory for downloaded images.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Display time of each frame in milliseconds.
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Resize every image to WIDTHxHEIGHT before assembly.
    #[arg(long, global = true, conflicts_with = "no_resize")]
    resize: Option<Resolution>,

    /// Assemble images at their downloaded size.
    #[arg(long, global = true, default_value_t = false)]
    no_resize: bool,

    /// Keep downloaded images after the GIF is written.
    #[arg(long, global = true, default_value_t = false)]
    keep_downloads: bool,
}

#[derive(Args, Debug)]
struct FolderArgs {
    /// Folder containing png/jpg/jpeg/gif frames.
    #[arg(long)]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "splashgif=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.opts)?;
    match cli.cmd {
        None | Some(Command::Tags) => cmd_pipeline(PipelineConfig {
            mode: SourceMode::Tags,
            ..cfg
        }),
        Some(Command::Branches) => cmd_pipeline(PipelineConfig {
            mode: SourceMode::Branches,
            ..cfg
        }),
        Some(Command::Folder(args)) => cmd_folder(&cfg, args),
    }
}

fn load_config(opts: &CommonArgs) -> anyhow::Result<PipelineConfig> {
    let mut cfg = match &opts.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(out) = &opts.out {
        cfg.output_path = out.clone();
    }
    if let Some(dir) = &opts.output_dir {
        cfg.output_dir = dir.clone();
    }
    if let Some(ms) = opts.delay_ms {
        cfg.frame_delay_ms = ms;
    }
    if let Some(res) = opts.resize {
        cfg.target_resolution = Some(res);
    }
    if opts.no_resize {
        cfg.target_resolution = None;
    }
    if opts.keep_downloads {
        cfg.keep_downloads = true;
    }
    cfg.auth_token = std::env::var("GITHUB_TOKEN")
        .or_else(|_| std::env::var("GH_TOKEN"))
        .ok();

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_pipeline(cfg: PipelineConfig) -> anyhow::Result<()> {
    let transport = ReqwestTransport::new(
        &cfg.user_agent,
        cfg.request_timeout(),
        cfg.auth_token.clone(),
    )?;
    let mut sink = GifSink::new(&cfg.output_path);

    let report = Pipeline::new(&cfg, &transport)?.run(&mut sink)?;

    if report.frames_written > 0 {
        eprintln!(
            "wrote {} ({} frames, {} skipped)",
            cfg.output_path.display(),
            report.frames_written,
            report.skipped.len()
        );
    } else {
        eprintln!("no frames collected, nothing written");
    }
    Ok(())
}

fn cmd_folder(cfg: &PipelineConfig, args: FolderArgs) -> anyhow::Result<()> {
    let paths = collect_folder_frames(&args.dir)?;
    if paths.is_empty() {
        eprintln!("no images in {}, nothing written", args.dir.display());
        return Ok(());
    }

    let mut sink = GifSink::new(&cfg.output_path);
    let frames = assemble(&paths, cfg.frame_delay(), &mut sink)
        .with_context(|| format!("assemble frames from '{}'", args.dir.display()))?;

    eprintln!("wrote {} ({frames} frames)", cfg.output_path.display());
    Ok(())
}
