use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use leaflet::{
    AspectRatio, ExportOptions, FontBook, ImageFormat, ImageStore, ParleyTypesetter, PosterSpec,
    RenderConfig, TextAlignment, TextLayoutEngine,
};

#[derive(Parser, Debug)]
#[command(name = "leaflet", version, about = "Render quote posters")]
struct Cli {
    /// Log pipeline progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the preset catalog as JSON.
    Presets,
    /// Render a poster and save it into a directory.
    Render(RenderArgs),
    /// Print the computed text layout as JSON.
    Layout(LayoutArgs),
}

/// Poster content; flags override values from `--config`.
#[derive(Args, Debug)]
struct PosterArgs {
    /// Poster spec JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preset id (editorial, classic, modern).
    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    quote: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// left, center or right.
    #[arg(long)]
    quote_align: Option<TextAlignment>,

    /// left, center or right.
    #[arg(long)]
    author_align: Option<TextAlignment>,

    /// Filter intensity, 0-100.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    intensity: Option<u8>,

    /// 1:1 or 4:5.
    #[arg(long)]
    aspect: Option<AspectRatio>,

    /// Directory of TTF/OTF files (and an optional fonts.json alias manifest).
    #[arg(long)]
    fonts: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    poster: PosterArgs,

    /// Root the preset image paths are resolved against.
    #[arg(long)]
    assets: PathBuf,

    /// Directory the poster is saved into.
    #[arg(long)]
    out_dir: PathBuf,

    /// png or jpeg.
    #[arg(long, default_value = "png")]
    format: ImageFormat,

    /// JPEG quality, 0-1.
    #[arg(long)]
    quality: Option<f32>,

    /// Output file name (defaults to leaflet-{preset}-{ms}.{ext}).
    #[arg(long)]
    filename: Option<String>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    poster: PosterArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Presets => cmd_presets(),
        Command::Render(args) => cmd_render(args).await,
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_logging(verbose: bool) {
    if !verbose {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn cmd_presets() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(leaflet::presets()).context("serialize presets")?;
    println!("{json}");
    Ok(())
}

fn resolve_config(args: &PosterArgs) -> anyhow::Result<RenderConfig> {
    let mut spec = match &args.config {
        Some(path) => read_spec(path)?,
        None => PosterSpec::default(),
    };
    if args.preset.is_some() {
        spec.preset.clone_from(&args.preset);
    }
    if args.quote.is_some() {
        spec.quote.clone_from(&args.quote);
    }
    if args.author.is_some() {
        spec.author.clone_from(&args.author);
    }
    spec.quote_alignment = args.quote_align.or(spec.quote_alignment);
    spec.author_alignment = args.author_align.or(spec.author_alignment);
    spec.filter_intensity = args.intensity.or(spec.filter_intensity);
    spec.aspect_ratio = args.aspect.or(spec.aspect_ratio);

    Ok(spec.resolve()?)
}

fn read_spec(path: &Path) -> anyhow::Result<PosterSpec> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read poster spec '{}'", path.display()))?;
    PosterSpec::from_json_str(&raw).with_context(|| format!("parse '{}'", path.display()))
}

fn load_fonts(dir: &Path) -> anyhow::Result<Arc<FontBook>> {
    let mut book = FontBook::new();
    let n = book
        .load_dir(dir)
        .with_context(|| format!("load fonts from '{}'", dir.display()))?;
    if n == 0 {
        anyhow::bail!("no fonts found in '{}'", dir.display());
    }
    Ok(Arc::new(book))
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.poster)?;
    let fonts = load_fonts(&args.poster.fonts)?;
    let mut typesetter = ParleyTypesetter::new(fonts);

    let mut store = ImageStore::new(&args.assets);
    let images = store
        .load_render_images(&config.preset)
        .with_context(|| format!("load images for preset '{}'", config.preset.id))?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let options = ExportOptions {
        format: args.format,
        quality: args.quality,
        filename: args.filename,
    };
    let result = leaflet::download(
        &config,
        &images.background,
        &images.filter,
        &mut typesetter,
        &options,
        &args.out_dir,
    )
    .await;

    if !result.success {
        anyhow::bail!(
            "export failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    let path = result
        .path
        .unwrap_or_else(|| args.out_dir.join(&result.filename));
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.poster)?;
    let fonts = load_fonts(&args.poster.fonts)?;
    let mut typesetter = ParleyTypesetter::new(fonts);

    let mut engine = TextLayoutEngine::new(config.dimensions(), &mut typesetter);
    let layout = engine.compose_layout(
        &config.quote_text,
        &config.author_text,
        &config.preset.quote_style,
        &config.preset.author_style,
        config.quote_alignment,
        config.author_alignment,
    )?;

    println!(
        "{}",
        serde_json::to_string_pretty(&layout).context("serialize layout")?
    );
    Ok(())
}
