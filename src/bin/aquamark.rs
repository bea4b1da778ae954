use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use aquamark::{
    BackendKind, BatchItem, WatermarkConfig, create_backend, decode_image, encode_png,
    watermark_batch,
};

#[derive(Parser, Debug)]
#[command(name = "aquamark", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watermark a single image and write it as a PNG.
    Apply(ApplyArgs),
    /// Watermark many images sequentially into an output directory.
    Batch(BatchArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    /// Pixel-buffer backend (interactive/export parity).
    Raster,
    /// Declarative SVG overlay backend (server/bulk export path).
    Svg,
}

impl From<BackendArg> for BackendKind {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Raster => BackendKind::Raster,
            BackendArg::Svg => BackendKind::SvgOverlay,
        }
    }
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image path.
    #[arg(long)]
    image: PathBuf,

    /// Watermark config JSON path (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logo image path (Logo/Combo configs).
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Render backend.
    #[arg(long, value_enum, default_value_t = BackendArg::Svg)]
    backend: BackendArg,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input image paths.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Watermark config JSON path (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logo image path (Logo/Combo configs).
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Render backend.
    #[arg(long, value_enum, default_value_t = BackendArg::Svg)]
    backend: BackendArg,

    /// Output directory for `watermarked_*.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<WatermarkConfig> {
    match path {
        Some(p) => {
            let json = std::fs::read_to_string(p)
                .with_context(|| format!("read config '{}'", p.display()))?;
            Ok(WatermarkConfig::from_json(&json)?)
        }
        None => Ok(WatermarkConfig::default()),
    }
}

fn load_logo(path: Option<&PathBuf>) -> anyhow::Result<Option<image::RgbaImage>> {
    match path {
        Some(p) => {
            let bytes =
                std::fs::read(p).with_context(|| format!("read logo '{}'", p.display()))?;
            Ok(Some(decode_image(&bytes)?.rgba))
        }
        None => Ok(None),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let logo = load_logo(args.logo.as_ref())?;

    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?;
    let base = decode_image(&bytes)?;

    let mut backend = create_backend(args.backend.into());
    let frame = backend.render(&base, &config, logo.as_ref())?;
    let png = encode_png(&frame)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let logo = load_logo(args.logo.as_ref())?;

    let mut items = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        items.push(BatchItem { name, bytes });
    }

    let mut backend = create_backend(args.backend.into());
    let report = watermark_batch(items, &config, logo.as_ref(), backend.as_mut(), |i, n, name| {
        eprintln!("[{}/{n}] {name}", i + 1);
    })?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for out in &report.outputs {
        let path = args.out_dir.join(&out.file_name);
        std::fs::write(&path, &out.png)
            .with_context(|| format!("write png '{}'", path.display()))?;
    }

    for failure in &report.failures {
        eprintln!("failed: {} ({})", failure.name, failure.error);
    }
    eprintln!(
        "wrote {} of {} image(s) to {}",
        report.outputs.len(),
        report.attempted(),
        args.out_dir.display()
    );

    // Partial success is success; only a fully failed run is an error.
    if report.nothing_succeeded() {
        anyhow::bail!("no image in the batch could be processed");
    }
    Ok(())
}
