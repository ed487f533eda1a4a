use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "garble", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render text to a PNG.
    Render(RenderArgs),
    /// Print a preset configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text to render. Falls back to the configured default text.
    #[arg(long)]
    text: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON configuration file. Overrides `--preset`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in configuration.
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Seed for a reproducible image.
    #[arg(long)]
    seed: Option<u64>,

    /// Font file to use instead of the configured candidates. Repeatable.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Built-in configuration to print.
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Default,
    Classic,
}

impl Preset {
    fn config(self) -> garble::GarbleConfig {
        match self {
            Self::Default => garble::GarbleConfig::default(),
            Self::Classic => garble::GarbleConfig::classic(),
        }
    }
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
        Command::Render(args) => cmd_render(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => garble::GarbleConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => args.preset.config(),
    };
    if !args.fonts.is_empty() {
        cfg.fonts.root = PathBuf::from(".");
        cfg.fonts.candidates = args
            .fonts
            .iter()
            .map(|p| {
                std::path::absolute(p)
                    .map(|p| p.to_string_lossy().into_owned())
                    .with_context(|| format!("resolve font path '{}'", p.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
    }

    let text = cfg.request_text(args.text.as_deref());
    let mut rng = match args.seed {
        Some(seed) => garble::RandomSource::seeded(seed),
        None => garble::RandomSource::from_os()?,
    };
    let fonts = garble::FsFontProvider::from_config(&cfg.fonts);
    let img = garble::render_png(&text, &cfg, &fonts, &mut rng)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &img.png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    tracing::info!(
        width = img.width,
        height = img.height,
        bytes = img.png.len(),
        "wrote {}",
        args.out.display()
    );
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&args.preset.config()).context("serialize config")?;
    println!("{json}");
    Ok(())
}
