use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use panelforge::{
    BuildOptions, ByteOrder, ColorFormatPolicy, Manifest, PolicyPreset, Size,
    pipeline::artifact::{embed, inspect, preview},
};

#[derive(Parser, Debug)]
#[command(name = "panelforge", version, about = "Build packed RGB565 display assets")]
struct Cli {
    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build every asset in a manifest.
    Build(BuildArgs),
    /// Decode a raw artifact to a PNG.
    Preview(PreviewArgs),
    /// Render a raw artifact as a C source array.
    Embed(EmbedArgs),
    /// Print size, digest and first pixel of a raw artifact.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Manifest JSON.
    #[arg(long = "manifest", short = 'm', default_value = "assets.json")]
    manifest: PathBuf,

    /// Build only the named asset (repeatable).
    #[arg(long)]
    only: Vec<String>,

    /// Build assets in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads (implies --parallel).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct FrameGeometry {
    /// Frame width in pixels.
    #[arg(long)]
    width: i64,

    /// Frame height in pixels.
    #[arg(long)]
    height: i64,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Raw artifact.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    geometry: FrameGeometry,

    #[command(flatten)]
    policy: PolicyArgs,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct EmbedArgs {
    /// Raw artifact.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output C source path.
    #[arg(long)]
    out: PathBuf,

    /// Array name; defaults to the artifact's file stem.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Raw artifact.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Expected frame width.
    #[arg(long, requires = "height")]
    width: Option<i64>,

    /// Expected frame height.
    #[arg(long, requires = "width")]
    height: Option<i64>,

    #[command(flatten)]
    policy: PolicyArgs,
}

/// Policy the artifact was written with: a preset, optionally overridden field by field so
/// explicit manifest policies can be reproduced.
#[derive(Args, Debug)]
struct PolicyArgs {
    /// Named preset.
    #[arg(long, default_value = "plain-le", value_parser = parse_policy)]
    policy: ColorFormatPolicy,

    /// Override the preset's byte order.
    #[arg(long, value_enum)]
    byte_order: Option<ByteOrderArg>,

    /// Override the preset's inversion (true/false).
    #[arg(long)]
    invert: Option<bool>,

    /// Override the preset's byte swap (true/false).
    #[arg(long)]
    byte_swap: Option<bool>,
}

impl PolicyArgs {
    fn resolve(&self) -> ColorFormatPolicy {
        let mut policy = self.policy;
        if let Some(order) = self.byte_order {
            policy.byte_order = order.into();
        }
        if let Some(invert) = self.invert {
            policy.invert = invert;
        }
        if let Some(byte_swap) = self.byte_swap {
            policy.byte_swap = byte_swap;
        }
        policy
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ByteOrderArg {
    Little,
    Big,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(v: ByteOrderArg) -> Self {
        match v {
            ByteOrderArg::Little => ByteOrder::Little,
            ByteOrderArg::Big => ByteOrder::Big,
        }
    }
}

fn parse_policy(s: &str) -> Result<ColorFormatPolicy, String> {
    PolicyPreset::from_name(s)
        .map(PolicyPreset::policy)
        .map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Embed(args) => cmd_embed(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let manifest = Manifest::from_path(&args.manifest)
        .with_context(|| format!("load manifest '{}'", args.manifest.display()))?;
    let options = BuildOptions {
        only: args.only,
        parallel: args.parallel,
        threads: args.threads,
    };
    let report = panelforge::build(&manifest, &options)?;

    let summary = report.summary();
    if summary.failed > 0 {
        anyhow::bail!("{} of {} artifacts failed", summary.failed, report.assets.len());
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let size = Size::new(args.geometry.width, args.geometry.height)?;
    preview(&args.in_path, size, args.policy.resolve(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_embed(args: EmbedArgs) -> anyhow::Result<()> {
    embed(&args.in_path, args.name.as_deref(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let size = match (args.width, args.height) {
        (Some(w), Some(h)) => Some(Size::new(w, h)?),
        _ => None,
    };
    let info = inspect(&args.in_path, size, args.policy.resolve())?;
    println!("{}", args.in_path.display());
    println!("{info}");
    if info.size_matches() == Some(false) {
        anyhow::bail!("artifact size does not match the expected frame size");
    }
    Ok(())
}
