use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gc_app_state::AppState;
use gc_common::{ComposerConfig, TimelineDocument};
use gc_device::{DeviceRegistry, ZoneSpan, DEFAULT_DEVICE_ID};
use gc_encoder::{save_artifact, CompositionArtifact, EmptyPolicy, ExportConfig, ExportEncoder};
use gc_watermark::WatermarkMatrix;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "glyph-composer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in device profiles and their macro buttons.
    Devices,
    /// Start a new document, optionally pre-filled with macro groups.
    New(NewArgs),
    /// Encode a document into a composition artifact.
    Export(ExportArgs),
    /// Decode an artifact and print per-zone activity.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Target device id.
    #[arg(long, default_value = DEFAULT_DEVICE_ID)]
    device: String,

    /// Audio duration in milliseconds.
    #[arg(long)]
    duration_ms: f64,

    /// Macro group index to apply (repeatable).
    #[arg(long = "macro")]
    macros: Vec<usize>,

    /// Start time for the applied macros.
    #[arg(long, default_value_t = 0.0)]
    at_ms: f64,

    /// Composer configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output document path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input document JSON.
    #[arg(long)]
    document: PathBuf,

    /// Watermark JSON to attach.
    #[arg(long)]
    watermark: Option<PathBuf>,

    /// Sampling interval in milliseconds.
    #[arg(long, default_value_t = gc_encoder::DEFAULT_BUCKET_MILLIS)]
    bucket_ms: f64,

    /// Export an all-idle artifact instead of failing on an empty document.
    #[arg(long, default_value_t = false)]
    allow_empty: bool,

    /// Output artifact path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Artifact JSON to decode.
    #[arg(long)]
    artifact: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Devices => cmd_devices(),
        Command::New(args) => cmd_new(args),
        Command::Export(args) => cmd_export(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn describe_span(span: &ZoneSpan) -> String {
    match span {
        ZoneSpan::Single { zone } => format!("zone {zone}"),
        ZoneSpan::Range { from, to } => format!("zones {from}..={to}"),
        ZoneSpan::List { zones } => format!("zones {zones:?}"),
    }
}

fn cmd_devices() -> anyhow::Result<()> {
    for profile in DeviceRegistry::builtin().list() {
        println!(
            "{:<8} {} ({} zones)",
            profile.id, profile.display_name, profile.zone_count
        );
        if let Some(caution) = &profile.caution {
            println!("         caution: {caution}");
        }
        for (index, group) in profile.macro_groups.iter().enumerate() {
            println!("  [{index:>2}] {:<6} {}", group.label, describe_span(&group.span));
        }
    }
    Ok(())
}

fn cmd_new(args: NewArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ComposerConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => ComposerConfig::default(),
    };

    let mut state = AppState::for_device(config, &args.device)?;
    if !state.update_audio_duration(args.duration_ms) {
        anyhow::bail!("invalid audio duration: {} ms", args.duration_ms);
    }
    for index in &args.macros {
        state
            .apply_macro(*index, args.at_ms)
            .with_context(|| format!("apply macro {index}"))?;
    }

    let doc = state.document();
    write_text(&args.out, &doc.to_json_string()?)?;
    eprintln!("wrote {} ({} blocks)", args.out.display(), doc.total_blocks());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let doc = TimelineDocument::load(&args.document)
        .with_context(|| format!("load document '{}'", args.document.display()))?;

    let watermark = match &args.watermark {
        Some(path) => {
            let mut matrix = WatermarkMatrix::new();
            gc_watermark::import_file(&mut matrix, path)
                .with_context(|| format!("import watermark '{}'", path.display()))?;
            Some(matrix)
        }
        None => None,
    };

    let encoder = ExportEncoder::new(ExportConfig {
        bucket_millis: args.bucket_ms,
        empty_policy: if args.allow_empty {
            EmptyPolicy::AllowSilent
        } else {
            EmptyPolicy::Reject
        },
    });
    let handle = gc_encoder::spawn_export(encoder, doc, watermark)?;
    let artifact = handle.wait()?;

    create_parent_dir(&args.out)?;
    save_artifact(&artifact, &args.out)
        .with_context(|| format!("write artifact '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let artifact = CompositionArtifact::load(&args.artifact)
        .with_context(|| format!("load artifact '{}'", args.artifact.display()))?;
    let grid = ExportEncoder::default().decode(&artifact)?;
    info!(codec = %artifact.codec, zones = grid.zone_count(), "Artifact decoded");

    println!(
        "device {} | {} zones x {} buckets of {} ms",
        artifact.device_id,
        grid.zone_count(),
        grid.bucket_count,
        grid.bucket_millis
    );
    for (zone, row) in grid.zones.iter().enumerate() {
        let strip: String = row.iter().map(|s| if s.is_some() { '#' } else { '.' }).collect();
        println!("{zone:>3} {strip} ({} active)", grid.active_buckets(zone));
    }
    if let Some(transform) = &artifact.watermark_transform {
        println!("watermark attached ({transform})");
    }
    Ok(())
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    create_parent_dir(path)?;
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))
}
