use crate::{
    config::Config,
    engine::{ManifestEngine, PngExtractor, ProgressObserver, Recognizers},
    engine::manifest::ManifestRegion,
    error::check_page_size,
    pipeline::Pipeline,
    reading_order::{self, detect_text_direction, TextDirection},
    report::RunReport,
    table_type::LineDensityEstimator,
    types::LayoutBox,
    util::{ensure_dir, hash_file, now_rfc3339, sha256_hex},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "pageflow")]
#[command(about = "Reading-order inference and page analysis orchestration")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./pageflow.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective configuration.
    Config {},
    /// Print the reading order of a box list.
    Order {
        #[arg(long)]
        boxes: PathBuf,
    },
    /// Process a document manifest.
    Run {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// Input of the `order` command.
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub direction: Option<TextDirection>,
    pub boxes: Vec<ManifestRegion>,
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref());
    let cfg = match &cfg_path {
        Some(p) => Config::load(p)?,
        None => Config::default(),
    };

    match &args.cmd {
        Command::Config {} => {
            let _guard = init_logging(&args, &cfg, None)?;
            show_config(&cfg)
        }
        Command::Order { boxes } => {
            let _guard = init_logging(&args, &cfg, None)?;
            order(&cfg, boxes)
        }
        Command::Run { manifest, out_dir } => run(&args, &cfg, manifest, out_dir.as_deref()),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    ["pageflow.toml", "pageflow.example.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn show_config(cfg: &Config) -> Result<()> {
    cfg.validate()?;
    print!("{}", toml::to_string(cfg)?);
    Ok(())
}

fn order(cfg: &Config, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading boxes: {}", path.display()))?;
    let req: OrderRequest =
        serde_json::from_str(&raw).with_context(|| format!("parsing boxes: {}", path.display()))?;
    check_page_size(req.width, req.height)?;

    let mut ro = cfg.reading_order.clone();
    if let Some(d) = req.direction {
        ro.direction = d;
    }
    ro.validate()?;

    let boxes: Vec<LayoutBox> = req
        .boxes
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let [x0, y0, x1, y1] = r.bbox;
            LayoutBox::new(x0, y0, x1, y1, r.category)
                .with_confidence(r.confidence)
                .with_index(i)
        })
        .collect();

    let resolved = match ro.direction {
        TextDirection::Auto => detect_text_direction(&boxes),
        d => d,
    };
    let permutation = reading_order::order(&boxes, req.width, req.height, &ro);
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "direction": resolved,
            "order": permutation,
        }))?
    );
    Ok(())
}

/// Reports page progress through the log.
struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, stage: &str, current: usize, total: usize) {
        info!("[{stage}] {current}/{total}");
    }
}

fn run(args: &Args, cfg: &Config, manifest: &Path, out_override: Option<&Path>) -> Result<()> {
    if !manifest.exists() {
        return Err(anyhow!("manifest does not exist: {}", manifest.display()));
    }

    let cfg_hash = sha256_hex(cfg.normalized_for_hash().as_bytes());
    let input_hash = hash_file(manifest)
        .with_context(|| format!("hashing manifest: {}", manifest.display()))?;
    let job_id = sha256_hex(format!("{}:{}", cfg_hash, input_hash).as_bytes());

    let out_root = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.output.out_dir));
    let job_dir = out_root.join(&job_id);

    if job_dir.exists() && !cfg.output.resume {
        return Err(anyhow!(
            "job_dir already exists and resume=false: {}",
            job_dir.display()
        ));
    }

    ensure_dir(&job_dir)?;
    ensure_dir(&job_dir.join("final"))?;
    ensure_dir(&job_dir.join("logs"))?;

    let log_path = resolve_log_path(cfg, &job_dir);
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    info!("job_id={job_id} out={}", job_dir.display());

    let engine = Arc::new(
        ManifestEngine::open(manifest, LineDensityEstimator::from_config(&cfg.table))?
            .with_dpi(cfg.runtime.dpi),
    );
    let images = Arc::new(PngExtractor::new(job_dir.join(&cfg.output.image_dir))?);
    let pipeline =
        Pipeline::new(cfg, Recognizers::from_shared(engine.clone(), images)).with_observer(LogProgress);

    let started = now_rfc3339();
    let doc = pipeline.run(engine.as_ref())?;
    if doc.is_empty() {
        warn!("no pages were processed from {}", manifest.display());
    }

    let final_dir = job_dir.join("final");
    for out in &doc.outputs {
        std::fs::write(final_dir.join(&out.name), &out.content)
            .with_context(|| format!("writing {}", out.name))?;
    }

    if cfg.output.write_report_json {
        let report = RunReport::from_document(&manifest.display().to_string(), &doc);
        std::fs::write(
            final_dir.join(&cfg.output.report_filename),
            serde_json::to_string_pretty(&report)?,
        )?;
    }

    if cfg.output.write_index_json {
        let index = serde_json::json!({
            "job_id": job_id,
            "started": started,
            "finished": now_rfc3339(),
            "outputs": doc.outputs.iter().map(|o| format!("final/{}", o.name)).collect::<Vec<_>>(),
            "report": format!("final/{}", cfg.output.report_filename),
            "images": cfg.output.image_dir,
        });
        std::fs::write(job_dir.join("index.json"), serde_json::to_string_pretty(&index)?)?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "job_id": job_id,
            "job_dir": job_dir,
            "pages": doc.processed_pages,
            "total_pages": doc.total_pages,
            "failed_pages": doc.failed_pages,
            "skipped_elements": doc.skipped_elements,
            "status": if doc.is_empty() { "empty" } else { "ok" },
        }))?
    );

    Ok(())
}

fn resolve_log_path(cfg: &Config, job_dir: &Path) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    Some(job_dir.join("logs").join("pageflow.log"))
}
