use crate::{
    config::Config,
    pipeline::Pipeline,
    probe,
    request::{ExtractionRequest, Method},
    tools::SystemTools,
    util::{ensure_dir, expand_tilde, reveal_in_file_manager},
    workspace::WorkingSpace,
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "vid2pdf")]
#[command(about = "Turn a video into a paginated PDF (ffmpeg + ImageMagick + Tesseract)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./vid2pdf.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the required external tools are installed and resolvable.
    Doctor {},
    /// Extract frames, compile them into a PDF, and optionally OCR them.
    Run {
        /// Source video file.
        #[arg(long)]
        input: PathBuf,

        /// Frame extraction method.
        #[arg(long, value_enum, default_value_t = MethodArg::Interval)]
        method: MethodArg,

        /// Seconds between samples (interval method) or scene-change
        /// threshold in [0,1] (scene method; blank defaults to 0.3).
        #[arg(long)]
        param: Option<String>,

        /// Skip the OCR text stage.
        #[arg(long)]
        no_ocr: bool,

        /// Keep the extracted frames directory after a successful run.
        #[arg(long)]
        keep_frames: bool,

        /// Working space override.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Open the working space in the file manager when done.
        #[arg(long)]
        reveal: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MethodArg {
    Interval,
    Scene,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Interval => Method::FixedInterval,
            MethodArg::Scene => Method::SceneChange,
        }
    }
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref());
    let cfg = match &cfg_path {
        Some(p) => Config::load(p)?,
        None => Config::default(),
    };

    match &args.cmd {
        Command::Doctor {} => {
            let _guard = init_logging(&args, &cfg, None)?;
            doctor(&cfg)
        }
        Command::Run {
            input,
            method,
            param,
            no_ocr,
            keep_frames,
            out_dir,
            reveal,
        } => run(
            &args,
            &cfg,
            RunOpts {
                input: input.clone(),
                method: (*method).into(),
                param: param.clone(),
                extract_text: !no_ocr,
                keep_frames: *keep_frames || cfg.global.keep_frames,
                out_dir: out_dir.clone(),
                reveal: *reveal,
            },
        ),
    }
}

struct RunOpts {
    input: PathBuf,
    method: Method,
    param: Option<String>,
    extract_text: bool,
    keep_frames: bool,
    out_dir: Option<PathBuf>,
    reveal: bool,
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("vid2pdf.toml");
    if default.exists() {
        return Some(default);
    }
    let example = PathBuf::from("vid2pdf.example.toml");
    example.exists().then_some(example)
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
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
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

fn doctor(cfg: &Config) -> Result<()> {
    let tools = SystemTools::new(cfg);
    let report = probe::doctor(cfg, &tools);
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.ok {
        let missing: Vec<&str> = report
            .tools
            .iter()
            .filter(|t| t.path.is_none())
            .map(|t| t.name.as_str())
            .collect();
        return Err(anyhow!("missing tools: {}", missing.join(", ")));
    }
    Ok(())
}

fn run(args: &Args, cfg: &Config, opts: RunOpts) -> Result<()> {
    let work_dir = opts
        .out_dir
        .clone()
        .unwrap_or_else(|| expand_tilde(&cfg.paths.work_dir));
    let space = WorkingSpace::at(work_dir);
    space.ensure_root()?;

    let log_path = resolve_log_path(cfg, space.root());
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    if cfg.debug.dump_effective_config {
        let raw = toml::to_string(cfg).unwrap_or_default();
        std::fs::write(space.root().join("effective-config.toml"), raw)?;
    }

    // No --param means the configured default interval, or a blank
    // threshold the validator resolves to 0.3.
    let raw_param = match (&opts.param, opts.method) {
        (Some(s), _) => s.clone(),
        (None, Method::FixedInterval) => cfg.extraction.default_interval.to_string(),
        (None, Method::SceneChange) => String::new(),
    };

    let tools = SystemTools::new(cfg);
    let pipeline = Pipeline::new(cfg, tools);

    let result = ExtractionRequest::validate(
        &opts.input,
        opts.method,
        &raw_param,
        opts.extract_text,
        opts.keep_frames,
    )
    .and_then(|req| pipeline.run(&req, &space));

    match result {
        Ok(out) => {
            if cfg.global.print_summary {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "status": "ok",
                        "workspace": space.root(),
                        "pdf": out.pdf.path,
                        "text": out.text.as_ref().map(|a| &a.path),
                        "frames": out.report.frame_count,
                    }))?
                );
            }
            if opts.reveal {
                reveal_in_file_manager(space.root());
            }
            Ok(())
        }
        Err(err) => {
            if let Some(hint) = err.remediation() {
                eprintln!("{hint}");
            }
            let stage = err.stage();
            Err(anyhow::Error::new(err).context(format!("{stage} stage failed")))
        }
    }
}

fn resolve_log_path(cfg: &Config, workspace_root: &Path) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(workspace_root.join("vid2pdf.log"))
}
