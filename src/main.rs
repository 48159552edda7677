use anyhow::Result;
use clap::Parser;
use onnx_parkinsons::{config::Config, web::serve};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "onnx-parkinsons")]
#[command(about = "ONNX-powered Parkinson's screening service for brain MRI and spiral drawings")]
struct Args {
    /// Server bind address
    #[arg(long, env = "PARKINSONS_BIND", default_value = "0.0.0.0:8000")]
    bind: String,

    /// Number of worker threads
    #[arg(long, env = "PARKINSONS_WORKERS")]
    workers: Option<usize>,

    /// Log level
    #[arg(long, env = "PARKINSONS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Model directory path
    #[arg(long, env = "PARKINSONS_MODELS_DIR", default_value = "models")]
    models_dir: String,

    /// Directory for temporary uploads
    #[arg(long, env = "PARKINSONS_UPLOAD_DIR")]
    upload_dir: Option<String>,

    /// Enable development mode
    #[arg(long, env = "PARKINSONS_DEV")]
    dev: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting ONNX Parkinson's screening service...");
    tracing::info!("Bind address: {}", args.bind);
    tracing::info!("Models directory: {}", args.models_dir);

    let config = Config::new(args.bind, args.models_dir, args.upload_dir, args.workers, args.dev)?;
    tracing::info!("Worker threads: {}", config.workers);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()?;

    runtime.block_on(serve(config))?;

    Ok(())
}
