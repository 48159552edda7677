pub mod handlers;
pub mod middleware;
pub mod upload;

use crate::{models::ModelManager, utils::error::DiagnosisError, Config, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    response::{Json, Response},
    routing::{get, post, MethodRouter},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub models: Arc<ModelManager>,
}

impl AppState {
    pub fn new(config: Config, models: Arc<ModelManager>) -> Self {
        Self { config, models }
    }
}

pub async fn serve(config: Config) -> Result<()> {
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // 模型在监听端口之前加载完成
    let models = Arc::new(ModelManager::load(&config)?);

    let addr: SocketAddr = config.bind_addr.parse().map_err(|e| {
        DiagnosisError::Config(format!("Invalid bind address {}: {}", config.bind_addr, e))
    })?;

    let app = create_app(AppState::new(config.clone(), models));

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Upload directory: {}", config.upload_dir.display());
    tracing::info!("API endpoints:");
    tracing::info!("  POST /mri/       - Brain MRI diagnosis");
    tracing::info!("  POST /spiral/    - Spiral drawing diagnosis");
    tracing::info!("  GET  /health     - Health check");
    tracing::info!("  GET  /api/info   - Service information");

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        DiagnosisError::Internal(format!("Failed to bind to address {}: {}", addr, e))
    })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DiagnosisError::Internal(format!("Server failed: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    let max_request_size = state.config.server_config.max_request_size;
    let request_timeout = Duration::from_secs(state.config.server_config.request_timeout);
    let limits = middleware::TransportLimits {
        request_timeout: state.config.server_config.request_timeout,
        max_request_size,
    };

    Router::new()
        .merge(prediction_routes())
        .nest("/predict", prediction_routes())
        .route("/health", get(health_handler))
        .route("/api/info", get(info_handler))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(DefaultBodyLimit::max(max_request_size))
        .layer(RequestBodyLimitLayer::new(max_request_size))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum::middleware::map_response(move |response: Response| async move {
            limits.json_error(response)
        }))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 诊断路由，带与不带结尾斜杠均可访问
fn prediction_routes() -> Router<AppState> {
    let mri = || -> MethodRouter<AppState> {
        post(handlers::mri_handler).fallback(handlers::method_not_allowed)
    };
    let spiral = || -> MethodRouter<AppState> {
        post(handlers::spiral_handler).fallback(handlers::method_not_allowed)
    };

    Router::new()
        .route("/mri/", mri())
        .route("/mri", mri())
        .route("/spiral/", spiral())
        .route("/spiral", spiral())
}

/// 健康检查端点
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 服务信息端点
async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stats = state.models.get_stats(&state.config);

    Json(json!({
        "service": "ONNX Parkinson's Screening Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "models": stats,
        "features": {
            "mri": true,
            "spiral": true,
            "per_model_scores": state.config.dev_mode
        }
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
