use crate::{
    diagnosis::{Diagnosis, DiagnosisPipeline, Task},
    utils::error::DiagnosisError,
    web::{upload::TempUpload, AppState},
    Result,
};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};
use std::sync::Arc;
use std::time::Instant;

/// 上传字段名
const IMAGE_FIELD: &str = "image";

/// 收到的上传文件
struct ImageUpload {
    file_name: String,
    data: Bytes,
}

/// MRI 诊断
pub async fn mri_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Diagnosis>> {
    diagnose_upload(state, Task::Mri, multipart).await
}

/// 螺旋线手绘图诊断
pub async fn spiral_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Diagnosis>> {
    diagnose_upload(state, Task::Spiral, multipart).await
}

/// 非POST请求
pub async fn method_not_allowed() -> DiagnosisError {
    DiagnosisError::InvalidInput("Please send a POST request with an image.".to_string())
}

async fn diagnose_upload(
    state: AppState,
    task: Task,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Diagnosis>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!("Processing {} request: request_id={}", task, request_id);

    let multipart = multipart.map_err(|e| {
        tracing::debug!("Multipart rejected: {}", e);
        DiagnosisError::InvalidInput("No image uploaded".to_string())
    })?;

    let upload = read_image_field(multipart)
        .await?
        .ok_or_else(|| DiagnosisError::InvalidInput("No image uploaded".to_string()))?;

    tracing::debug!(
        "Received image {}: {} bytes, request_id={}",
        upload.file_name,
        upload.data.len(),
        request_id
    );

    let models = Arc::clone(&state.models);
    let upload_dir = state.config.upload_dir.clone();

    // 写盘、解码、推理均为阻塞操作
    let diagnosis = tokio::task::spawn_blocking(move || -> Result<Diagnosis> {
        let temp = TempUpload::save(&upload_dir, Some(upload.file_name.as_str()), &upload.data)?;
        let result = DiagnosisPipeline::diagnose(&models, task, temp.path());
        temp.cleanup();
        result
    })
    .await
    .map_err(|e| DiagnosisError::Internal(format!("Diagnosis task failed: {}", e)))??;

    tracing::info!(
        "{} request completed: request_id={}, prediction={}, time={:.3}s",
        task,
        request_id,
        diagnosis.prediction,
        start_time.elapsed().as_secs_f32()
    );

    let diagnosis = if state.config.dev_mode {
        diagnosis
    } else {
        diagnosis.without_scores()
    };

    Ok(Json(diagnosis))
}

/// 读取 `image` 字段，忽略其余字段
async fn read_image_field(mut multipart: Multipart) -> Result<Option<ImageUpload>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        DiagnosisError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        if field_name != IMAGE_FIELD {
            tracing::debug!("Ignoring field: {}", field_name);
            continue;
        }

        // 未选择文件的表单项或普通文本字段不算上传
        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                tracing::debug!("Ignoring image field without a file name");
                continue;
            }
        };
        let data = field.bytes().await.map_err(|e| {
            DiagnosisError::InvalidInput(format!("Failed to read file data: {}", e))
        })?;

        upload = Some(ImageUpload { file_name, data });
    }

    Ok(upload)
}
