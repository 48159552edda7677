use crate::utils::error::DiagnosisError;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;

/// 请求日志中间件
pub async fn request_logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let start_time = Instant::now();

    tracing::info!(
        "Request started: {} {} - User-Agent: {}",
        method,
        uri,
        user_agent
    );

    let response = next.run(req).await;

    tracing::info!(
        "Request completed: {} {} - {} - {}ms",
        method,
        uri,
        response.status(),
        start_time.elapsed().as_millis()
    );

    response
}

/// 超时与请求体超限的响应由 tower-http 生成，改写为统一的JSON错误体
#[derive(Debug, Clone, Copy)]
pub struct TransportLimits {
    pub request_timeout: u64,
    pub max_request_size: usize,
}

impl TransportLimits {
    pub fn json_error(&self, response: Response) -> Response {
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            return response;
        }

        match response.status() {
            StatusCode::REQUEST_TIMEOUT => {
                DiagnosisError::Timeout(self.request_timeout).into_response()
            }
            StatusCode::PAYLOAD_TOO_LARGE => {
                DiagnosisError::PayloadTooLarge(self.max_request_size).into_response()
            }
            _ => response,
        }
    }
}
