//! Shared fixtures for HTTP integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::{Array2, Array4};
use onnx_parkinsons::diagnosis::Backbone;
use onnx_parkinsons::models::{ClassifierHead, FeatureExtractor, HeadPair, ModelManager};
use onnx_parkinsons::{AppState, Config, DiagnosisError};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

pub const BOUNDARY: &str = "----parkinsons-test-boundary";

pub struct ZeroExtractor(pub Backbone);

impl FeatureExtractor for ZeroExtractor {
    fn backbone(&self) -> Backbone {
        self.0
    }

    fn extract(&self, _pixels: &Array4<f32>) -> onnx_parkinsons::Result<Array2<f32>> {
        Ok(Array2::zeros((1, 16)))
    }
}

pub struct FixedHead(pub f32);

impl ClassifierHead for FixedHead {
    fn predict(&self, _features: &Array2<f32>) -> onnx_parkinsons::Result<f32> {
        Ok(self.0)
    }
}

pub struct FailingHead;

impl ClassifierHead for FailingHead {
    fn predict(&self, _features: &Array2<f32>) -> onnx_parkinsons::Result<f32> {
        Err(DiagnosisError::Inference("head exploded".to_string()))
    }
}

/// 阻塞指定时长后返回的分类头
pub struct SlowHead(pub std::time::Duration);

impl ClassifierHead for SlowHead {
    fn predict(&self, _features: &Array2<f32>) -> onnx_parkinsons::Result<f32> {
        std::thread::sleep(self.0);
        Ok(0.5)
    }
}

pub fn heads(vgg: f32, resnet: f32) -> HeadPair {
    HeadPair::new(Arc::new(FixedHead(vgg)), Arc::new(FixedHead(resnet)))
}

pub fn models(mri: HeadPair, spiral: HeadPair) -> Arc<ModelManager> {
    Arc::new(
        ModelManager::from_parts(
            Arc::new(ZeroExtractor(Backbone::Vgg16)),
            Arc::new(ZeroExtractor(Backbone::ResNet50)),
            mri,
            spiral,
        )
        .unwrap(),
    )
}

pub fn config(upload_dir: &Path, dev_mode: bool) -> Config {
    Config::new(
        "127.0.0.1:0".to_string(),
        "models".to_string(),
        Some(upload_dir.to_string_lossy().into_owned()),
        Some(1),
        dev_mode,
    )
    .unwrap()
}

pub fn app(upload_dir: &Path, models: Arc<ModelManager>) -> axum::Router {
    onnx_parkinsons::create_app(AppState::new(config(upload_dir, false), models))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([120, 80, 40])));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// 构造单文件 multipart 请求体
pub fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// 不带文件名的普通表单字段
pub fn text_field_body(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"\r\n\r\n{v}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = field,
        v = value
    )
    .into_bytes()
}

pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn image_request(uri: &str) -> Request<Body> {
    multipart_request(uri, multipart_body("image", "scan.png", &png_bytes(64, 48)))
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn upload_dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
