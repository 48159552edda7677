pub mod config;
pub mod diagnosis;
pub mod image;
pub mod models;
pub mod utils;
pub mod web;

// 重新导出主要类型
pub use config::Config;
pub use diagnosis::{Diagnosis, Prediction, Task};
pub use utils::error::DiagnosisError;
pub use web::{create_app, serve, AppState};

pub type Result<T> = std::result::Result<T, DiagnosisError>;
