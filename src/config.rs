use crate::diagnosis::{Backbone, Task};
use crate::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器绑定地址
    pub bind_addr: String,

    /// 模型文件目录
    pub models_dir: PathBuf,

    /// 上传临时文件目录
    pub upload_dir: PathBuf,

    /// 工作线程数量
    pub workers: usize,

    /// 开发模式
    pub dev_mode: bool,

    /// ONNX Runtime配置
    pub onnx_config: OnnxConfig,

    /// 服务器配置
    pub server_config: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// CPU线程数
    pub intra_threads: usize,

    /// 优化级别
    pub optimization_level: i32,

    /// 启用图优化
    pub enable_optimization: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 请求超时时间（秒）
    pub request_timeout: u64,

    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

impl Config {
    pub fn new(
        bind_addr: String,
        models_dir: String,
        upload_dir: Option<String>,
        workers: Option<usize>,
        dev_mode: bool,
    ) -> Result<Self> {
        let cpu_cores = num_cpus::get();
        let workers = workers.unwrap_or(cpu_cores);

        if workers == 0 {
            return Err(crate::DiagnosisError::Config(
                "Worker count must be at least 1".to_string(),
            ));
        }

        let onnx_config = OnnxConfig {
            intra_threads: (cpu_cores * 3 / 4).max(1), // 使用75%的CPU核心
            optimization_level: 3,
            enable_optimization: true,
        };

        let server_config = ServerConfig {
            request_timeout: if dev_mode { 300 } else { 60 },
            max_request_size: 50 * 1024 * 1024, // 50MB
        };

        let upload_dir = upload_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("parkinsons-uploads"));

        Ok(Self {
            bind_addr,
            models_dir: PathBuf::from(models_dir),
            upload_dir,
            workers,
            dev_mode,
            onnx_config,
            server_config,
        })
    }

    /// 获取特征提取模型路径
    pub fn extractor_model_path(&self, backbone: Backbone) -> PathBuf {
        let file = match backbone {
            Backbone::Vgg16 => "vgg16_notop.onnx",
            Backbone::ResNet50 => "resnet50_notop.onnx",
        };
        self.models_dir.join(file)
    }

    /// 获取分类头模型路径
    pub fn head_model_path(&self, task: Task, backbone: Backbone) -> PathBuf {
        let file = match (task, backbone) {
            (Task::Mri, Backbone::Vgg16) => "vgg_model.onnx",
            (Task::Mri, Backbone::ResNet50) => "resnet_model.onnx",
            (Task::Spiral, Backbone::Vgg16) => "vgg_spiral_model.onnx",
            (Task::Spiral, Backbone::ResNet50) => "resnet_spiral_model.onnx",
        };
        self.models_dir.join(file)
    }
}
